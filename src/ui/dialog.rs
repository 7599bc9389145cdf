use iced::widget::{
    button, center, column, container, horizontal_space, mouse_area, opaque, row, stack, text,
    text_input,
};
use iced::{Alignment, Color, Element, Length};

use crate::app::Message;
use crate::state::form::{FormField, ProductForm};

/// Edit/create form used by both the detail dialog and the create dialog
pub fn product_form<'a>(
    heading: String,
    form: &'a ProductForm,
    error: Option<&'a str>,
    saving: bool,
    submit_label: &'a str,
) -> Element<'a, Message> {
    let mut content = column![
        text(heading).size(22),
        field("Title", "Product title", &form.title, FormField::Title),
        field("Price", "1.00", &form.price, FormField::Price),
        field("Description", "Short description", &form.description, FormField::Description),
        field("Category ID", "1", &form.category_id, FormField::CategoryId),
        field("Image URL", "https://...", &form.image, FormField::Image),
    ]
    .spacing(12);

    if let Some(error) = error {
        content = content.push(text(error).style(text::danger));
    }

    content = content.push(
        row![
            horizontal_space(),
            button("Cancel")
                .style(button::secondary)
                .on_press(Message::CloseDialog),
            button(if saving { "Saving..." } else { submit_label }).on_press(Message::Submit),
        ]
        .spacing(10)
        .align_y(Alignment::Center),
    );

    container(content)
        .width(Length::Fixed(480.0))
        .padding(20)
        .style(container::rounded_box)
        .into()
}

fn field<'a>(
    label: &'a str,
    placeholder: &'a str,
    value: &'a str,
    form_field: FormField,
) -> Element<'a, Message> {
    column![
        text(label).size(14),
        text_input(placeholder, value)
            .on_input(move |v| Message::FieldChanged(form_field, v))
            .on_submit(Message::Submit)
            .padding(6),
    ]
    .spacing(4)
    .into()
}

/// Lay `content` over a dimmed `base`; clicking outside sends `on_blur`
pub fn modal<'a>(
    base: Element<'a, Message>,
    content: Element<'a, Message>,
    on_blur: Message,
) -> Element<'a, Message> {
    stack![
        base,
        opaque(
            mouse_area(center(opaque(content)).style(|_theme| container::Style {
                background: Some(
                    Color {
                        a: 0.6,
                        ..Color::BLACK
                    }
                    .into(),
                ),
                ..container::Style::default()
            }))
            .on_press(on_blur)
        )
    ]
    .into()
}
