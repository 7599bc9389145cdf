use iced::widget::{
    button, center, column, container, horizontal_space, image, pick_list, row, scrollable,
    text, text_input, tooltip, Column,
};
use iced::{Alignment, Element, Length};

use crate::app::Message;
use crate::state::data::Product;
use crate::state::thumbnails::ThumbnailCache;
use crate::state::view::{PageSize, PageView, SortDirection, SortField};

/// Search box, page size picker and the create/export actions
pub fn toolbar<'a>(search: &'a str, page_size: PageSize) -> Element<'a, Message> {
    row![
        text_input("Search by title...", search)
            .on_input(Message::SearchChanged)
            .padding(8)
            .width(Length::Fill),
        pick_list(PageSize::ALL.to_vec(), Some(page_size), Message::PageSizeSelected),
        button("New product").on_press(Message::OpenCreate).padding(8),
        button("Export CSV").on_press(Message::ExportCsv).padding(8),
    ]
    .spacing(10)
    .align_y(Alignment::Center)
    .into()
}

/// Previous/next buttons, the page summary and the status message
pub fn pagination<'a>(page: &PageView<'_>, status: String) -> Element<'a, Message> {
    row![
        button("Previous").on_press_maybe(page.has_prev().then_some(Message::PrevPage)),
        text(page.summary()),
        button("Next").on_press_maybe(page.has_next().then_some(Message::NextPage)),
        horizontal_space(),
        text(status).size(14),
    ]
    .spacing(10)
    .align_y(Alignment::Center)
    .into()
}

/// Edge length of a row thumbnail, in logical pixels
const THUMBNAIL_SIZE: f32 = 48.0;

pub fn table<'a>(
    page: PageView<'a>,
    sort: (Option<SortField>, SortDirection),
    thumbnails: &'a ThumbnailCache,
) -> Element<'a, Message> {
    let header = row![
        text("ID").width(Length::FillPortion(1)),
        container(sort_button("Title", SortField::Title, sort)).width(Length::FillPortion(4)),
        container(sort_button("Price", SortField::Price, sort)).width(Length::FillPortion(2)),
        text("Category").width(Length::FillPortion(2)),
        text("Image").width(Length::FillPortion(4)),
    ]
    .spacing(10)
    .padding([0, 10])
    .align_y(Alignment::Center);

    let body: Element<'a, Message> = if page.rows.is_empty() {
        center(text("No data")).height(Length::Fixed(120.0)).into()
    } else {
        scrollable(Column::with_children(page.rows.iter().map(|p| product_row(p, thumbnails))).spacing(2))
            .height(Length::Fill)
            .into()
    };

    column![header, body].spacing(8).into()
}

/// Shown instead of the table when the initial load fails
pub fn load_error(message: &str) -> Element<'_, Message> {
    center(text(format!("Failed to load data: {}", message)).style(text::danger)).into()
}

fn sort_button<'a>(
    label: &str,
    field: SortField,
    sort: (Option<SortField>, SortDirection),
) -> Element<'a, Message> {
    let marker = match sort {
        (Some(active), SortDirection::Asc) if active == field => " ▲",
        (Some(active), SortDirection::Desc) if active == field => " ▼",
        _ => "",
    };

    button(text(format!("{}{}", label, marker)))
        .style(button::text)
        .padding(0)
        .on_press(Message::SortBy(field))
        .into()
}

/// The first image as a thumbnail; its URL while loading or when it failed
fn image_cell<'a>(product: &'a Product, thumbnails: &'a ThumbnailCache) -> Element<'a, Message> {
    let url = product.first_image().unwrap_or_default();
    match thumbnails.handle(url) {
        Some(handle) => image::<image::Handle>(handle.clone())
            .width(Length::Fixed(THUMBNAIL_SIZE))
            .height(Length::Fixed(THUMBNAIL_SIZE))
            .into(),
        None => text(url).size(12).into(),
    }
}

fn product_row<'a>(product: &'a Product, thumbnails: &'a ThumbnailCache) -> Element<'a, Message> {
    let cells = row![
        text(product.id.to_string()).width(Length::FillPortion(1)),
        text(product.title.as_str()).width(Length::FillPortion(4)),
        text(format!("${}", product.price)).width(Length::FillPortion(2)),
        text(product.category_name()).width(Length::FillPortion(2)),
        container(image_cell(product, thumbnails)).width(Length::FillPortion(4)),
    ]
    .spacing(10)
    .align_y(Alignment::Center);

    let description = if product.description.is_empty() {
        "No description"
    } else {
        product.description.as_str()
    };

    tooltip(
        button(cells)
            .style(button::text)
            .width(Length::Fill)
            .on_press(Message::RowClicked(product.id)),
        container(text(description).size(14))
            .padding(8)
            .max_width(360.0)
            .style(container::rounded_box),
        tooltip::Position::Bottom,
    )
    .into()
}
