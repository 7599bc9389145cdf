use chrono::{DateTime, Local};
use iced::widget::{center, column, text};
use iced::{Element, Task, Theme};
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

use crate::api::{CatalogClient, CatalogError};
use crate::config::Config;
use crate::export::{self, EXPORT_FILE_NAME};
use crate::state::data::Product;
use crate::state::form::{FormField, ProductForm};
use crate::state::thumbnails::ThumbnailCache;
use crate::state::view::{PageSize, SortField, ViewState};
use crate::ui;

/// Progress of the initial catalog load
#[derive(Debug, Clone, PartialEq)]
pub enum Load {
    Loading,
    Ready,
    /// The table is replaced by this message; nothing else is usable
    Failed(String),
}

/// Which write triggered a catalog refetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refetch {
    AfterUpdate,
    AfterCreate,
}

/// The dialog shown over the table, if any
#[derive(Debug, Clone, PartialEq)]
pub enum Dialog {
    /// Detail view of the selected row, editable
    Detail {
        form: ProductForm,
        error: Option<String>,
    },
    /// Create form; its draft lives in `CatalogAdmin::create_form`
    Create { error: Option<String> },
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// Initial catalog fetch finished
    CatalogLoaded(Result<Vec<Product>, CatalogError>),
    /// Refetch after a successful update or create finished
    CatalogRefetched(Refetch, Result<Vec<Product>, CatalogError>),
    SearchChanged(String),
    PageSizeSelected(PageSize),
    PrevPage,
    NextPage,
    SortBy(SortField),
    ExportCsv,
    Exported(Result<Option<PathBuf>, String>),
    RowClicked(i64),
    OpenCreate,
    CloseDialog,
    /// A field of the open dialog's form was edited
    FieldChanged(FormField, String),
    /// Submit the open dialog (update or create)
    Submit,
    Updated(Result<Product, CatalogError>),
    Created(Result<Product, CatalogError>),
    /// A native notice dialog was dismissed
    NoticeClosed,
    /// Image bytes for a visible row arrived (or failed)
    ThumbnailLoaded(String, Result<Vec<u8>, CatalogError>),
}

/// Main application state
pub struct CatalogAdmin {
    client: CatalogClient,
    export_dir: Option<PathBuf>,
    /// Filter, sort and pagination over the fetched catalog
    view: ViewState,
    /// Raw search box contents
    search: String,
    load: Load,
    dialog: Option<Dialog>,
    create_form: ProductForm,
    /// A create/update request is in flight
    saving: bool,
    /// Status message to display to the user
    status: String,
    last_synced: Option<DateTime<Local>>,
    /// First-image thumbnails, keyed by URL
    thumbnails: ThumbnailCache,
}

impl CatalogAdmin {
    /// Create the application and start the initial catalog fetch
    pub fn new(config: Config) -> (Self, Task<Message>) {
        let client = CatalogClient::new(&config.api_base_url, config.fetch_limit);
        info!(url = %client.base_url(), "Catalog admin starting");

        let app = CatalogAdmin {
            view: ViewState::new(config.initial_page_size()),
            export_dir: config.export_dir,
            client,
            search: String::new(),
            load: Load::Loading,
            dialog: None,
            create_form: ProductForm::default(),
            saving: false,
            status: String::new(),
            last_synced: None,
            thumbnails: ThumbnailCache::default(),
        };

        let client = app.client.clone();
        let task = Task::perform(async move { client.fetch_all().await }, Message::CatalogLoaded);

        (app, task)
    }

    /// Handle application messages and update state
    pub fn update(&mut self, message: Message) -> Task<Message> {
        // Until the first load succeeds the rest of the UI is inert
        if self.load != Load::Ready && !matches!(message, Message::CatalogLoaded(_)) {
            debug!(?message, "Ignoring message, catalog not loaded");
            return Task::none();
        }

        let task = self.handle(message);
        if self.load == Load::Ready {
            Task::batch([task, self.load_thumbnails()])
        } else {
            task
        }
    }

    fn handle(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::CatalogLoaded(Ok(products)) => {
                self.view.replace_all(products);
                info!(count = self.view.all_products().len(), "Catalog loaded");
                self.load = Load::Ready;
                self.last_synced = Some(Local::now());
                Task::none()
            }
            Message::CatalogLoaded(Err(err)) => {
                error!(%err, "Initial catalog load failed");
                self.load = Load::Failed(err.to_string());
                Task::none()
            }
            Message::CatalogRefetched(reason, result) => {
                match result {
                    Ok(products) => {
                        self.view.replace_all(products);
                        self.last_synced = Some(Local::now());
                        if reason == Refetch::AfterCreate {
                            self.view.first_page();
                        }
                    }
                    Err(err) => {
                        // The write already went through; keep showing the old catalog
                        warn!(%err, ?reason, "Catalog refetch failed");
                        self.status = err.to_string();
                    }
                }
                if reason == Refetch::AfterUpdate && matches!(self.dialog, Some(Dialog::Detail { .. })) {
                    self.dialog = None;
                }
                Task::none()
            }
            Message::SearchChanged(search) => {
                self.view.set_keyword(&search);
                self.search = search;
                Task::none()
            }
            Message::PageSizeSelected(page_size) => {
                self.view.set_page_size(page_size);
                Task::none()
            }
            Message::PrevPage => {
                self.view.prev_page();
                Task::none()
            }
            Message::NextPage => {
                self.view.next_page();
                Task::none()
            }
            Message::SortBy(field) => {
                self.view.set_sort(field);
                Task::none()
            }
            Message::ExportCsv => {
                let rows = self.view.current_page_rows().to_vec();
                debug!(rows = rows.len(), "Exporting current page");
                Task::perform(
                    export::export_to_csv(EXPORT_FILE_NAME.to_string(), self.export_dir.clone(), rows),
                    |result| Message::Exported(result.map_err(|e| e.to_string())),
                )
            }
            Message::Exported(Ok(Some(path))) => {
                self.status = format!("Exported to {}", path.display());
                Task::none()
            }
            Message::Exported(Ok(None)) => Task::none(),
            Message::Exported(Err(err)) => {
                error!(%err, "CSV export failed");
                self.status = format!("Export failed: {}", err);
                notice("Export failed", err)
            }
            Message::RowClicked(id) => {
                if let Some(product) = self.view.select(id) {
                    self.dialog = Some(Dialog::Detail {
                        form: ProductForm::from_product(product),
                        error: None,
                    });
                }
                Task::none()
            }
            Message::OpenCreate => {
                self.dialog = Some(Dialog::Create { error: None });
                Task::none()
            }
            Message::CloseDialog => {
                self.dialog = None;
                Task::none()
            }
            Message::FieldChanged(field, value) => {
                match &mut self.dialog {
                    Some(Dialog::Detail { form, .. }) => form.set(field, value),
                    Some(Dialog::Create { .. }) => self.create_form.set(field, value),
                    None => {}
                }
                Task::none()
            }
            Message::Submit => self.submit(),
            Message::Updated(Ok(product)) => {
                self.saving = false;
                self.status = format!("Saved \"{}\"", product.title);
                self.refetch(Refetch::AfterUpdate)
            }
            Message::Updated(Err(err)) => {
                self.saving = false;
                error!(%err, "Update failed");
                if let Some(Dialog::Detail { error, .. }) = &mut self.dialog {
                    *error = Some(err.to_string());
                }
                notice("Update failed", err.to_string())
            }
            Message::Created(Ok(product)) => {
                self.saving = false;
                self.status = format!("Created \"{}\"", product.title);
                self.create_form.reset();
                if matches!(self.dialog, Some(Dialog::Create { .. })) {
                    self.dialog = None;
                }
                self.refetch(Refetch::AfterCreate)
            }
            Message::Created(Err(err)) => {
                self.saving = false;
                error!(%err, "Create failed");
                if let Some(Dialog::Create { error }) = &mut self.dialog {
                    *error = Some(err.to_string());
                }
                notice("Create failed", err.to_string())
            }
            Message::NoticeClosed => Task::none(),
            Message::ThumbnailLoaded(url, result) => {
                if let Err(err) = &result {
                    debug!(%url, %err, "Thumbnail unavailable, showing the URL");
                }
                self.thumbnails.finish(url, result);
                Task::none()
            }
        }
    }

    /// Start fetching thumbnails for the visible rows that have none yet
    fn load_thumbnails(&mut self) -> Task<Message> {
        let urls = self.thumbnails.request(
            self.view
                .current_page_rows()
                .iter()
                .filter_map(Product::first_image),
        );

        Task::batch(urls.into_iter().map(|url| {
            let client = self.client.clone();
            Task::perform(
                async move {
                    let result = client.fetch_image(&url).await;
                    (url, result)
                },
                |(url, result)| Message::ThumbnailLoaded(url, result),
            )
        }))
    }

    /// Validate the open form and send it. Invalid input never reaches the API.
    fn submit(&mut self) -> Task<Message> {
        let client = self.client.clone();
        let selected = self.view.selected().map(|p| p.id);

        match &mut self.dialog {
            Some(Dialog::Detail { form, error }) => match (form.validate(), selected) {
                (Ok(payload), Some(id)) => {
                    *error = None;
                    self.saving = true;
                    Task::perform(
                        async move { client.update(id, &payload).await },
                        Message::Updated,
                    )
                }
                (Err(err), _) => {
                    warn!(%err, "Rejected product edit");
                    *error = Some(err.to_string());
                    notice("Invalid product", invalid_notice(&err.to_string()))
                }
                (Ok(_), None) => Task::none(),
            },
            Some(Dialog::Create { error }) => match self.create_form.validate() {
                Ok(payload) => {
                    *error = None;
                    self.saving = true;
                    Task::perform(
                        async move { client.create(&payload).await },
                        Message::Created,
                    )
                }
                Err(err) => {
                    warn!(%err, "Rejected new product");
                    *error = Some(err.to_string());
                    notice("Invalid product", invalid_notice(&err.to_string()))
                }
            },
            None => Task::none(),
        }
    }

    /// Fetch the full catalog again; the view is rebuilt when it arrives
    fn refetch(&self, reason: Refetch) -> Task<Message> {
        let client = self.client.clone();
        Task::perform(async move { client.fetch_all().await }, move |result| {
            Message::CatalogRefetched(reason, result)
        })
    }

    fn status_line(&self) -> String {
        match &self.last_synced {
            Some(at) if self.status.is_empty() => format!("Synced at {}", at.format("%H:%M:%S")),
            Some(at) => format!("{} · synced at {}", self.status, at.format("%H:%M:%S")),
            None => self.status.clone(),
        }
    }

    /// Build the user interface
    pub fn view(&self) -> Element<'_, Message> {
        let content: Element<'_, Message> = match &self.load {
            Load::Loading => center(text("Loading products...")).into(),
            Load::Failed(message) => ui::table::load_error(message),
            Load::Ready => {
                let page = self.view.page();
                column![
                    ui::table::toolbar(&self.search, self.view.page_size()),
                    ui::table::pagination(&page, self.status_line()),
                    ui::table::table(page, self.view.sort(), &self.thumbnails),
                ]
                .spacing(16)
                .padding(24)
                .into()
            }
        };

        match &self.dialog {
            None => content,
            Some(Dialog::Detail { form, error }) => ui::dialog::modal(
                content,
                ui::dialog::product_form(
                    self.view
                        .selected()
                        .map_or_else(|| "Product".to_string(), |p| format!("Product #{}", p.id)),
                    form,
                    error.as_deref(),
                    self.saving,
                    "Save changes",
                ),
                Message::CloseDialog,
            ),
            Some(Dialog::Create { error }) => ui::dialog::modal(
                content,
                ui::dialog::product_form(
                    "New product".to_string(),
                    &self.create_form,
                    error.as_deref(),
                    self.saving,
                    "Create",
                ),
                Message::CloseDialog,
            ),
        }
    }

    /// Set the application theme
    pub fn theme(&self) -> Theme {
        Theme::Light
    }
}

fn invalid_notice(reason: &str) -> String {
    format!("Please fill in every field with valid values ({}).", reason)
}

/// Show a blocking native warning; resolves to `NoticeClosed`
fn notice(title: &'static str, description: String) -> Task<Message> {
    Task::perform(
        async move {
            rfd::AsyncMessageDialog::new()
                .set_level(rfd::MessageLevel::Warning)
                .set_title(title)
                .set_description(description)
                .set_buttons(rfd::MessageButtons::Ok)
                .show()
                .await;
        },
        |_| Message::NoticeClosed,
    )
}
