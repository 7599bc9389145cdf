use tracing::warn;
use tracing_subscriber::EnvFilter;

mod api;
mod app;
mod config;
mod export;
mod state;
mod ui;

use app::CatalogAdmin;
use config::Config;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("catalog_admin=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> iced::Result {
    init_tracing();

    // A broken config file should not keep the panel from starting
    let config = Config::load().unwrap_or_else(|err| {
        warn!(%err, "Falling back to default configuration");
        Config::default()
    });

    iced::application(
        "Product Catalog Admin",
        CatalogAdmin::update,
        CatalogAdmin::view,
    )
    .theme(CatalogAdmin::theme)
    .centered()
    .run_with(move || CatalogAdmin::new(config))
}
