use thiserror::Error;

/// Failures reported by the catalog client.
///
/// Each variant carries a readable message only. The messages travel
/// inside iced messages, so the type stays `Clone`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("could not load the product list: {0}")]
    Fetch(String),
    #[error("could not update the product: {0}")]
    Update(String),
    #[error("could not create the product: {0}")]
    Create(String),
    #[error("could not load the image: {0}")]
    Thumbnail(String),
}
