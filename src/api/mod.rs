/// Remote catalog API
///
/// - HTTP client for read/create/update (client.rs)
/// - Error taxonomy (error.rs)

pub mod client;
pub mod error;

pub use client::CatalogClient;
pub use error::CatalogError;
