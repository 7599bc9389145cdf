/// State management module
///
/// This module handles all application state, including:
/// - Shared data structures (data.rs)
/// - The filtered/sorted/paginated table view (view.rs)
/// - Edit and create forms with validation (form.rs)
/// - Product image thumbnails (thumbnails.rs)

pub mod data;
pub mod form;
pub mod thumbnails;
pub mod view;
