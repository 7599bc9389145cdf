/// In-memory thumbnails for product image URLs
///
/// Each URL is fetched at most once. A failed fetch is remembered so the
/// table falls back to the URL text instead of retrying on every update.

use iced::widget::image::Handle;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub enum Thumbnail {
    Loading,
    Loaded(Handle),
    Failed,
}

#[derive(Debug, Default)]
pub struct ThumbnailCache {
    entries: HashMap<String, Thumbnail>,
}

impl ThumbnailCache {
    /// Mark every unseen URL as loading and return those URLs, in order,
    /// without duplicates
    pub fn request<'a>(&mut self, urls: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        let mut pending = Vec::new();
        for url in urls {
            if url.is_empty() || self.entries.contains_key(url) {
                continue;
            }
            self.entries.insert(url.to_string(), Thumbnail::Loading);
            pending.push(url.to_string());
        }
        pending
    }

    /// Store the outcome of a fetch started by `request`
    pub fn finish<E>(&mut self, url: String, result: Result<Vec<u8>, E>) {
        let entry = match result {
            Ok(bytes) => Thumbnail::Loaded(Handle::from_bytes(bytes)),
            Err(_) => Thumbnail::Failed,
        };
        self.entries.insert(url, entry);
    }

    pub fn get(&self, url: &str) -> Option<&Thumbnail> {
        self.entries.get(url)
    }

    /// Handle for a loaded thumbnail, `None` while loading or after a failure
    pub fn handle(&self, url: &str) -> Option<&Handle> {
        match self.entries.get(url) {
            Some(Thumbnail::Loaded(handle)) => Some(handle),
            _ => None,
        }
    }
}
