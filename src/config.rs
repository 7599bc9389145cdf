/// Application configuration
///
/// Settings come from an optional JSON file in the user's config
/// directory and are then overridden by environment variables:
/// - Linux: ~/.config/catalog-admin/config.json
/// - macOS: ~/Library/Application Support/catalog-admin/config.json
/// - Windows: %APPDATA%\catalog-admin\config.json

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{info, warn};

use crate::api::client::DEFAULT_FETCH_LIMIT;
use crate::state::view::PageSize;

pub const DEFAULT_API_URL: &str = "https://api.escuelajs.co/api/v1/products";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Products endpoint, e.g. `https://host/api/v1/products`
    pub api_base_url: String,
    /// `limit` sent with the catalog fetch
    pub fetch_limit: u32,
    /// Initial rows per page; must be one of the offered page sizes
    pub page_size: usize,
    /// Where the save dialog opens for CSV export
    pub export_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            fetch_limit: DEFAULT_FETCH_LIMIT,
            page_size: PageSize::default().get(),
            export_dir: dirs::download_dir(),
        }
    }
}

impl Config {
    /// Load the config file (if any), then apply environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => {
                let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
                    path: path.clone(),
                    source,
                })?;
                info!(path = %path.display(), "Loaded config file");
                Self::from_json(&contents)?
            }
            _ => Self::default(),
        };

        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    pub fn from_json(contents: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(contents)?)
    }

    fn config_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir()?;
        path.push("catalog-admin");
        path.push("config.json");
        Some(path)
    }

    /// Override fields from `CATALOG_*` variables. Unparsable values are ignored.
    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("CATALOG_API_URL").filter(|v| !v.trim().is_empty()) {
            self.api_base_url = url.trim().to_string();
        }
        if let Some(limit) = lookup("CATALOG_FETCH_LIMIT").and_then(|v| v.trim().parse().ok()) {
            self.fetch_limit = limit;
        }
        if let Some(size) = lookup("CATALOG_PAGE_SIZE").and_then(|v| v.trim().parse().ok()) {
            self.page_size = size;
        }
        if let Some(dir) = lookup("CATALOG_EXPORT_DIR").filter(|v| !v.trim().is_empty()) {
            self.export_dir = Some(PathBuf::from(dir));
        }
    }

    /// Configured page size, falling back to the default for unsupported values
    pub fn initial_page_size(&self) -> PageSize {
        PageSize::from_usize(self.page_size).unwrap_or_else(|| {
            warn!(page_size = self.page_size, "Unsupported page size, using default");
            PageSize::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = Config::from_json(r#"{"page_size": 20}"#).unwrap();

        assert_eq!(config.page_size, 20);
        assert_eq!(config.api_base_url, DEFAULT_API_URL);
        assert_eq!(config.fetch_limit, 200);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(matches!(Config::from_json("{page_size"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("CATALOG_API_URL", " http://localhost:3000/products "),
            ("CATALOG_FETCH_LIMIT", "500"),
            ("CATALOG_PAGE_SIZE", "not a number"),
            ("CATALOG_EXPORT_DIR", "/tmp/exports"),
        ]);
        let mut config = Config::default();

        config.apply_env(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.api_base_url, "http://localhost:3000/products");
        assert_eq!(config.fetch_limit, 500);
        assert_eq!(config.page_size, 10);
        assert_eq!(config.export_dir, Some(PathBuf::from("/tmp/exports")));
    }

    #[test]
    fn test_unsupported_page_size_falls_back() {
        let config = Config { page_size: 7, ..Config::default() };
        assert_eq!(config.initial_page_size(), PageSize::default());

        let config = Config { page_size: 50, ..Config::default() };
        assert_eq!(config.initial_page_size().get(), 50);
    }
}
