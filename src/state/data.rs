/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the catalog API and the UI layer.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// Category reference attached to a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

/// Represents a single product in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Server-assigned ID
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    /// Seeded data sometimes sends the price as a string
    #[serde(deserialize_with = "number_or_numeric_string")]
    pub price: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Not every record carries a category
    #[serde(default)]
    pub category: Option<Category>,
    /// Image URLs, in display order
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<String>,
}

/// `null` decodes like a missing key
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn number_or_numeric_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("price {:?} is not a number", s))),
    }
}

impl Product {
    /// Category name, or an empty string when the product has none
    pub fn category_name(&self) -> &str {
        self.category.as_ref().map(|c| c.name.as_str()).unwrap_or("")
    }

    pub fn first_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// Body sent on create (POST) and update (PUT)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub title: String,
    pub price: f64,
    pub description: String,
    pub category_id: i64,
    pub images: Vec<String>,
}
