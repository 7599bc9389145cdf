/// Edit and create form state
///
/// Form inputs are kept as raw strings, exactly as typed. They are only
/// turned into a `ProductPayload` by `validate`, which is the single gate
/// in front of the create and update API calls.

use thiserror::Error;

use super::data::{Product, ProductPayload};

/// Form input the user can type into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Price,
    Description,
    CategoryId,
    Image,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("title must not be empty")]
    MissingTitle,
    #[error("price must be a number of at least 1")]
    InvalidPrice,
    #[error("description must not be empty")]
    MissingDescription,
    #[error("category id must be a positive whole number")]
    InvalidCategory,
    #[error("image URL must not be empty")]
    MissingImage,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductForm {
    pub title: String,
    pub price: String,
    pub description: String,
    pub category_id: String,
    pub image: String,
}

impl ProductForm {
    /// Pre-fill the detail form from an existing product
    pub fn from_product(product: &Product) -> Self {
        Self {
            title: product.title.clone(),
            price: product.price.to_string(),
            description: product.description.clone(),
            // Products without a category fall back to category 1
            category_id: product.category.as_ref().map_or(1, |c| c.id).to_string(),
            image: product.first_image().unwrap_or_default().to_string(),
        }
    }

    pub fn set(&mut self, field: FormField, value: String) {
        match field {
            FormField::Title => self.title = value,
            FormField::Price => self.price = value,
            FormField::Description => self.description = value,
            FormField::CategoryId => self.category_id = value,
            FormField::Image => self.image = value,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Check every field and build the request body.
    pub fn validate(&self) -> Result<ProductPayload, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::MissingTitle);
        }

        let price = self
            .price
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|p| p.is_finite() && *p >= 1.0)
            .ok_or(ValidationError::InvalidPrice)?;

        let description = self.description.trim();
        if description.is_empty() {
            return Err(ValidationError::MissingDescription);
        }

        let category_id = self
            .category_id
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|id| *id > 0)
            .ok_or(ValidationError::InvalidCategory)?;

        let image = self.image.trim();
        if image.is_empty() {
            return Err(ValidationError::MissingImage);
        }

        Ok(ProductPayload {
            title: title.to_string(),
            price,
            description: description.to_string(),
            category_id,
            images: vec![image.to_string()],
        })
    }
}
