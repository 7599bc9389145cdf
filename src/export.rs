/// CSV export of the visible table page
///
/// Only the rows of the active page are exported. A field is quoted
/// when it contains a comma, a double quote or a line break; quotes
/// inside a quoted field are doubled.

use csv::{QuoteStyle, Terminator, WriterBuilder};
use rfd::AsyncFileDialog;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::state::data::Product;

/// Default file name offered in the save dialog
pub const EXPORT_FILE_NAME: &str = "products-current-view.csv";

const HEADERS: [&str; 5] = ["id", "title", "price", "category", "images"];

/// Separator between image URLs inside the `images` column
const IMAGE_SEPARATOR: &str = " | ";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to build CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to write CSV file: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV output is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Serialize rows to CSV text, header first, one `\n`-terminated line per row
pub fn to_csv(rows: &[Product]) -> Result<String, ExportError> {
    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    wtr.write_record(HEADERS)?;

    for product in rows {
        wtr.write_record([
            product.id.to_string(),
            product.title.clone(),
            product.price.to_string(),
            product.category_name().to_string(),
            product.images.join(IMAGE_SEPARATOR),
        ])?;
    }

    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

/// Write rows as CSV to `path`
pub async fn write_csv(path: &Path, rows: &[Product]) -> Result<(), ExportError> {
    tokio::fs::write(path, to_csv(rows)?).await?;
    Ok(())
}

/// Ask the user where to save the CSV, then write it.
///
/// Returns the saved path, or `None` if the dialog was cancelled.
pub async fn export_to_csv(
    filename: String,
    directory: Option<PathBuf>,
    rows: Vec<Product>,
) -> Result<Option<PathBuf>, ExportError> {
    let mut dialog = AsyncFileDialog::new()
        .set_title("Export current page")
        .set_file_name(filename)
        .add_filter("CSV", &["csv"]);
    if let Some(directory) = directory {
        dialog = dialog.set_directory(directory);
    }

    let Some(handle) = dialog.save_file().await else {
        info!("CSV export cancelled");
        return Ok(None);
    };

    let path = handle.path().to_path_buf();
    write_csv(&path, &rows).await?;

    info!(path = %path.display(), rows = rows.len(), "Exported current page");
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::Category;

    fn product(id: i64, title: &str) -> Product {
        Product {
            id,
            title: title.to_string(),
            price: 12.5,
            description: String::new(),
            category: Some(Category { id: 1, name: "Shoes".to_string() }),
            images: vec!["https://img/a.png".to_string()],
        }
    }

    #[test]
    fn test_header_only_for_empty_page() {
        assert_eq!(to_csv(&[]).unwrap(), "id,title,price,category,images\n");
    }

    #[test]
    fn test_plain_fields_are_bare() {
        let csv = to_csv(&[product(1, "Sneaker")]).unwrap();

        assert_eq!(
            csv,
            "id,title,price,category,images\n1,Sneaker,12.5,Shoes,https://img/a.png\n"
        );
    }

    #[test]
    fn test_comma_in_title_is_quoted() {
        let csv = to_csv(&[product(2, "Red, Large")]).unwrap();

        assert_eq!(csv.lines().nth(1), Some("2,\"Red, Large\",12.5,Shoes,https://img/a.png"));
    }

    #[test]
    fn test_double_quote_is_doubled() {
        let csv = to_csv(&[product(3, "Bob's \"Special\"")]).unwrap();

        assert!(csv.contains(",\"Bob's \"\"Special\"\"\","));
    }

    #[test]
    fn test_newline_is_quoted() {
        let csv = to_csv(&[product(4, "two\nlines")]).unwrap();

        assert!(csv.contains("4,\"two\nlines\",12.5"));
    }

    #[test]
    fn test_images_are_joined_and_missing_category_is_empty() {
        let mut item = product(5, "Bag");
        item.category = None;
        item.price = 100.0;
        item.images = vec!["a.png".to_string(), "b,c.png".to_string()];

        let csv = to_csv(&[item]).unwrap();

        assert_eq!(csv.lines().nth(1), Some("5,Bag,100,,\"a.png | b,c.png\""));
    }

    #[tokio::test]
    async fn test_write_csv_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(EXPORT_FILE_NAME);

        write_csv(&path, &[product(1, "Sneaker"), product(2, "Boot")])
            .await
            .unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written.lines().count(), 3);
        assert!(written.starts_with("id,title,price,category,images\n"));
    }
}
