//! Static product catalog.
//!
//! The catalog is a JSON array of marketplace listings shipped with the
//! service. Products are immutable once loaded for a given ingestion run.

use std::path::PathBuf;

use serde::Deserialize;

use crate::errors::AppError;

/// One catalog listing. `id` is stable and externally assigned.
#[derive(Debug, Clone, Deserialize)]
pub struct Product {
    pub id: String,
    #[serde(rename = "product_name")]
    pub name: String,
    pub price: f64,
    pub category: String,
    pub brand: String,
    /// Marketplace the listing was observed on.
    pub source: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct JsonCatalog {
    path: PathBuf,
}

impl JsonCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read and parse the catalog file.
    ///
    /// Any read or parse failure is a [`AppError::LoadError`]; prices must be
    /// non-negative finite numbers.
    pub async fn load(&self) -> Result<Vec<Product>, AppError> {
        let data = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| AppError::LoadError(format!("{}: {}", self.path.display(), e)))?;

        let products: Vec<Product> = serde_json::from_str(&data)
            .map_err(|e| AppError::LoadError(format!("{}: {}", self.path.display(), e)))?;

        for product in &products {
            // `!(>= 0)` also rejects NaN
            if !(product.price >= 0.0) || !product.price.is_finite() {
                return Err(AppError::LoadError(format!(
                    "product '{}' has invalid price {}",
                    product.id, product.price
                )));
            }
        }

        Ok(products)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn write_catalog(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp catalog");
        file.write_all(content.as_bytes()).expect("write catalog");
        file
    }

    #[tokio::test]
    async fn parses_listings_with_optional_description() {
        let file = write_catalog(
            r#"[
                {"id": "p-1", "product_name": "Widget", "price": 10.0,
                 "category": "Tools", "brand": "Acme", "source": "acme-store",
                 "description": "A standard widget"},
                {"id": "p-2", "product_name": "Gadget", "price": 25.5,
                 "category": "Tools", "brand": "Acme", "source": "acme-store"}
            ]"#,
        );

        let products = JsonCatalog::new(file.path()).load().await.expect("load");
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].name, "Widget");
        assert_eq!(products[1].description, None);
    }

    #[tokio::test]
    async fn malformed_json_is_a_load_error() {
        let file = write_catalog("{ definitely not a product list");
        let err = JsonCatalog::new(file.path()).load().await.unwrap_err();
        assert!(matches!(err, AppError::LoadError(_)));
    }

    #[tokio::test]
    async fn missing_file_is_a_load_error() {
        let catalog = JsonCatalog::new("/nonexistent/products.json");
        let err = catalog.load().await.unwrap_err();
        assert!(matches!(err, AppError::LoadError(_)));
    }

    #[tokio::test]
    async fn negative_price_is_rejected() {
        let file = write_catalog(
            r#"[{"id": "p-1", "product_name": "Widget", "price": -1.0,
                 "category": "Tools", "brand": "Acme", "source": "acme-store"}]"#,
        );
        let err = JsonCatalog::new(file.path()).load().await.unwrap_err();
        assert!(matches!(err, AppError::LoadError(_)));
    }
}
