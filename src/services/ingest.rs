//! Catalog ingestion into the semantic index.
//!
//! Runs once at startup and on demand via the reset endpoint. The whole batch
//! is the unit of work: either every product document is handed to the index
//! in one upsert call, or nothing is written.

use std::sync::Arc;
use std::time::Instant;

use uuid::Uuid;

use crate::catalog::{JsonCatalog, Product};
use crate::errors::AppError;
use crate::index::{DocumentMetadata, IndexedDocument, SemanticIndex};

/// Outcome of one ingestion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestionOutcome {
    /// The catalog was embedded and upserted (document count).
    Ingested(usize),
    /// A probe query found existing data; nothing was written.
    Skipped,
}

pub struct IngestService {
    catalog: JsonCatalog,
    index: Arc<dyn SemanticIndex>,
}

impl IngestService {
    pub fn new(catalog: JsonCatalog, index: Arc<dyn SemanticIndex>) -> Self {
        Self { catalog, index }
    }

    /// Load the catalog and upsert it into the semantic index.
    ///
    /// With `force` unset, a top-1 probe for the first product's name decides
    /// whether the data is already present. A failed probe counts as "not yet
    /// ingested": wrongly re-ingesting is idempotent, wrongly skipping is not.
    pub async fn ingest(&self, force: bool) -> Result<IngestionOutcome, AppError> {
        let start = Instant::now();

        tracing::info!("Loading products from catalog...");
        let products = self.catalog.load().await?;

        if products.is_empty() {
            tracing::info!("Catalog is empty, nothing to ingest");
            return Ok(IngestionOutcome::Ingested(0));
        }

        if !force && self.already_ingested(&products[0]).await {
            tracing::info!(
                probe = %products[0].name,
                "Existing data found, skipping ingestion"
            );
            return Ok(IngestionOutcome::Skipped);
        }

        tracing::info!(products = products.len(), "Converting products to documents...");
        let documents: Vec<IndexedDocument> = products.iter().map(document_from_product).collect();
        let count = documents.len();

        self.index.upsert(documents).await?;

        metrics::counter!("pricelens_ingest_runs_total").increment(1);
        metrics::counter!("pricelens_ingest_documents_total").increment(count as u64);
        metrics::histogram!("pricelens_ingest_duration_seconds")
            .record(start.elapsed().as_secs_f64());

        tracing::info!(
            documents = count,
            total_ms = start.elapsed().as_millis(),
            "Catalog ingested"
        );
        Ok(IngestionOutcome::Ingested(count))
    }

    /// Best-effort existence probe. Errors (index unreachable, collection not
    /// created yet) count as "not ingested" so they never block ingestion.
    async fn already_ingested(&self, first: &Product) -> bool {
        match self.index.query(&first.name, 1).await {
            Ok(hits) => !hits.is_empty(),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Could not check existing data, proceeding with ingestion"
                );
                false
            }
        }
    }
}

/// Maps a product to its indexed document.
///
/// The document id is a UUIDv5 of the product id, so re-ingesting the same
/// catalog overwrites instead of duplicating. The text field order is part of
/// the retrieval contract: it determines what the embedding captures.
pub fn document_from_product(product: &Product) -> IndexedDocument {
    let description = product.description.as_deref().unwrap_or("");
    let text = format!(
        "Name: {}\nDescription: {}\nCategory: {}\nPrice: {}\nBrand: {}\nSource: {}",
        product.name, description, product.category, product.price, product.brand, product.source
    );

    IndexedDocument {
        id: Uuid::new_v5(&Uuid::NAMESPACE_OID, product.id.as_bytes()),
        text,
        metadata: DocumentMetadata {
            id: product.id.clone(),
            name: Some(product.name.clone()),
            price: Some(product.price),
            category: Some(product.category.clone()),
        },
    }
}
