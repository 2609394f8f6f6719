//! Semantic index capability: text+metadata documents keyed by embedding
//! vectors, with upsert-by-id and top-K nearest-neighbour queries.

mod memory;
mod qdrant;

pub use memory::MemoryIndex;
pub use qdrant::QdrantIndex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;

/// Fixed metadata schema stored alongside each document.
///
/// Ingestion always populates every field; documents read back from the index
/// are not trusted implicitly, so everything but the id deserializes leniently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub category: Option<String>,
}

/// An embeddable document derived from one catalog product.
///
/// The id is a pure function of the product id, which is what makes repeated
/// ingestion an overwrite instead of a duplication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedDocument {
    pub id: Uuid,
    pub text: String,
    pub metadata: DocumentMetadata,
}

#[async_trait]
pub trait SemanticIndex: Send + Sync {
    /// Insert-or-overwrite the whole batch, keyed by document id.
    async fn upsert(&self, documents: Vec<IndexedDocument>) -> Result<(), AppError>;

    /// The `top_k` documents most similar to the query text, most relevant
    /// first. Callers must not re-sort the result.
    async fn query(&self, text: &str, top_k: usize) -> Result<Vec<IndexedDocument>, AppError>;

    /// Cheap connectivity check used by the readiness probe.
    async fn ping(&self) -> Result<(), AppError>;
}
