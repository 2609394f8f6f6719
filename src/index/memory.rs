//! In-process semantic index.
//!
//! Serves mock mode and the test suite; contents are lost on restart.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{IndexedDocument, SemanticIndex};
use crate::embeddings::Embedder;
use crate::errors::AppError;

struct Entry {
    embedding: Vec<f32>,
    document: IndexedDocument,
}

pub struct MemoryIndex {
    embedder: Arc<dyn Embedder>,
    entries: RwLock<HashMap<Uuid, Entry>>,
}

impl MemoryIndex {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            embedder,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored documents.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl SemanticIndex for MemoryIndex {
    async fn upsert(&self, documents: Vec<IndexedDocument>) -> Result<(), AppError> {
        if documents.is_empty() {
            return Ok(());
        }

        let texts: Vec<String> = documents.iter().map(|d| d.text.clone()).collect();
        let embeddings = self.embedder.embed_documents(texts).await?;

        let mut entries = self.entries.write().await;
        for (document, embedding) in documents.into_iter().zip(embeddings) {
            // last writer wins per document id
            entries.insert(document.id, Entry { embedding, document });
        }
        Ok(())
    }

    async fn query(&self, text: &str, top_k: usize) -> Result<Vec<IndexedDocument>, AppError> {
        let query = self.embedder.embed_query(text).await?;

        let entries = self.entries.read().await;
        let mut scored: Vec<(f32, &Entry)> = entries
            .values()
            .map(|entry| (cosine_similarity(&query, &entry.embedding), entry))
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        Ok(scored
            .into_iter()
            .take(top_k)
            .map(|(_, entry)| entry.document.clone())
            .collect())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot_product / (norm_a * norm_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::MockEmbedder;
    use crate::index::DocumentMetadata;

    fn doc(id: &str, text: &str, price: f64) -> IndexedDocument {
        IndexedDocument {
            id: Uuid::new_v5(&Uuid::NAMESPACE_OID, id.as_bytes()),
            text: text.to_string(),
            metadata: DocumentMetadata {
                id: id.to_string(),
                name: Some(text.to_string()),
                price: Some(price),
                category: Some("Tools".to_string()),
            },
        }
    }

    fn index() -> MemoryIndex {
        MemoryIndex::new(Arc::new(MockEmbedder::new(256)))
    }

    #[tokio::test]
    async fn repeated_upsert_overwrites_instead_of_duplicating() {
        let index = index();
        let batch = vec![doc("p-1", "Widget", 10.0), doc("p-2", "Gadget", 20.0)];

        index.upsert(batch.clone()).await.unwrap();
        index.upsert(batch).await.unwrap();

        assert_eq!(index.len().await, 2);
    }

    #[tokio::test]
    async fn upsert_replaces_content_for_an_existing_id() {
        let index = index();
        index.upsert(vec![doc("p-1", "Widget", 10.0)]).await.unwrap();
        index
            .upsert(vec![doc("p-1", "Widget mark II", 12.0)])
            .await
            .unwrap();

        assert_eq!(index.len().await, 1);
        let hits = index.query("Widget", 1).await.unwrap();
        assert_eq!(hits[0].text, "Widget mark II");
        assert_eq!(hits[0].metadata.price, Some(12.0));
    }

    #[tokio::test]
    async fn query_ranks_the_closest_text_first_and_caps_at_top_k() {
        let index = index();
        index
            .upsert(vec![
                doc("p-1", "Widget standard", 10.0),
                doc("p-2", "Gadget deluxe", 20.0),
                doc("p-3", "Sprocket mini", 30.0),
            ])
            .await
            .unwrap();

        let hits = index.query("Widget standard", 2).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].metadata.id, "p-1");
    }

    #[tokio::test]
    async fn empty_index_returns_no_hits() {
        let index = index();
        let hits = index.query("anything", 5).await.unwrap();
        assert!(hits.is_empty());
        assert!(index.is_empty().await);
    }
}
