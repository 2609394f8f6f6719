//! Qdrant-backed semantic index over its REST API.
//!
//! Point ids are the deterministic document UUIDs, so a repeated upsert of the
//! same catalog overwrites points in place. Payloads carry the document body
//! plus the fixed metadata schema.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::{DocumentMetadata, IndexedDocument, SemanticIndex};
use crate::config::IndexConfig;
use crate::embeddings::Embedder;
use crate::errors::AppError;

pub struct QdrantIndex {
    client: reqwest::Client,
    config: IndexConfig,
    embedder: Arc<dyn Embedder>,
    embedding_dim: usize,
}

#[derive(Serialize, Deserialize)]
struct PointPayload {
    text: String,
    #[serde(flatten)]
    metadata: DocumentMetadata,
}

#[derive(Serialize)]
struct Point<'a> {
    id: Uuid,
    vector: &'a [f32],
    payload: PointPayload,
}

#[derive(Deserialize)]
struct SearchResponse {
    result: Vec<ScoredPoint>,
}

#[derive(Deserialize)]
struct ScoredPoint {
    id: Uuid,
    payload: PointPayload,
}

impl QdrantIndex {
    pub fn new(
        config: IndexConfig,
        embedder: Arc<dyn Embedder>,
        embedding_dim: usize,
    ) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::IndexUnavailable(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            config,
            embedder,
            embedding_dim,
        })
    }

    fn collection_url(&self) -> String {
        format!(
            "{}/collections/{}",
            self.config.url.trim_end_matches('/'),
            self.config.collection
        )
    }

    /// Create the collection if it does not exist yet (cosine distance).
    pub async fn ensure_collection(&self) -> Result<(), AppError> {
        let res = self
            .client
            .get(self.collection_url())
            .send()
            .await
            .map_err(|e| AppError::IndexUnavailable(format!("Request failed: {e}")))?;

        if res.status().is_success() {
            return Ok(());
        }
        if res.status() != reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::IndexUnavailable(format!(
                "API error: {}",
                res.status()
            )));
        }

        let body = json!({
            "vectors": { "size": self.embedding_dim, "distance": "Cosine" }
        });
        let res = self
            .client
            .put(self.collection_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::IndexUnavailable(format!("Request failed: {e}")))?;

        if !res.status().is_success() {
            return Err(AppError::IndexUnavailable(format!(
                "Could not create collection: {}",
                res.status()
            )));
        }

        tracing::info!(collection = %self.config.collection, "Created Qdrant collection");
        Ok(())
    }
}

#[async_trait]
impl SemanticIndex for QdrantIndex {
    async fn upsert(&self, documents: Vec<IndexedDocument>) -> Result<(), AppError> {
        if documents.is_empty() {
            return Ok(());
        }

        let texts: Vec<String> = documents.iter().map(|d| d.text.clone()).collect();
        let embeddings = self.embedder.embed_documents(texts).await?;

        let points: Vec<Point> = documents
            .iter()
            .zip(embeddings.iter())
            .map(|(doc, vector)| Point {
                id: doc.id,
                vector,
                payload: PointPayload {
                    text: doc.text.clone(),
                    metadata: doc.metadata.clone(),
                },
            })
            .collect();

        let res = self
            .client
            .put(format!("{}/points?wait=true", self.collection_url()))
            .json(&json!({ "points": points }))
            .send()
            .await
            .map_err(|e| AppError::IndexUnavailable(format!("Request failed: {e}")))?;

        if !res.status().is_success() {
            return Err(AppError::IndexUnavailable(format!(
                "Upsert rejected: {}",
                res.status()
            )));
        }
        Ok(())
    }

    async fn query(&self, text: &str, top_k: usize) -> Result<Vec<IndexedDocument>, AppError> {
        let vector = self.embedder.embed_query(text).await?;

        let body = json!({
            "vector": vector,
            "limit": top_k,
            "with_payload": true,
        });
        let res = self
            .client
            .post(format!("{}/points/search", self.collection_url()))
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::IndexUnavailable(format!("Request failed: {e}")))?;

        if !res.status().is_success() {
            return Err(AppError::IndexUnavailable(format!(
                "Search rejected: {}",
                res.status()
            )));
        }

        let parsed: SearchResponse = res
            .json()
            .await
            .map_err(|e| AppError::IndexUnavailable(format!("Parse error: {e}")))?;

        // Hits arrive ordered by decreasing score; keep that order
        Ok(parsed
            .result
            .into_iter()
            .map(|point| IndexedDocument {
                id: point.id,
                text: point.payload.text,
                metadata: point.payload.metadata,
            })
            .collect())
    }

    async fn ping(&self) -> Result<(), AppError> {
        let res = self
            .client
            .get(self.collection_url())
            .send()
            .await
            .map_err(|e| AppError::IndexUnavailable(format!("Request failed: {e}")))?;

        if res.status().is_success() {
            Ok(())
        } else {
            Err(AppError::IndexUnavailable(format!(
                "API error: {}",
                res.status()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_round_trips_through_a_flattened_json_object() {
        let payload = PointPayload {
            text: "Name: Widget".to_string(),
            metadata: DocumentMetadata {
                id: "p-1".to_string(),
                name: Some("Widget".to_string()),
                price: Some(10.0),
                category: Some("Tools".to_string()),
            },
        };

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["text"], "Name: Widget");
        assert_eq!(value["price"], 10.0);

        let back: PointPayload = serde_json::from_value(value).unwrap();
        assert_eq!(back.metadata, payload.metadata);
    }

    #[test]
    fn payload_tolerates_missing_optional_metadata() {
        let value = json!({ "text": "Name: Widget", "id": "p-1" });
        let payload: PointPayload = serde_json::from_value(value).unwrap();
        assert_eq!(payload.metadata.name, None);
        assert_eq!(payload.metadata.price, None);
    }
}
