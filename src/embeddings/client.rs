use std::time::Duration;

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::config::EmbeddingsConfig;
use crate::errors::AppError;

#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, AppError>;
    async fn embed_documents(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, AppError>;
}

/// OpenAI-format embeddings API client.
pub struct CloudEmbedder {
    client: reqwest::Client,
    config: EmbeddingsConfig,
}

impl CloudEmbedder {
    pub fn new(config: EmbeddingsConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::EmbeddingError(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    async fn embed_batch(&self, input: serde_json::Value) -> Result<Vec<Vec<f32>>, AppError> {
        let payload = serde_json::json!({
            "input": input,
            "model": self.config.model,
        });

        let res = self
            .client
            .post(&self.config.api_url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::EmbeddingError(format!("Request failed: {e}")))?;

        if !res.status().is_success() {
            return Err(AppError::EmbeddingError(format!(
                "API error: {}",
                res.status()
            )));
        }

        let body: serde_json::Value = res
            .json()
            .await
            .map_err(|e| AppError::EmbeddingError(format!("Parse error: {e}")))?;

        // Response format: data[i].embedding, in input order
        body["data"]
            .as_array()
            .ok_or_else(|| AppError::EmbeddingError("Invalid response format".to_string()))?
            .iter()
            .map(|entry| {
                entry["embedding"]
                    .as_array()
                    .and_then(|values| {
                        values
                            .iter()
                            .map(|v| v.as_f64().map(|f| f as f32))
                            .collect::<Option<Vec<f32>>>()
                    })
                    .ok_or_else(|| AppError::EmbeddingError("Invalid response format".to_string()))
            })
            .collect()
    }
}

#[async_trait]
impl Embedder for CloudEmbedder {
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, AppError> {
        let mut embeddings = self.embed_batch(serde_json::json!(text)).await?;
        if embeddings.is_empty() {
            return Err(AppError::EmbeddingError("Empty response".to_string()));
        }
        Ok(embeddings.swap_remove(0))
    }

    async fn embed_documents(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, AppError> {
        if texts.is_empty() {
            return Ok(vec![]);
        }
        let expected = texts.len();
        let embeddings = self.embed_batch(serde_json::json!(texts)).await?;
        if embeddings.len() != expected {
            return Err(AppError::EmbeddingError(format!(
                "Expected {expected} embeddings, got {}",
                embeddings.len()
            )));
        }
        Ok(embeddings)
    }
}

/// Deterministic local embedder for mock mode and tests.
///
/// Hashes lowercase alphanumeric tokens into a fixed number of buckets and
/// L2-normalizes the counts: identical text always maps to the same vector,
/// and shared tokens produce genuine similarity signal.
pub struct MockEmbedder {
    dim: usize,
}

impl MockEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim: dim.max(1) }
    }

    fn embed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dim];
        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let digest = Sha256::digest(token.to_lowercase().as_bytes());
            let bucket =
                u32::from_le_bytes([digest[0], digest[1], digest[2], digest[3]]) as usize % self.dim;
            vector[bucket] += 1.0;
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut vector {
                *x /= norm;
            }
        }
        vector
    }
}

#[async_trait]
impl Embedder for MockEmbedder {
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, AppError> {
        Ok(self.embed(text))
    }

    async fn embed_documents(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, AppError> {
        Ok(texts.iter().map(|t| self.embed(t)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dot(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(x, y)| x * y).sum()
    }

    #[tokio::test]
    async fn identical_text_embeds_identically() {
        let embedder = MockEmbedder::new(128);
        let a = embedder.embed_query("Widget by Acme").await.unwrap();
        let b = embedder.embed_query("Widget by Acme").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn vectors_are_unit_length() {
        let embedder = MockEmbedder::new(128);
        let v = embedder.embed_query("laptop 15 inch").await.unwrap();
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn shared_tokens_score_higher_than_disjoint() {
        let embedder = MockEmbedder::new(128);
        let query = embedder.embed_query("Widget").await.unwrap();
        let related = embedder.embed_query("Name: Widget standard").await.unwrap();
        let unrelated = embedder.embed_query("Gochujang sauce jar").await.unwrap();
        assert!(dot(&query, &related) > dot(&query, &unrelated));
    }

    #[tokio::test]
    async fn batch_order_matches_input_order() {
        let embedder = MockEmbedder::new(64);
        let texts = vec!["alpha".to_string(), "beta".to_string()];
        let batch = embedder.embed_documents(texts).await.unwrap();
        assert_eq!(batch[0], embedder.embed_query("alpha").await.unwrap());
        assert_eq!(batch[1], embedder.embed_query("beta").await.unwrap());
    }
}
