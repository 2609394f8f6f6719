use config::{Config, ConfigError, Environment};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub catalog: CatalogConfig,
    pub index: IndexConfig,
    pub embeddings: EmbeddingsConfig,
    pub llm: LlmConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub rust_log: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct IndexConfig {
    /// Qdrant base URL, or "memory" for the in-process index.
    pub url: String,
    pub collection: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmbeddingsConfig {
    /// OpenAI-format embeddings endpoint; "mock" as api_key selects the local embedder.
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub embedding_dim: usize,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LlmConfig {
    /// OpenAI-format chat completions endpoint; "mock" as api_key selects the canned generator.
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl AppConfig {
    pub fn build() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            // Start with defaults; mock keys make the service bootable offline
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("server.rust_log", "info,pricelens=debug")?
            .set_default("catalog.path", "data/products.json")?
            .set_default("index.url", "memory")?
            .set_default("index.collection", "products")?
            .set_default("index.timeout_secs", 10)?
            .set_default("embeddings.api_url", "https://api.openai.com/v1/embeddings")?
            .set_default("embeddings.api_key", "mock")?
            .set_default("embeddings.model", "text-embedding-3-small")?
            .set_default("embeddings.embedding_dim", 768)?
            .set_default("embeddings.timeout_secs", 10)?
            .set_default("llm.api_url", "https://api.openai.com/v1/chat/completions")?
            .set_default("llm.api_key", "mock")?
            .set_default("llm.model", "gpt-4o-mini")?
            .set_default("llm.timeout_secs", 60)?
            // Add in settings from environment variables (with a prefix of APP)
            // E.g. `APP_INDEX__URL=http://localhost:6333` sets `IndexConfig.url`
            .add_source(Environment::default().separator("__").prefix("APP"));

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_boot_in_mock_mode() {
        let config = AppConfig::build().expect("default config");
        assert_eq!(config.index.url, "memory");
        assert_eq!(config.embeddings.api_key, "mock");
        assert_eq!(config.llm.api_key, "mock");
        assert!(config.embeddings.embedding_dim > 0);
    }
}
