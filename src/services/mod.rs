use std::sync::Arc;

use crate::catalog::JsonCatalog;
use crate::index::SemanticIndex;
use crate::llm::Generator;

pub mod aggregate;
pub mod analyze;
pub mod ingest;

// A container for all services to be injected into routes
#[derive(Clone)]
pub struct AppState {
    pub ingest_service: Arc<ingest::IngestService>,
    pub analysis_service: Arc<analyze::AnalysisService>,
}

impl AppState {
    pub fn new(
        catalog: JsonCatalog,
        index: Arc<dyn SemanticIndex>,
        generator: Arc<dyn Generator>,
    ) -> Self {
        Self {
            ingest_service: Arc::new(ingest::IngestService::new(catalog, index.clone())),
            analysis_service: Arc::new(analyze::AnalysisService::new(index, generator)),
        }
    }
}
