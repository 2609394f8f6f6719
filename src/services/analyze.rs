//! Retrieval-augmented price analysis.
//!
//! One index round trip, one model round trip. The retrieved list rides along
//! with the narrative so downstream aggregation works off the identical set —
//! there is no second retrieval anywhere in a request.

use std::sync::Arc;
use std::time::Instant;

use crate::errors::AppError;
use crate::index::{IndexedDocument, SemanticIndex};
use crate::llm::Generator;

/// How many neighbours feed the report context.
const TOP_K: usize = 10;

/// Separator between retrieved documents in the prompt context.
const CONTEXT_DELIMITER: &str = "\n---\n";

/// Narrative report plus the exact retrieved set it was generated from.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub narrative: String,
    /// Retrieval order, most relevant first, never re-sorted.
    pub documents: Vec<IndexedDocument>,
}

pub struct AnalysisService {
    index: Arc<dyn SemanticIndex>,
    generator: Arc<dyn Generator>,
}

impl AnalysisService {
    pub fn new(index: Arc<dyn SemanticIndex>, generator: Arc<dyn Generator>) -> Self {
        Self { index, generator }
    }

    /// Produce a pricing report for `product_name` proposed at `price`.
    ///
    /// Fails as a whole: a retrieval or generation error yields no partial
    /// result.
    pub async fn analyze(
        &self,
        product_name: &str,
        price: f64,
    ) -> Result<AnalysisResult, AppError> {
        let start = Instant::now();

        // Text similarity only; the price is prompt and aggregation input,
        // not a query signal.
        let documents = self.index.query(product_name, TOP_K).await?;

        let context = build_context(&documents);
        let prompt = build_prompt(product_name, price, &context);
        tracing::debug!(prompt_chars = prompt.len(), "Prompt assembled");

        let narrative = self.generator.generate(&prompt).await?;

        metrics::counter!("pricelens_analyze_requests_total").increment(1);
        metrics::histogram!("pricelens_analyze_duration_seconds")
            .record(start.elapsed().as_secs_f64());

        tracing::info!(
            product = product_name,
            retrieved = documents.len(),
            total_ms = start.elapsed().as_millis(),
            "Analysis complete"
        );

        Ok(AnalysisResult {
            narrative,
            documents,
        })
    }
}

/// Concatenates document bodies in retrieval order.
pub fn build_context(documents: &[IndexedDocument]) -> String {
    documents
        .iter()
        .map(|d| d.text.as_str())
        .collect::<Vec<_>>()
        .join(CONTEXT_DELIMITER)
}

/// Fixed-structure report prompt. Pure, so it is testable without the model.
pub fn build_prompt(product_name: &str, price: f64, context: &str) -> String {
    format!(
        "You are a pricing strategy expert.\n\
         Respond in English, formatted as a report.\n\
         \n\
         A seller wants to list the product \"{product_name}\" at a price of {price}.\n\
         \n\
         The following are similar products currently on the market (context):\n\
         {context}\n\
         \n\
         Analyze the seller's price against the market.\n\
         Expose the price of each comparable product found in the context.\n\
         Calculate the average price of the similar products in the context.\n\
         Judge whether the seller's price is competitive (too high, too low, or fair).\n\
         Provide a brief recommendation."
    )
}
