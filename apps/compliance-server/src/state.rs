//! Application state for the compliance server

use std::sync::Arc;

use compliance_engine::ModelClient;
use text_extraction::TextExtractor;

/// Process-wide dependencies, built once at startup and never mutated.
#[derive(Clone)]
pub struct AppState {
    pub extractor: Arc<TextExtractor>,
    pub model_client: Arc<ModelClient>,
}

impl AppState {
    pub fn new(extractor: TextExtractor, model_client: ModelClient) -> Self {
        Self {
            extractor: Arc::new(extractor),
            model_client: Arc::new(model_client),
        }
    }
}
