use async_trait::async_trait;

use crate::error::ModelError;

/// A text-in, text-out generative model.
///
/// Implementations are constructed once and shared across requests, so they
/// must not hold per-call mutable state.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Model identifier, for logs and error messages.
    fn model_name(&self) -> &str;

    /// Send `prompt` and return the model's raw text reply.
    async fn generate_content(&self, prompt: &str) -> Result<String, ModelError>;
}
