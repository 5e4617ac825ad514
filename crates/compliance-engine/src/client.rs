//! Compliance checks against a shared generative model

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use crate::error::{ModelClientError, ModelError};
use crate::findings::{parse_findings, FindingValidation};
use crate::model::GenerativeModel;
use crate::prompt::build_prompt;

/// Long-lived client shared by every request.
///
/// Immutable after construction; clones share the same model handle.
#[derive(Clone)]
pub struct ModelClient {
    model: Arc<dyn GenerativeModel>,
    validation: FindingValidation,
}

impl ModelClient {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self {
            model,
            validation: FindingValidation::default(),
        }
    }

    pub fn with_validation(mut self, validation: FindingValidation) -> Self {
        self.validation = validation;
        self
    }

    pub fn model_name(&self) -> &str {
        self.model.model_name()
    }

    pub fn validation(&self) -> FindingValidation {
        self.validation
    }

    /// Ask the model which parts of `webpage_text` violate `policy_text`.
    pub async fn check_compliance(
        &self,
        policy_text: &str,
        webpage_text: &str,
    ) -> Result<Vec<Value>, ModelClientError> {
        self.run(policy_text, webpage_text)
            .await
            .map_err(|source| ModelClientError {
                model: self.model_name().to_string(),
                source,
            })
    }

    async fn run(&self, policy_text: &str, webpage_text: &str) -> Result<Vec<Value>, ModelError> {
        let prompt = build_prompt(policy_text, webpage_text);
        let reply = self.model.generate_content(&prompt).await?;
        debug!("Model replied with {} chars", reply.len());

        let findings = self.validation.apply(parse_findings(&reply)?)?;
        info!("Model {} reported {} finding(s)", self.model_name(), findings.len());
        Ok(findings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::error::Error;
    use std::sync::Mutex;

    /// Replies with a fixed string and remembers the last prompt.
    struct CannedModel {
        reply: Result<String, ModelError>,
        last_prompt: Mutex<Option<String>>,
    }

    impl CannedModel {
        fn replying(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(reply.to_string()),
                last_prompt: Mutex::new(None),
            })
        }

        fn failing(err: ModelError) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(err),
                last_prompt: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl GenerativeModel for CannedModel {
        fn model_name(&self) -> &str {
            "canned"
        }

        async fn generate_content(&self, prompt: &str) -> Result<String, ModelError> {
            *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
            self.reply.clone()
        }
    }

    #[tokio::test]
    async fn test_empty_array_means_no_findings() {
        let client = ModelClient::new(CannedModel::replying(" [] \n"));
        let findings = client.check_compliance("policy", "page").await.unwrap();
        assert!(findings.is_empty());
    }

    #[tokio::test]
    async fn test_prompt_carries_both_texts() {
        let model = CannedModel::replying("[]");
        let client = ModelClient::new(model.clone());
        client
            .check_compliance("POLICY-TEXT", "WEBPAGE-TEXT")
            .await
            .unwrap();

        let prompt = model.last_prompt.lock().unwrap().clone().unwrap();
        assert!(prompt.contains("POLICY-TEXT"));
        assert!(prompt.contains("WEBPAGE-TEXT"));
    }

    #[tokio::test]
    async fn test_findings_returned_in_order() {
        let client = ModelClient::new(CannedModel::replying(
            r#"[{"violatingText": "first"}, {"violatingText": "second"}]"#,
        ));
        let findings = client.check_compliance("p", "w").await.unwrap();
        assert_eq!(
            findings,
            vec![
                json!({"violatingText": "first"}),
                json!({"violatingText": "second"})
            ]
        );
    }

    #[tokio::test]
    async fn test_prose_reply_is_model_client_error() {
        let client = ModelClient::new(CannedModel::replying("I found no issues."));
        let err = client.check_compliance("p", "w").await.unwrap_err();

        assert!(matches!(err.source, ModelError::InvalidJson(_)));
        assert!(err.to_string().starts_with("Model client error (canned): model reply is not valid JSON"));
        assert!(err.source().is_some(), "cause is preserved");
    }

    #[tokio::test]
    async fn test_object_reply_is_rejected() {
        let client = ModelClient::new(CannedModel::replying(r#"{"findings": []}"#));
        let err = client.check_compliance("p", "w").await.unwrap_err();
        assert_eq!(err.source, ModelError::NotAnArray("object"));
    }

    #[tokio::test]
    async fn test_provider_failure_keeps_cause() {
        let client = ModelClient::new(CannedModel::failing(ModelError::RateLimited));
        let err = client.check_compliance("p", "w").await.unwrap_err();
        assert_eq!(
            err,
            ModelClientError {
                model: "canned".to_string(),
                source: ModelError::RateLimited,
            }
        );
        assert_eq!(err.to_string(), "Model client error (canned): provider rate limited");
    }

    #[tokio::test]
    async fn test_strict_validation_applies() {
        let client = ModelClient::new(CannedModel::replying(r#"[{"violatingText": "x"}]"#))
            .with_validation(FindingValidation::Strict);
        let err = client.check_compliance("p", "w").await.unwrap_err();
        assert!(matches!(err.source, ModelError::InvalidFinding { index: 0, .. }));
    }
}
