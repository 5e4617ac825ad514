//! Gemini REST client (`models/{model}:generateContent`).

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::debug;

use crate::error::ModelError;
use crate::model::GenerativeModel;

pub const DEFAULT_MODEL: &str = "gemini-1.5-pro";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// May be empty; calls then fail with [`ModelError::MissingApiKey`].
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Option<Duration>,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Clone)]
pub struct GeminiModel {
    http: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl GeminiModel {
    pub fn new(config: GeminiConfig) -> Result<Self, ModelError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|err| ModelError::Config(format!("failed to build HTTP client: {err}")))?;

        let base_url = config.base_url.trim_end_matches('/');
        reqwest::Url::parse(base_url)
            .map_err(|err| ModelError::Config(format!("invalid base URL {base_url:?}: {err}")))?;
        let endpoint = format!("{}/models/{}:generateContent", base_url, config.model);

        Ok(Self {
            http,
            api_key: config.api_key,
            model: config.model,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl GenerativeModel for GeminiModel {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn generate_content(&self, prompt: &str) -> Result<String, ModelError> {
        if self.api_key.trim().is_empty() {
            return Err(ModelError::MissingApiKey);
        }

        debug!("Calling {} with a {} char prompt", self.model, prompt.len());

        let response = self
            .http
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body(prompt))
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    ModelError::Timeout
                } else {
                    ModelError::Network(err.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status, response.text().await));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|err| ModelError::InvalidResponse(err.to_string()))?;

        reply_text(&body)
    }
}

/// Map a non-success status, and the attempt to read its body, to an error.
fn status_error<E: fmt::Display>(status: StatusCode, body: Result<String, E>) -> ModelError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ModelError::Auth(status.as_u16()),
        StatusCode::TOO_MANY_REQUESTS => ModelError::RateLimited,
        _ => match body {
            Ok(body) => ModelError::InvalidResponse(format!("status {status} body {body}")),
            Err(err) => {
                ModelError::InvalidResponse(format!("status {status}, body unreadable: {err}"))
            }
        },
    }
}

/// JSON payload for a single-turn generateContent call.
pub fn request_body(prompt: &str) -> Value {
    serde_json::json!({
        "contents": [
            {
                "role": "user",
                "parts": [{ "text": prompt }]
            }
        ],
        "generationConfig": {
            "responseMimeType": "application/json"
        }
    })
}

/// Concatenated text parts of the first candidate.
pub fn reply_text(body: &Value) -> Result<String, ModelError> {
    if let Some(reason) = body
        .get("promptFeedback")
        .and_then(|feedback| feedback.get("blockReason"))
        .and_then(Value::as_str)
    {
        return Err(ModelError::InvalidResponse(format!(
            "prompt blocked: {reason}"
        )));
    }

    let parts = body
        .get("candidates")
        .and_then(Value::as_array)
        .and_then(|candidates| candidates.first())
        .and_then(|candidate| candidate.get("content"))
        .and_then(|content| content.get("parts"))
        .and_then(Value::as_array)
        .ok_or_else(|| ModelError::InvalidResponse("missing text candidate".to_string()))?;

    let text: String = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect();

    if text.is_empty() {
        return Err(ModelError::InvalidResponse(
            "candidate has no text parts".to_string(),
        ));
    }
    Ok(text)
}
