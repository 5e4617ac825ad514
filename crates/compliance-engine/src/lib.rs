//! Compliance engine
//!
//! Turns extracted policy and webpage text into findings by prompting a
//! generative model and validating its JSON reply.

pub mod client;
pub mod error;
pub mod findings;
pub mod gemini;
pub mod model;
pub mod prompt;

pub use client::ModelClient;
pub use error::{ModelClientError, ModelError};
pub use findings::{parse_findings, FindingValidation};
pub use gemini::{GeminiConfig, GeminiModel};
pub use model::GenerativeModel;
pub use prompt::build_prompt;
