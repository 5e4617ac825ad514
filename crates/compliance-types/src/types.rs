use std::fmt;

use serde_json::{Map, Value};
use url::Url;

/// Summary returned when the model reports no violations.
pub const COMPLIANT_SUMMARY: &str = "The webpage is fully compliant with the policy.";

/// Field names every finding is expected to carry, in prompt order.
pub const FINDING_FIELDS: [&str; 5] = [
    "webpageSection",
    "violatingText",
    "policySection",
    "policyPart",
    "suggestion",
];

/// A validated request body for `POST /check-compliance`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceRequest {
    pub webpage_url: Url,
    pub policy_url: Url,
}

/// One policy violation as the model is instructed to report it.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceFinding {
    pub webpage_section: String,
    pub violating_text: String,
    pub policy_section: String,
    pub policy_part: String,
    pub suggestion: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>, // Anything the model added beyond the five fields
}

/// Response body for a successful compliance check.
///
/// Findings stay as JSON values so the configured finding policy decides how
/// much of the model's output is reshaped before it reaches the caller.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceResponse {
    pub findings: Vec<Value>,
    pub is_compliant: bool,
    pub summary: String,
}

impl ComplianceResponse {
    /// Builds the response, deriving `is_compliant` and `summary` from the findings.
    pub fn from_findings(findings: Vec<Value>) -> Self {
        let is_compliant = findings.is_empty();
        let summary = if is_compliant {
            COMPLIANT_SUMMARY.to_string()
        } else {
            format!(
                "The webpage has {} violation(s). Please review the findings for details.",
                findings.len()
            )
        };

        Self {
            findings,
            is_compliant,
            summary,
        }
    }
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, serde::Serialize, serde::Deserialize)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: String, // Empty when the body itself is the problem
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Which of the two input documents an operation concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentRole {
    Policy,
    Webpage,
}

impl fmt::Display for DocumentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentRole::Policy => write!(f, "policy"),
            DocumentRole::Webpage => write!(f, "webpage"),
        }
    }
}
