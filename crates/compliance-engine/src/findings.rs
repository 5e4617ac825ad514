//! Parsing and shaping of the model's findings array

use std::fmt;
use std::str::FromStr;

use compliance_types::{ComplianceFinding, FINDING_FIELDS};
use serde_json::{Map, Value};

use crate::error::ModelError;

/// How strictly individual findings are checked against the five-field contract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FindingValidation {
    /// Return array elements exactly as the model produced them.
    #[default]
    PassThrough,
    /// Require objects; fill missing fields with "" and stringify non-strings.
    FillDefaults,
    /// Require objects carrying all five fields as strings.
    Strict,
}

impl FindingValidation {
    pub fn apply(self, findings: Vec<Value>) -> Result<Vec<Value>, ModelError> {
        match self {
            FindingValidation::PassThrough => Ok(findings),
            FindingValidation::FillDefaults => findings
                .into_iter()
                .enumerate()
                .map(|(index, finding)| fill_defaults(index, finding))
                .collect(),
            FindingValidation::Strict => findings
                .into_iter()
                .enumerate()
                .map(|(index, finding)| strict(index, finding))
                .collect(),
        }
    }
}

impl fmt::Display for FindingValidation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FindingValidation::PassThrough => write!(f, "pass-through"),
            FindingValidation::FillDefaults => write!(f, "fill-defaults"),
            FindingValidation::Strict => write!(f, "strict"),
        }
    }
}

impl FromStr for FindingValidation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pass-through" | "passthrough" => Ok(FindingValidation::PassThrough),
            "fill-defaults" | "defaults" => Ok(FindingValidation::FillDefaults),
            "strict" => Ok(FindingValidation::Strict),
            other => Err(format!(
                "Unknown finding validation '{}'. Use pass-through, fill-defaults or strict",
                other
            )),
        }
    }
}

/// Parse the trimmed model reply; only a top-level JSON array is accepted.
pub fn parse_findings(reply: &str) -> Result<Vec<Value>, ModelError> {
    let value: Value = serde_json::from_str(reply.trim())
        .map_err(|err| ModelError::InvalidJson(err.to_string()))?;

    match value {
        Value::Array(findings) => Ok(findings),
        other => Err(ModelError::NotAnArray(json_type_name(&other))),
    }
}

fn fill_defaults(index: usize, finding: Value) -> Result<Value, ModelError> {
    let mut object = into_object(index, finding)?;
    for field in FINDING_FIELDS {
        let filled = match object.remove(field) {
            Some(Value::String(s)) => s,
            None | Some(Value::Null) => String::new(),
            Some(other) => other.to_string(),
        };
        object.insert(field.to_string(), Value::String(filled));
    }
    typed(index, object)
}

fn strict(index: usize, finding: Value) -> Result<Value, ModelError> {
    let object = into_object(index, finding)?;
    for field in FINDING_FIELDS {
        match object.get(field) {
            Some(Value::String(_)) => {}
            None => {
                return Err(ModelError::InvalidFinding {
                    index,
                    reason: format!("missing field `{}`", field),
                })
            }
            Some(other) => {
                return Err(ModelError::InvalidFinding {
                    index,
                    reason: format!(
                        "field `{}` must be a string, got {}",
                        field,
                        json_type_name(other)
                    ),
                })
            }
        }
    }
    typed(index, object)
}

fn into_object(index: usize, finding: Value) -> Result<Map<String, Value>, ModelError> {
    match finding {
        Value::Object(object) => Ok(object),
        other => Err(ModelError::InvalidFinding {
            index,
            reason: format!("expected object, got {}", json_type_name(&other)),
        }),
    }
}

fn typed(index: usize, object: Map<String, Value>) -> Result<Value, ModelError> {
    let invalid = |err: serde_json::Error| ModelError::InvalidFinding {
        index,
        reason: err.to_string(),
    };
    let finding: ComplianceFinding = serde_json::from_value(Value::Object(object)).map_err(invalid)?;
    serde_json::to_value(finding).map_err(invalid)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
