//! Request body validation
//!
//! Runs before any network work. Every invalid field produces exactly one
//! [`FieldError`]; unknown keys are ignored.

use serde_json::Value;
use url::Url;

use crate::types::{ComplianceRequest, FieldError};

pub const WEBPAGE_URL_FIELD: &str = "webpageUrl";
pub const POLICY_URL_FIELD: &str = "policyUrl";

/// Validate an arbitrary JSON body into a [`ComplianceRequest`].
pub fn validate_request(body: &Value) -> Result<ComplianceRequest, Vec<FieldError>> {
    let Some(object) = body.as_object() else {
        return Err(vec![FieldError::new(
            "",
            format!("Expected object, received {}", json_type_name(body)),
        )]);
    };

    let webpage_url = validate_url_field(object.get(WEBPAGE_URL_FIELD), WEBPAGE_URL_FIELD);
    let policy_url = validate_url_field(object.get(POLICY_URL_FIELD), POLICY_URL_FIELD);

    match (webpage_url, policy_url) {
        (Ok(webpage_url), Ok(policy_url)) => Ok(ComplianceRequest {
            webpage_url,
            policy_url,
        }),
        (webpage_url, policy_url) => Err([webpage_url.err(), policy_url.err()]
            .into_iter()
            .flatten()
            .collect()),
    }
}

fn validate_url_field(value: Option<&Value>, field: &str) -> Result<Url, FieldError> {
    let raw = match value {
        None | Some(Value::Null) => {
            return Err(FieldError::new(field, format!("{} is required", field)))
        }
        Some(Value::String(s)) => s,
        Some(other) => {
            return Err(FieldError::new(
                field,
                format!("Expected string, received {}", json_type_name(other)),
            ))
        }
    };

    if raw.trim().is_empty() {
        return Err(FieldError::new(field, format!("{} is required", field)));
    }

    parse_absolute_url(raw)
        .ok_or_else(|| FieldError::new(field, format!("{} must be a valid URL", field)))
}

/// Parse `raw` as an absolute http(s) URL.
pub fn parse_absolute_url(raw: &str) -> Option<Url> {
    let url = Url::parse(raw.trim()).ok()?;
    match url.scheme() {
        "http" | "https" if url.has_host() => Some(url),
        _ => None,
    }
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

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_valid_request_parses() {
        let body = json!({
            "webpageUrl": "https://example.com/page",
            "policyUrl": "https://example.com/policy"
        });

        let request = validate_request(&body).unwrap();
        assert_eq!(request.webpage_url.as_str(), "https://example.com/page");
        assert_eq!(request.policy_url.as_str(), "https://example.com/policy");
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let body = json!({
            "webpageUrl": "https://example.com/page",
            "policyUrl": "https://example.com/policy",
            "verbose": true
        });
        assert!(validate_request(&body).is_ok());
    }

    #[test]
    fn test_non_object_body_rejected() {
        let errors = validate_request(&json!(["https://example.com"])).unwrap_err();
        assert_eq!(
            errors,
            vec![FieldError::new("", "Expected object, received array")]
        );
    }

    #[test]
    fn test_missing_fields_reported_in_order() {
        let errors = validate_request(&json!({})).unwrap_err();
        assert_eq!(
            errors,
            vec![
                FieldError::new("webpageUrl", "webpageUrl is required"),
                FieldError::new("policyUrl", "policyUrl is required"),
            ]
        );
    }

    #[test]
    fn test_wrong_type_reported() {
        let errors = validate_request(&json!({
            "webpageUrl": 42,
            "policyUrl": "https://example.com/policy"
        }))
        .unwrap_err();
        assert_eq!(
            errors,
            vec![FieldError::new("webpageUrl", "Expected string, received number")]
        );
    }

    #[test]
    fn test_empty_string_is_required_error() {
        let errors = validate_request(&json!({
            "webpageUrl": "https://example.com/page",
            "policyUrl": "   "
        }))
        .unwrap_err();
        assert_eq!(
            errors,
            vec![FieldError::new("policyUrl", "policyUrl is required")]
        );
    }

    #[test]
    fn test_relative_and_non_http_urls_rejected() {
        for raw in ["/policy", "example.com/page", "mailto:legal@example.com", "ftp://example.com/x"] {
            assert!(parse_absolute_url(raw).is_none(), "{} should be rejected", raw);
        }
        assert!(parse_absolute_url("http://localhost:8080/terms").is_some());
    }

    fn invalid_url() -> impl Strategy<Value = String> {
        prop_oneof![
            "[a-z]{1,12}",
            "/[a-z]{1,12}",
            "[a-z]{1,8}\\.[a-z]{2,3}/[a-z]{0,8}",
            Just("https://".to_string()),
        ]
    }

    fn valid_url() -> impl Strategy<Value = String> {
        ("(http|https)", "[a-z]{1,12}", "[a-z]{2,3}", "[a-z0-9/]{0,16}")
            .prop_map(|(scheme, host, tld, path)| format!("{}://{}.{}/{}", scheme, host, tld, path))
    }

    proptest! {
        /// Property: one detail per malformed field, naming that field
        #[test]
        fn one_error_per_invalid_field(
            webpage_ok in any::<bool>(),
            policy_ok in any::<bool>(),
            good in valid_url(),
            bad in invalid_url(),
        ) {
            prop_assume!(!(webpage_ok && policy_ok));
            let webpage = if webpage_ok { good.clone() } else { bad.clone() };
            let policy = if policy_ok { good } else { bad };
            let body = json!({ "webpageUrl": webpage, "policyUrl": policy });

            let errors = validate_request(&body).unwrap_err();
            let expected = usize::from(!webpage_ok) + usize::from(!policy_ok);
            prop_assert_eq!(errors.len(), expected);
            prop_assert_eq!(
                errors.iter().any(|e| e.field == WEBPAGE_URL_FIELD),
                !webpage_ok
            );
            prop_assert_eq!(
                errors.iter().any(|e| e.field == POLICY_URL_FIELD),
                !policy_ok
            );
        }

        /// Property: a missing field is always reported, whatever the other holds
        #[test]
        fn missing_field_always_reported(other in valid_url()) {
            let errors = validate_request(&json!({ "webpageUrl": other })).unwrap_err();
            prop_assert_eq!(errors.len(), 1);
            prop_assert_eq!(errors[0].field.as_str(), POLICY_URL_FIELD);
        }

        /// Property: well-formed http(s) URLs always validate
        #[test]
        fn valid_urls_accepted(webpage in valid_url(), policy in valid_url()) {
            let body = json!({ "webpageUrl": webpage, "policyUrl": policy });
            prop_assert!(validate_request(&body).is_ok());
        }
    }
}
