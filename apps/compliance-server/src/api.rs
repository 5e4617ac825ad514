//! API handlers for the compliance server

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use compliance_types::{validate_request, ComplianceResponse, FieldError};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::error::ServerError;
use crate::state::AppState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub model: String,
}

/// Handler: GET /health
pub async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "compliance-server",
        version: env!("CARGO_PKG_VERSION"),
        model: state.model_client.model_name().to_string(),
    })
}

/// Handler: POST /check-compliance
///
/// Validates the body, extracts the policy and then the webpage, and asks the
/// model for findings. Any failure ends the request; nothing partial is returned.
pub async fn handle_check_compliance(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ComplianceResponse>, ServerError> {
    let Json(body) = payload.map_err(|rejection| {
        ServerError::InvalidRequest(vec![FieldError::new("", rejection.body_text())])
    })?;
    let request = validate_request(&body).map_err(ServerError::InvalidRequest)?;

    info!(
        "Checking {} against policy {}",
        request.webpage_url, request.policy_url
    );

    let policy_text = state
        .extractor
        .extract_policy_text(&request.policy_url)
        .await?;
    let webpage_text = state
        .extractor
        .extract_webpage_text(&request.webpage_url)
        .await?;

    let findings = state
        .model_client
        .check_compliance(&policy_text, &webpage_text)
        .await?;

    let response = ComplianceResponse::from_findings(findings);
    info!(
        "Checked {}: compliant={}",
        request.webpage_url, response.is_compliant
    );
    Ok(Json(response))
}
