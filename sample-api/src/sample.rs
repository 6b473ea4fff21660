use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use sample_core::SampleRequest;
use sample_order::{MarketingOutcome, PipelineOutcome, StepWarning};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::{error::AppError, state::AppState};

#[derive(Debug, Serialize)]
pub struct SampleResponse {
    pub message: &'static str,
    pub reference: String,
    pub order_id: String,
    pub order: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marketing: Option<MarketingOutcome>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<StepWarning>,
}

impl From<PipelineOutcome> for SampleResponse {
    fn from(outcome: PipelineOutcome) -> Self {
        Self {
            message: "Sample request submitted",
            reference: outcome.reference,
            order_id: outcome.order_id,
            order: outcome.order,
            marketing: outcome.marketing,
            warnings: outcome.warnings,
        }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/sample", post(submit_sample))
        // Path used by the first storefront integration
        .route("/sample-proxy", post(submit_sample))
}

/// POST /api/sample
/// Forward a free sample request to the marketing and shipping providers
#[tracing::instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
pub async fn submit_sample(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SampleResponse>, AppError> {
    let Json(body) = payload.map_err(|rejection| {
        tracing::warn!("Rejected sample request body: {}", rejection.body_text());
        AppError::InvalidBody(rejection.body_text())
    })?;
    let request = parse_request(body)?;

    tracing::info!(?request, "New sample request received");

    let missing = request.missing_fields();
    if !missing.is_empty() {
        tracing::warn!(?missing, "Sample request is missing fields, forwarding as empty");
    }

    let outcome = state.orchestrator.run(&request).await?;

    Ok(Json(outcome.into()))
}

/// Only a JSON object is a form submission; arrays would otherwise fill the fields by position
fn parse_request(body: Value) -> Result<SampleRequest, AppError> {
    if !body.is_object() {
        tracing::warn!("Rejected sample request body: not a JSON object");
        return Err(AppError::InvalidBody("Expected a JSON object".to_string()));
    }

    serde_json::from_value(body).map_err(|e| {
        tracing::warn!("Rejected sample request body: {}", e);
        AppError::InvalidBody(e.to_string())
    })
}
