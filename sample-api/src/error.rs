use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sample_order::StepFailure;
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    /// The inbound body was not a JSON object
    InvalidBody(String),
    /// A downstream step stopped the pipeline
    Pipeline(StepFailure),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::InvalidBody(msg) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "Invalid request body",
                    "details": msg,
                }),
            ),
            AppError::Pipeline(failure) => {
                let status = if failure.error.is_downstream_reply() {
                    StatusCode::BAD_REQUEST
                } else {
                    tracing::error!("Internal Server Error: {}", failure);
                    StatusCode::INTERNAL_SERVER_ERROR
                };
                (
                    status,
                    json!({
                        "error": failure.message(),
                        "step": failure.step,
                        "details": failure.details(),
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<StepFailure> for AppError {
    fn from(failure: StepFailure) -> Self {
        Self::Pipeline(failure)
    }
}
