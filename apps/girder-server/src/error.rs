//! Error handling at the HTTP boundary.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use girder_billing::BillingError;
use serde_json::json;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug)]
pub enum ApiError {
    /// Malformed client input (bad uuid, unknown metric name).
    InvalidRequest(String),
    /// Plan id that doesn't exist in the catalog.
    UnknownPlan(String),
    /// Anything the storage/service layer threw. Surfaced as an opaque 500;
    /// details go to the log only.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::UnknownPlan(id) => {
                (StatusCode::BAD_REQUEST, format!("unknown plan: {}", id))
            }
            ApiError::Internal(msg) => {
                tracing::error!("internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message,
            "status": status.as_u16(),
        }));
        (status, body).into_response()
    }
}

impl From<BillingError> for ApiError {
    fn from(err: BillingError) -> Self {
        match err {
            BillingError::UnknownPlan(id) => ApiError::UnknownPlan(id),
            BillingError::Storage(e) => ApiError::Internal(e.to_string()),
        }
    }
}
