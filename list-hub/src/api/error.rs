use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use list_hub_core::HubError;
use serde_json::json;

/// Error returned by every handler. Domain failures map onto status codes;
/// store failures are logged and reported without detail.
#[derive(Debug)]
pub enum ApiError {
    Hub(HubError),
    BadRequest(String),
}

impl From<HubError> for ApiError {
    fn from(e: HubError) -> Self {
        ApiError::Hub(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        ApiError::BadRequest(e.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(e: PathRejection) -> Self {
        ApiError::BadRequest(e.body_text())
    }
}

impl ApiError {
    pub fn unauthorized() -> Self {
        ApiError::Hub(HubError::NotAuthorized)
    }

    fn parts(&self) -> (StatusCode, String) {
        match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Hub(HubError::Validation(msg)) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Hub(HubError::NotAuthorized) => {
                (StatusCode::UNAUTHORIZED, "Unauthorized".to_string())
            }
            ApiError::Hub(HubError::NotFound) => (StatusCode::NOT_FOUND, "Not found".to_string()),
            ApiError::Hub(HubError::Conflict(msg)) => (StatusCode::CONFLICT, msg.clone()),
            ApiError::Hub(HubError::Store(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Hub(HubError::Store(e)) = &self {
            tracing::error!(error = ?e, "store failure");
        }
        let (status, message) = self.parts();
        (status, Json(json!({ "error": message }))).into_response()
    }
}
