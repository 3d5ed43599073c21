use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Could not find location: {0}")]
    LocationNotFound(String),

    #[error("Geocoding service error: {0}")]
    Geocoding(String),

    #[error("Routing service error: {0}")]
    Routing(String),

    #[error("Overpass API error: {0}")]
    Overpass(String),

    #[error("Planning timed out after {0}s")]
    Timeout(u64),

    #[error("Internal server error: {0}")]
    Internal(String),
}

// Convert AppError into HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Validation(ref e) => (StatusCode::BAD_REQUEST, e.clone()),
            AppError::LocationNotFound(ref e) => {
                tracing::info!("Location not found: {}", e);
                (StatusCode::NOT_FOUND, format!("Could not find location: {}", e))
            }
            AppError::Geocoding(ref e) => {
                tracing::error!("Geocoding error: {}", e);
                (StatusCode::BAD_GATEWAY, "Geocoding service error".to_string())
            }
            AppError::Routing(ref e) => {
                tracing::error!("Routing error: {}", e);
                (StatusCode::BAD_GATEWAY, format!("Could not calculate route: {}", e))
            }
            AppError::Overpass(ref e) => {
                tracing::error!("Overpass API error: {}", e);
                (StatusCode::BAD_GATEWAY, "Map feature service error".to_string())
            }
            AppError::Timeout(secs) => {
                tracing::warn!("Planning request timed out after {}s", secs);
                (
                    StatusCode::GATEWAY_TIMEOUT,
                    format!("Planning timed out after {}s", secs),
                )
            }
            AppError::Internal(ref e) => {
                tracing::error!("Internal error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": status.canonical_reason().unwrap_or("Unknown error"),
            "message": error_message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
