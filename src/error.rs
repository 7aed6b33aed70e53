use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// Application error types
#[derive(Debug)]
pub enum AppError {
    /// Configuration or catalog error
    ConfigError(String),
    /// Malformed query (radius bounds, empty procedure code, ...)
    InvalidQuery(String),
    /// Selected add-on is not in the procedure's eligible complementary set
    IneligibleAddon(String),
    /// Map display requested but the map surface is disabled
    MapUnavailable(String),
    /// Internal server error
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            Self::InvalidQuery(msg) => write!(f, "Invalid query: {}", msg),
            Self::IneligibleAddon(msg) => write!(f, "Ineligible add-on: {}", msg),
            Self::MapUnavailable(msg) => write!(f, "Map unavailable: {}", msg),
            Self::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            Self::ConfigError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            Self::InvalidQuery(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::IneligibleAddon(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::MapUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
            Self::InternalError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({
            "error": {
                "message": error_message,
                "type": error_type_name(&self),
            }
        }));

        (status, body).into_response()
    }
}

pub fn error_type_name(error: &AppError) -> &'static str {
    match error {
        AppError::ConfigError(_) => "config_error",
        AppError::InvalidQuery(_) => "invalid_query",
        AppError::IneligibleAddon(_) => "ineligible_addon",
        AppError::MapUnavailable(_) => "map_unavailable",
        AppError::InternalError(_) => "internal_error",
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::InternalError(err.to_string())
    }
}
