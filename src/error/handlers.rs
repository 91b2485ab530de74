//! Error handlers
//!
//! Maps error kinds onto HTTP statuses and renders them as JSON bodies.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::{error, warn};
use serde_json::json;

use crate::error::types::{ApiError, AuthError, StorageError};

/// Log an error at a level matching its severity
pub fn handle_error(err: &ApiError) {
    match err {
        ApiError::Storage(StorageError::Confinement(_)) => {
            warn!("Rejected path outside storage root: {}", err)
        }
        ApiError::Storage(StorageError::Fault(_)) | ApiError::Auth(AuthError::TokenSigning(_)) => {
            error!("Request failed: {}", err)
        }
        ApiError::Auth(AuthError::InvalidCredentials(user)) => {
            warn!("Failed login attempt for user {}", user)
        }
        ApiError::Auth(AuthError::InvalidToken(reason)) => {
            warn!("Rejected bearer token: {}", reason)
        }
        _ => {}
    }
}

/// Convert a storage error to its HTTP status
pub fn storage_error_status(err: &StorageError) -> StatusCode {
    match err {
        StorageError::Confinement(_) => StatusCode::BAD_REQUEST,
        StorageError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        StorageError::WrongKind { .. } => StatusCode::BAD_REQUEST,
        StorageError::NotFound(_) => StatusCode::NOT_FOUND,
        StorageError::Fault(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Convert an API error to its HTTP status
pub fn error_to_status(err: &ApiError) -> StatusCode {
    match err {
        ApiError::Storage(e) => storage_error_status(e),
        ApiError::Auth(AuthError::MissingCredentials) => StatusCode::BAD_REQUEST,
        ApiError::Auth(AuthError::TokenSigning(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
        ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        handle_error(&self);
        let status = error_to_status(&self);
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
