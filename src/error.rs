/*
 * Responsibility
 * - Application-wide ApiError definition
 * - IntoResponse (HTTP status / JSON error body)
 * - Keep "not authenticated", "missing role" and "path denied" as separate responses
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::auth::ResolveError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    /// No principal on a request that needs one.
    #[error("full authentication is required to access this resource")]
    Unauthorized,
    /// Principal resolved but its roles do not satisfy the handler.
    #[error("forbidden: role {required} required")]
    Forbidden { required: &'static str },
    /// Rejected by the path layer before any handler was selected.
    #[error("access denied: {path}")]
    AccessDenied { path: String },
    #[error("not found: {path}")]
    NotFound { path: String },
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn access_denied(path: impl Into<String>) -> Self {
        Self::AccessDenied { path: path.into() }
    }

    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Missing role and denied path share 403; `code()` keeps them apart
    /// (`FORBIDDEN` vs `ACCESS_DENIED`).
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden { .. } | AppError::AccessDenied { .. } => StatusCode::FORBIDDEN,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::Forbidden { .. } => "FORBIDDEN",
            AppError::AccessDenied { .. } => "ACCESS_DENIED",
            AppError::NotFound { .. } => "NOT_FOUND",
            AppError::Internal => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<ResolveError> for AppError {
    fn from(e: ResolveError) -> Self {
        match e {
            // The gate only calls the resolver with a principal in hand,
            // so reaching this is a wiring bug, not a client error.
            ResolveError::MissingIdentity => AppError::Internal,
        }
    }
}
