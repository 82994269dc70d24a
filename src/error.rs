//! Error types for the Stacks server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Stable numeric codes exposed to API clients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    NotAuthorized = 2,
    StorageUnavailable = 3,
    InvalidFilter = 4,
    NoMatch = 5,
    InvalidIdentifier = 6,
    AlreadyLoanedByOther = 7,
    AlreadyLoanedBySelf = 8,
    NothingToReturn = 9,
    NoSuchBook = 10,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("no filter criteria supplied")]
    InvalidFilter,

    #[error("no books found for the selected filters")]
    NoMatch,

    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("book is currently loaned by someone else")]
    AlreadyLoanedByOther,

    #[error("you have this book checked out already")]
    AlreadyLoanedBySelf,

    #[error("nothing to return")]
    NothingToReturn,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] sqlx::Error),

    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("authentication failed: {0}")]
    Authentication(String),
}

impl AppError {
    /// Numeric code and HTTP status for this error
    pub fn classify(&self) -> (StatusCode, ErrorCode) {
        match self {
            AppError::InvalidFilter => (StatusCode::BAD_REQUEST, ErrorCode::InvalidFilter),
            AppError::NoMatch => (StatusCode::NOT_FOUND, ErrorCode::NoMatch),
            AppError::InvalidIdentifier(_) => {
                (StatusCode::BAD_REQUEST, ErrorCode::InvalidIdentifier)
            }
            AppError::AlreadyLoanedByOther => {
                (StatusCode::CONFLICT, ErrorCode::AlreadyLoanedByOther)
            }
            AppError::AlreadyLoanedBySelf => (StatusCode::CONFLICT, ErrorCode::AlreadyLoanedBySelf),
            AppError::NothingToReturn => (StatusCode::CONFLICT, ErrorCode::NothingToReturn),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NoSuchBook),
            AppError::StorageUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, ErrorCode::StorageUnavailable)
            }
            AppError::Migration(_) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::Failure),
            AppError::Authentication(_) => (StatusCode::UNAUTHORIZED, ErrorCode::NotAuthorized),
        }
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.classify();

        let message = match &self {
            AppError::StorageUnavailable(e) => {
                tracing::error!("Database error: {:?}", e);
                "Storage unavailable".to_string()
            }
            AppError::Migration(e) => {
                tracing::error!("Migration error: {}", e);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
