//! Custom error types for the reservation service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Custom error type for the reservation service
#[derive(Error, Debug)]
pub enum AppError {
    /// Username already taken at signup or admin creation
    #[error("Username already exists")]
    DuplicateUsername,

    /// A train with the same number and departure date already exists
    #[error("A train with this number and departure date already exists")]
    DuplicateTrain,

    /// No train matches the given train number
    #[error("No such train with this number")]
    TrainNotFound,

    /// Every seat of the requested type is taken
    #[error("No available seats of this type in this train")]
    NoSeatAvailable,

    /// Unknown identifier or wrong password; deliberately the same message
    /// for both so accounts cannot be enumerated
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Account exists but the email has not been verified yet
    #[error("Email not verified. Please verify your email before logging in")]
    EmailNotVerified,

    /// Verification code missing, expired, or mismatched
    #[error("Invalid or expired code")]
    InvalidOrExpiredCode,

    /// Request failed input validation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Lookup target does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configured mail channel refused the message
    #[error("Failed to send email")]
    DeliveryFailed,

    /// No admin account exists yet; only setup is permitted
    #[error("No admin account exists. Create the first admin account before using the system")]
    SetupRequired,

    /// Schema or connectivity fault in the underlying store
    #[error("Database error: {0}")]
    Store(#[from] sqlx::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::DuplicateUsername | AppError::DuplicateTrain => {
                (StatusCode::CONFLICT, self.to_string())
            }
            AppError::TrainNotFound | AppError::NotFound(_) => {
                (StatusCode::NOT_FOUND, self.to_string())
            }
            AppError::NoSeatAvailable => (StatusCode::CONFLICT, self.to_string()),
            AppError::InvalidCredentials | AppError::EmailNotVerified => {
                (StatusCode::UNAUTHORIZED, self.to_string())
            }
            AppError::InvalidOrExpiredCode => (StatusCode::UNPROCESSABLE_ENTITY, self.to_string()),
            AppError::InvalidInput(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::DeliveryFailed => (StatusCode::BAD_GATEWAY, self.to_string()),
            AppError::SetupRequired => (StatusCode::SERVICE_UNAVAILABLE, self.to_string()),
            AppError::Store(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for reservation service results
pub type AppResult<T> = Result<T, AppError>;

/// Convert a sqlx error into `duplicate` when it is a unique-constraint
/// violation, passing everything else through as a store error.
pub fn map_unique_violation(err: sqlx::Error, duplicate: AppError) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => duplicate,
        _ => AppError::Store(err),
    }
}
