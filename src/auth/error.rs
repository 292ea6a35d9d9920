// Authentication error types and HTTP response conversion

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, warn};

/// Error types for authentication operations
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Password must not be blank")]
    PasswordBlank,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("No user found for email")]
    UserNotFound,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token has expired")]
    ExpiredToken,

    #[error("Missing authentication token")]
    MissingToken,

    #[error("Email already registered")]
    EmailTaken,

    #[error("Insufficient permissions")]
    Forbidden,

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    #[error("Password hashing error")]
    PasswordHash,

    #[error("Token generation error: {0}")]
    TokenGeneration(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl AuthError {
    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::PasswordBlank => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::UserNotFound => StatusCode::NOT_FOUND,
            AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::ExpiredToken => StatusCode::UNAUTHORIZED,
            AuthError::MissingToken => StatusCode::UNAUTHORIZED,
            AuthError::EmailTaken => StatusCode::CONFLICT,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::InvalidRole(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::PasswordHash => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::TokenGeneration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message, safe to return (no internal detail)
    fn client_message(&self) -> String {
        match self {
            AuthError::InvalidRole(_)
            | AuthError::PasswordHash
            | AuthError::TokenGeneration(_)
            | AuthError::Database(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match &self {
            AuthError::InvalidToken => warn!("Invalid token attempt"),
            AuthError::ExpiredToken => warn!("Expired token attempt"),
            AuthError::MissingToken => warn!("Missing token in request"),
            AuthError::InvalidRole(role) => error!("Invalid role value in store: {}", role),
            AuthError::PasswordHash => error!("Password hashing error"),
            AuthError::TokenGeneration(msg) => error!("Token generation error: {}", msg),
            AuthError::Database(msg) => error!("Database error in auth: {}", msg),
            _ => {}
        }

        let body = Json(json!({
            "error": self.client_message(),
        }));

        (self.status_code(), body).into_response()
    }
}
