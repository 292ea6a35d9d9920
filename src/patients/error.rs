// Patient record error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{debug, error, warn};

/// Error types for patient record operations
#[derive(Debug, thiserror::Error)]
pub enum PatientError {
    #[error("Patient with id {0} not found")]
    NotFound(i32),

    #[error("Patient with email '{0}' already exists")]
    EmailTaken(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Insufficient permissions")]
    Forbidden,

    #[error("Database error: {0}")]
    Database(String),
}

impl PatientError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            PatientError::NotFound(_) => StatusCode::NOT_FOUND,
            PatientError::EmailTaken(_) => StatusCode::CONFLICT,
            PatientError::Validation(_) => StatusCode::BAD_REQUEST,
            PatientError::Forbidden => StatusCode::FORBIDDEN,
            PatientError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for PatientError {
    fn into_response(self) -> Response {
        let message = match &self {
            PatientError::NotFound(id) => {
                debug!("Patient {} not found", id);
                self.to_string()
            }
            PatientError::EmailTaken(email) => {
                warn!("Duplicate patient email: {}", email);
                self.to_string()
            }
            PatientError::Validation(_) => self.to_string(),
            PatientError::Forbidden => {
                warn!("Non-admin attempted a restricted patient operation");
                self.to_string()
            }
            PatientError::Database(msg) => {
                error!("Database error in patients: {}", msg);
                "Internal server error".to_string()
            }
        };

        let body = Json(json!({
            "error": message,
        }));

        (self.status_code(), body).into_response()
    }
}
