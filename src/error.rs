use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;
use thiserror::Error;
use tracing::error;

/// Which request field an input-related failure belongs to. Fetch errors
/// must name the offending field so the caller can tell the two apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    Resume,
    JobDescription,
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputField::Resume => write!(f, "resume"),
            InputField::JobDescription => write!(f, "job description"),
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Failed to fetch {field} URL: {detail}")]
    Fetch { field: InputField, detail: String },

    #[error("Completion failed: {0}")]
    Completion(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Fetch { .. } => StatusCode::BAD_REQUEST,
            AppError::Completion(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation_error",
            AppError::Fetch { .. } => "fetch_error",
            AppError::Completion(_) => "completion_error",
            AppError::Internal(_) => "internal_error",
        }
    }

    /// The message returned to the caller. Client-fault variants carry their
    /// own (non-sensitive) message; server-side faults get a fixed generic
    /// one, with the real detail going to the log only.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::Fetch { field, .. } => format!("Failed to fetch {} URL", field),
            AppError::Completion(_) => "Failed to generate tailored resume".to_string(),
            AppError::Internal(_) => "Failed to tailor resume".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();
        let message = self.public_message();

        error!(error_code = code, detail = %self, "Request failed");

        let body = Json(json!({ "error": message }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_error_names_the_field_without_leaking_detail() {
        let err = AppError::Fetch {
            field: InputField::Resume,
            detail: "connection refused (10.0.0.1:443)".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.public_message(), "Failed to fetch resume URL");
        assert!(!err.public_message().contains("10.0.0.1"));
    }

    #[test]
    fn completion_error_is_a_server_fault_with_generic_message() {
        let err = AppError::Completion("provider returned status 500: quota".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "Failed to generate tailored resume");
        assert!(!err.public_message().contains("quota"));
    }

    #[test]
    fn validation_message_passes_through() {
        let err = AppError::Validation("missing resume or job description".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.public_message(), "missing resume or job description");
    }
}
