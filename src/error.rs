//! Error handling

use thiserror::Error;

use crate::constants;
use crate::logic::validation::FormErrors;
use crate::session::StorageError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    // Transport errors
    #[error("Network error: {0}")]
    Network(String),

    // Auth errors
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),

    // Resource errors
    #[error("Not found: {0}")]
    NotFound(String),

    // Server-side validation (400 / 422)
    #[error("Validation failed: {message}")]
    Validation { message: String, errors: Vec<String> },

    // Any other non-2xx
    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    // 2xx with `success: false`
    #[error("Request rejected: {message}")]
    Rejected { message: String, errors: Vec<String> },

    // Body is not the expected envelope
    #[error("Malformed response: {0}")]
    Malformed(String),

    // Client-side form validation, never sent
    #[error("Invalid input: {0}")]
    InvalidInput(FormErrors),

    // Client construction
    #[error("Configuration error: {0}")]
    Config(String),

    // Session persistence
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ApiError {
    /// Uniform human-readable message for inline display or alerts
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) => constants::MSG_NETWORK.to_string(),
            ApiError::Unauthorized(msg) => non_empty_or(msg, constants::MSG_SESSION_EXPIRED),
            ApiError::Forbidden(msg) => non_empty_or(msg, constants::MSG_UNAUTHORIZED),
            ApiError::NotFound(msg) => non_empty_or(msg, constants::MSG_NOT_FOUND),
            ApiError::Validation { message, .. } => non_empty_or(message, constants::MSG_VALIDATION),
            ApiError::Server { message, .. } => non_empty_or(message, constants::MSG_SERVER),
            ApiError::Rejected { message, .. } => non_empty_or(message, constants::MSG_GENERIC),
            ApiError::Malformed(_) => constants::MSG_MALFORMED.to_string(),
            ApiError::InvalidInput(errors) => errors
                .first_message()
                .unwrap_or(constants::MSG_VALIDATION)
                .to_string(),
            ApiError::Config(_) | ApiError::Storage(_) => constants::MSG_GENERIC.to_string(),
        }
    }

    /// Field/detail messages attached by the server or the form check
    pub fn details(&self) -> Vec<String> {
        match self {
            ApiError::Validation { errors, .. } | ApiError::Rejected { errors, .. } => errors.clone(),
            ApiError::InvalidInput(errors) => errors.messages(),
            _ => Vec::new(),
        }
    }

    /// HTTP status when the error came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized(_) => Some(401),
            ApiError::Forbidden(_) => Some(403),
            ApiError::NotFound(_) => Some(404),
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Build from a non-2xx status and the (possibly empty) server message
    pub fn from_status(status: u16, message: String, errors: Vec<String>) -> Self {
        match status {
            401 => ApiError::Unauthorized(message),
            403 => ApiError::Forbidden(message),
            404 => ApiError::NotFound(message),
            400 | 422 => ApiError::Validation { message, errors },
            _ => ApiError::Server { status, message },
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Malformed(err.to_string())
        } else if err.is_builder() {
            ApiError::Config(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

fn non_empty_or(msg: &str, fallback: &str) -> String {
    if msg.trim().is_empty() {
        fallback.to_string()
    } else {
        msg.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(ApiError::from_status(401, String::new(), vec![]), ApiError::Unauthorized(_)));
        assert!(matches!(ApiError::from_status(404, String::new(), vec![]), ApiError::NotFound(_)));
        assert!(matches!(ApiError::from_status(422, String::new(), vec![]), ApiError::Validation { .. }));
        assert!(matches!(ApiError::from_status(500, String::new(), vec![]), ApiError::Server { status: 500, .. }));
    }

    #[test]
    fn test_distinct_default_messages() {
        let not_found = ApiError::from_status(404, String::new(), vec![]).user_message();
        let unauthorized = ApiError::from_status(401, String::new(), vec![]).user_message();
        let invalid = ApiError::from_status(422, String::new(), vec![]).user_message();
        let server = ApiError::from_status(500, String::new(), vec![]).user_message();

        assert_eq!(not_found, constants::MSG_NOT_FOUND);
        assert_eq!(unauthorized, constants::MSG_SESSION_EXPIRED);
        assert_eq!(invalid, constants::MSG_VALIDATION);
        assert_eq!(server, constants::MSG_SERVER);
    }

    #[test]
    fn test_server_message_preferred() {
        let err = ApiError::from_status(404, "Normativa no encontrada".to_string(), vec![]);
        assert_eq!(err.user_message(), "Normativa no encontrada");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_validation_details_kept() {
        let err = ApiError::from_status(
            422,
            "Datos inválidos".to_string(),
            vec!["nombre es requerido".to_string()],
        );
        assert_eq!(err.details(), vec!["nombre es requerido".to_string()]);
    }
}
