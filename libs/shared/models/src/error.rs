use serde::{Deserialize, Serialize};
use thiserror::Error;

const INTERNAL_PUBLIC_MESSAGE: &str = "An unexpected error occurred";

/// Error taxonomy shared by every scheduling operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error("Validation error: {}", .0.join("; "))]
    ValidationError(Vec<String>),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal Server Error: {0}")]
    Internal(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Internal,
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::ValidationError(vec![message.into()])
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::ValidationError(_) => ErrorKind::Validation,
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::Conflict(_) => ErrorKind::Conflict,
            AppError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Message safe to hand to a caller. Internal causes are never exposed.
    pub fn public_message(&self) -> String {
        match self {
            AppError::ValidationError(_) => "Validation failed".to_string(),
            AppError::NotFound(msg) | AppError::Conflict(msg) => msg.clone(),
            AppError::Internal(_) => INTERNAL_PUBLIC_MESSAGE.to_string(),
        }
    }

    /// Per-problem detail lines for the `errors` field of a response.
    pub fn details(&self) -> Vec<String> {
        match self {
            AppError::ValidationError(errors) => errors.clone(),
            AppError::NotFound(msg) | AppError::Conflict(msg) => vec![msg.clone()],
            AppError::Internal(_) => Vec::new(),
        }
    }
}

/// Failure reported by a persistence adapter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("Storage backend failure: {0}")]
    Backend(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => AppError::NotFound(err.to_string()),
            StoreError::UniqueViolation(msg) => AppError::Conflict(msg),
            StoreError::Backend(msg) => AppError::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_errors_hide_their_cause() {
        let err = AppError::Internal("connection refused by 10.0.0.3:5432".to_string());
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.public_message(), INTERNAL_PUBLIC_MESSAGE);
        assert!(err.details().is_empty());
    }

    #[test]
    fn validation_errors_keep_every_problem() {
        let err = AppError::ValidationError(vec!["a".into(), "b".into()]);
        assert_eq!(err.details(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(err.to_string(), "Validation error: a; b");
    }

    #[test]
    fn store_errors_map_onto_taxonomy() {
        let not_found: AppError = StoreError::NotFound { entity: "Appointment", id: 7 }.into();
        assert_eq!(not_found, AppError::NotFound("Appointment 7 not found".to_string()));

        let unique: AppError = StoreError::UniqueViolation("slot taken".into()).into();
        assert_eq!(unique.kind(), ErrorKind::Conflict);

        let backend: AppError = StoreError::Backend("disk full".into()).into();
        assert_eq!(backend.kind(), ErrorKind::Internal);
    }
}
