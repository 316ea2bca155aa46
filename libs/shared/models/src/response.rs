use serde::{Deserialize, Serialize};

use crate::error::{AppError, ErrorKind};

/// Uniform result shape returned by every scheduling operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
    pub errors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
}

impl<T> ServiceResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            errors: Vec::new(),
            error_kind: None,
        }
    }

    pub fn failure(error: &AppError) -> Self {
        Self {
            success: false,
            message: error.public_message(),
            data: None,
            errors: error.details(),
            error_kind: Some(error.kind()),
        }
    }

    pub fn from_result(result: Result<T, AppError>, message: impl Into<String>) -> Self {
        match result {
            Ok(data) => Self::ok(data, message),
            Err(e) => Self::failure(&e),
        }
    }

    pub fn is_kind(&self, kind: ErrorKind) -> bool {
        self.error_kind == Some(kind)
    }

    pub fn into_data(self) -> Option<T> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_serializes_without_error_kind() {
        let response = ServiceResponse::ok(42, "done");
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value,
            json!({ "success": true, "message": "done", "data": 42, "errors": [] })
        );
    }

    #[test]
    fn conflict_failure_carries_message_and_kind() {
        let response: ServiceResponse<i32> =
            ServiceResponse::from_result(Err(AppError::Conflict("slot taken".into())), "unused");
        assert!(!response.success);
        assert_eq!(response.message, "slot taken");
        assert_eq!(response.errors, vec!["slot taken".to_string()]);
        assert!(response.is_kind(ErrorKind::Conflict));
        assert!(response.into_data().is_none());
    }
}
