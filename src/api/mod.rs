/// Request/response contracts handed to whatever transport sits in front.
pub mod dataset;
pub mod predict;
pub mod sample;

use log::error;
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::ValidationError;

/// Status + JSON body, transport agnostic.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn ok<T: Serialize>(body: &T) -> Self {
        match serde_json::to_value(body) {
            Ok(body) => ApiResponse { status: 200, body },
            Err(err) => ApiError::Internal {
                message: "Failed to encode response".to_string(),
                cause: err.to_string(),
            }
            .into_response(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The `error` field of a failed response.
    pub fn error_message(&self) -> Option<&str> {
        self.body.get("error").and_then(Value::as_str)
    }
}

/// Everything a handler can fail with, already classified by status.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    BadRequest(ValidationError),
    NotFound(String),
    /// `message` goes to the caller, `cause` only to the log.
    Internal { message: String, cause: String },
}

impl ApiError {
    pub fn status(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::NotFound(_) => 404,
            ApiError::Internal { .. } => 500,
        }
    }

    pub fn into_response(self) -> ApiResponse {
        let status = self.status();
        let body = match self {
            ApiError::BadRequest(ValidationError::NotFromDataset) => json!({
                "error": ValidationError::NotFromDataset.to_string(),
                "isFromDataset": false,
            }),
            ApiError::BadRequest(err) => json!({ "error": err.to_string() }),
            ApiError::NotFound(message) => json!({ "error": message }),
            ApiError::Internal { message, cause } => {
                error!(target: "rusty_sonar::api", "{message}: {cause}");
                json!({ "error": message })
            }
        };
        ApiResponse { status, body }
    }

    pub(crate) fn internal(message: &str, cause: impl std::fmt::Display) -> Self {
        ApiError::Internal {
            message: message.to_string(),
            cause: format!("{cause:#}"),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::BadRequest(err)
    }
}

pub(crate) fn respond<T: Serialize>(result: Result<T, ApiError>) -> ApiResponse {
    match result {
        Ok(body) => ApiResponse::ok(&body),
        Err(err) => err.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_error_class() {
        assert_eq!(
            ApiError::BadRequest(ValidationError::WrongLength { got: None }).status(),
            400
        );
        assert_eq!(ApiError::NotFound("x".into()).status(), 404);
        assert_eq!(ApiError::internal("boom", "cause").status(), 500);
    }

    #[test]
    fn internal_errors_hide_the_cause() {
        let response = ApiError::internal("Prediction failed", "disk on fire").into_response();
        assert_eq!(response.status, 500);
        assert_eq!(response.body, json!({ "error": "Prediction failed" }));
    }

    #[test]
    fn strict_rejection_carries_membership_flag() {
        let response = ApiError::BadRequest(ValidationError::NotFromDataset).into_response();
        assert_eq!(response.body["isFromDataset"], false);
        assert!(response
            .error_message()
            .unwrap()
            .contains("not from the trained dataset"));
    }
}
