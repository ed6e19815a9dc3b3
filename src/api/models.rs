use crate::storage::QaStore;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub store: QaStore,
}

/// Request to create a question
#[derive(Debug, Deserialize)]
pub struct CreateQuestionRequest {
    #[serde(default)]
    pub text: String,
}

impl CreateQuestionRequest {
    /// Validate the request
    pub fn validate(&self) -> Result<(), String> {
        if self.text.trim().is_empty() {
            return Err("Question text cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Request to create an answer under a question
#[derive(Debug, Deserialize)]
pub struct CreateAnswerRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub text: String,
}

impl CreateAnswerRequest {
    /// Validate the request
    pub fn validate(&self) -> Result<(), String> {
        if self.user_id.trim().is_empty() {
            return Err("User ID cannot be empty".to_string());
        }
        if self.text.trim().is_empty() {
            return Err("Answer text cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Application error type
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Storage(e) => {
                tracing::error!(error = %e, "Storage error");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        };

        (
            status,
            Json(ErrorResponse {
                error: status.to_string(),
                message,
            }),
        )
            .into_response()
    }
}

/// Parse a path parameter as a well-formed positive integer identifier.
pub fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::Validation(format!("Invalid ID: {raw}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_request_rejects_empty_text() {
        let request = CreateQuestionRequest {
            text: "  ".to_string(),
        };
        assert!(request.validate().is_err());

        let request = CreateQuestionRequest {
            text: "What is Go?".to_string(),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn answer_request_rejects_missing_fields() {
        let request = CreateAnswerRequest {
            user_id: "user-1".to_string(),
            text: String::new(),
        };
        assert!(request.validate().is_err());

        let request = CreateAnswerRequest {
            user_id: String::new(),
            text: "An answer".to_string(),
        };
        assert!(request.validate().is_err());

        let request = CreateAnswerRequest {
            user_id: "user-1".to_string(),
            text: "An answer".to_string(),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn missing_fields_deserialize_to_empty() {
        let request: CreateQuestionRequest = serde_json::from_str("{}").unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn parse_id_accepts_positive_integers() {
        assert_eq!(parse_id("42").unwrap(), 42);
    }

    #[test]
    fn parse_id_rejects_garbage() {
        assert!(parse_id("abc").is_err());
        assert!(parse_id("").is_err());
        assert!(parse_id("-1").is_err());
        assert!(parse_id("0").is_err());
        assert!(parse_id("1.5").is_err());
    }

    #[test]
    fn error_status_mapping() {
        let response = AppError::Validation("bad".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = AppError::NotFound("missing".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = AppError::Storage(sqlx::Error::PoolClosed).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
