// src/application/error_handling.rs
//
// Error mapping for command handlers
//
// ARCHITECTURE:
// - Maps AppError → caller-facing responses
// - Consistent JSON error format
// - Storage details stay in the log, never in the response

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Standard error response returned by every command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error_type: ErrorType,
    pub message: String,
    pub details: Option<String>,
}

/// Error categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// Resource not found (404)
    NotFound,

    /// Rejected by referential integrity (400)
    Conflict,

    /// No stored user behind the principal (401)
    Authentication,

    /// Invalid input or domain invariant violation (422)
    Validation,

    /// Database/persistence error (500)
    Database,

    /// Other/unknown error (500)
    Internal,
}

impl ErrorType {
    /// HTTP-equivalent status code
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorType::NotFound => 404,
            ErrorType::Conflict => 400,
            ErrorType::Authentication => 401,
            ErrorType::Validation => 422,
            ErrorType::Database | ErrorType::Internal => 500,
        }
    }
}

impl ErrorResponse {
    fn failure(error_type: ErrorType, message: impl Into<String>, details: Option<String>) -> Self {
        Self {
            success: false,
            error_type,
            message: message.into(),
            details,
        }
    }

    /// Create error response from AppError
    pub fn from_app_error(error: AppError) -> Self {
        match error {
            AppError::NotFound(what) => {
                Self::failure(ErrorType::NotFound, format!("{} not found", what), None)
            }

            AppError::Conflict(detail) => Self::failure(
                ErrorType::Conflict,
                "Operation rejected: the resource is still referenced",
                Some(detail),
            ),

            AppError::Authentication(reason) => {
                Self::failure(ErrorType::Authentication, reason, None)
            }

            AppError::Domain(domain_error) => Self::failure(
                ErrorType::Validation,
                "Domain validation failed",
                Some(domain_error.to_string()),
            ),

            AppError::Storage(detail) => {
                log::error!("storage error: {}", detail);
                Self::failure(
                    ErrorType::Database,
                    "Database operation failed",
                    Some("Check logs for details".to_string()),
                )
            }

            AppError::Config(detail) => {
                log::error!("configuration error: {}", detail);
                Self::failure(ErrorType::Internal, "Invalid configuration", Some(detail))
            }
        }
    }

    /// Create validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::failure(ErrorType::Validation, message, None)
    }

    pub fn status_code(&self) -> u16 {
        self.error_type.status_code()
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "Internal error".to_string())
    }
}

/// Helper trait to convert Results to ErrorResponse
pub trait ToErrorResponse<T> {
    fn to_error_response(self) -> Result<T, String>;
}

impl<T> ToErrorResponse<T> for Result<T, AppError> {
    fn to_error_response(self) -> Result<T, String> {
        self.map_err(|e| ErrorResponse::from_app_error(e).to_json())
    }
}
