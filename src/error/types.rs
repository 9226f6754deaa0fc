// src/error/types.rs
use crate::domain::DomainError;
use thiserror::Error;

/// Infrastructure-level failures raised by the persistence gateway.
///
/// These never cross the service boundary: services convert them into
/// [`AppError`] before returning.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(String),

    #[error("Entity not found: {0}")]
    EntityNotFound(String),

    #[error("Integrity violation: {0}")]
    IntegrityViolation(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(failure, message) = &err {
            if failure.code == rusqlite::ErrorCode::ConstraintViolation {
                return StoreError::IntegrityViolation(
                    message.clone().unwrap_or_else(|| failure.to_string()),
                );
            }
        }
        StoreError::Database(err)
    }
}

impl From<r2d2::Error> for StoreError {
    fn from(err: r2d2::Error) -> Self {
        StoreError::Pool(err.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors visible to callers of the service layer.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Referential integrity failure: {0}")]
    Conflict(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    pub fn not_found(resource: impl Into<String>) -> Self {
        AppError::NotFound(resource.into())
    }

    pub fn username_not_found() -> Self {
        AppError::Authentication("username not found".to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::EntityNotFound(what) => AppError::NotFound(what),
            StoreError::IntegrityViolation(detail) => AppError::Conflict(detail),
            other => {
                log::error!("storage failure at service boundary: {}", other);
                AppError::Storage(other.to_string())
            }
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
