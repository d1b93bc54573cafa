// --- File: crates/sheetbook_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The base error type for all Sheetbook errors.
///
/// Feature crates convert their own errors into this type with `From`. The message of
/// each variant is what the client sees in the `error` field of the JSON body, so the
/// variants carry the final wording without any prefix.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SheetbookError {
    /// The request body could not be used (bad JSON, missing field)
    #[error("{0}")]
    ValidationError(String),

    /// Missing or invalid server-side configuration
    #[error("{0}")]
    ConfigError(String),

    /// The upstream provider refused access; the message explains how to fix it
    #[error("{0}")]
    ForbiddenError(String),

    /// Error reported by an external service
    #[error("{message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    /// Anything else
    #[error("{0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for SheetbookError {
    fn status_code(&self) -> u16 {
        match self {
            SheetbookError::ValidationError(_) => 400,
            SheetbookError::ConfigError(_) => 500,
            SheetbookError::ForbiddenError(_) => 403,
            SheetbookError::ExternalServiceError { .. } => 500,
            SheetbookError::InternalError(_) => 500,
        }
    }
}

impl From<serde_json::Error> for SheetbookError {
    fn from(err: serde_json::Error) -> Self {
        SheetbookError::ValidationError(err.to_string())
    }
}

impl From<std::io::Error> for SheetbookError {
    fn from(err: std::io::Error) -> Self {
        SheetbookError::InternalError(err.to_string())
    }
}

// Utility functions for error handling
pub fn config_error<T: fmt::Display>(message: T) -> SheetbookError {
    SheetbookError::ConfigError(message.to_string())
}

pub fn validation_error<T: fmt::Display>(message: T) -> SheetbookError {
    SheetbookError::ValidationError(message.to_string())
}

pub fn forbidden<T: fmt::Display>(message: T) -> SheetbookError {
    SheetbookError::ForbiddenError(message.to_string())
}

pub fn external_service_error<T: fmt::Display>(service_name: &str, message: T) -> SheetbookError {
    SheetbookError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}

pub fn internal_error<T: fmt::Display>(message: T) -> SheetbookError {
    SheetbookError::InternalError(message.to_string())
}

/// Renders an error chain as `outer: cause: root cause` for logging.
pub fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}
