//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::chat::ChatError;
use crate::fate::FateError;
use crate::payment::PaymentError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for HTTP handlers.
///
/// Variants that reach users carry an already localized message; the
/// technical cause goes into `details`.
#[derive(Debug)]
pub enum AppError {
    /// Resource not found
    NotFound(String),
    /// Invalid request (validation error)
    BadRequest(String),
    /// Wall clock time missing or doubled in its zone
    LocalTimeInvalid { message: String, details: String },
    /// Couple request with two identical genders
    PreconditionFailed { message: String, details: String },
    /// Ephemeris could not answer
    EphemerisUnavailable { message: String, details: String },
    /// Assistant disabled or failing
    ChatUnavailable { message: String, details: Option<String> },
    /// Internal server error
    Internal(String),
}

impl AppError {
    /// Map a computation failure, with `message` already localized.
    pub fn from_fate(err: FateError, message: impl Into<String>) -> Self {
        let message = message.into();
        let details = err.to_string();
        match err {
            FateError::AmbiguousOrInvalidLocalTime { .. } => {
                AppError::LocalTimeInvalid { message, details }
            }
            FateError::PreconditionFailed { .. } => AppError::PreconditionFailed { message, details },
            FateError::EphemerisUnavailable(_) => {
                AppError::EphemerisUnavailable { message, details }
            }
        }
    }

    /// Map an assistant failure, with `message` already localized.
    pub fn from_chat(err: ChatError, message: impl Into<String>) -> Self {
        match err {
            ChatError::EmptyInput => AppError::BadRequest(err.to_string()),
            other => AppError::ChatUnavailable {
                message: message.into(),
                details: Some(other.to_string()),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", msg)),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg))
            }
            AppError::LocalTimeInvalid { message, details } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::new("LOCAL_TIME_INVALID", message).with_details(details),
            ),
            AppError::PreconditionFailed { message, details } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::new("PRECONDITION_FAILED", message).with_details(details),
            ),
            AppError::EphemerisUnavailable { message, details } => (
                StatusCode::SERVICE_UNAVAILABLE,
                ApiError::new("EPHEMERIS_UNAVAILABLE", message).with_details(details),
            ),
            AppError::ChatUnavailable { message, details } => {
                let mut error = ApiError::new("CHAT_UNAVAILABLE", message);
                if let Some(details) = details {
                    error = error.with_details(details);
                }
                (StatusCode::SERVICE_UNAVAILABLE, error)
            }
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("INTERNAL_ERROR", msg),
            ),
        };

        (status, Json(error)).into_response()
    }
}

impl From<PaymentError> for AppError {
    fn from(err: PaymentError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}
