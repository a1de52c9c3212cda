//! Error handling - one `{message, status, data?}` shape for REST and GraphQL.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use async_graphql::ErrorExtensions;
use feed_core::DomainError;
use feed_shared::{ErrorResponse, FieldMessage};
use thiserror::Error;

/// Application-level error type shared by handlers and resolvers.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    /// Well-formed input the server refuses, e.g. a duplicate account.
    #[error("{0}")]
    Unprocessable(String),

    #[error("{message}")]
    Validation {
        message: String,
        errors: Vec<FieldMessage>,
    },

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Client-facing body. Internal details are logged, never returned.
    pub fn to_error_response(&self) -> ErrorResponse {
        let status = self.status_code().as_u16();
        match self {
            AppError::Validation { message, errors } => {
                ErrorResponse::new(status, message.clone()).with_data(errors.clone())
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
            other => ErrorResponse::new(status, other.to_string()),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Unprocessable(_) | AppError::Validation { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self.to_error_response())
    }
}

impl ErrorExtensions for AppError {
    fn extend(&self) -> async_graphql::Error {
        let body = self.to_error_response();
        let data = body
            .data
            .as_ref()
            .and_then(|data| serde_json::to_value(data).ok())
            .and_then(|json| async_graphql::Value::from_json(json).ok());

        async_graphql::Error::new(body.message).extend_with(|_, ext| {
            ext.set("status", i32::from(body.status));
            if let Some(data) = data {
                ext.set("data", data);
            }
        })
    }
}

// Conversion from domain errors
impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        let message = err.to_string();
        match err {
            DomainError::NotFound { .. } => AppError::NotFound(message),
            DomainError::Validation(fields) => AppError::Validation {
                message,
                errors: fields
                    .into_iter()
                    .map(|f| FieldMessage {
                        field: f.field.to_string(),
                        message: f.message,
                    })
                    .collect(),
            },
            DomainError::Duplicate(_) => AppError::Unprocessable(message),
            DomainError::Unauthenticated(_) => AppError::Unauthorized(message),
            DomainError::Forbidden(_) => AppError::Forbidden(message),
            DomainError::Internal(detail) => AppError::Internal(detail),
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
