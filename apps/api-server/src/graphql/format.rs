//! Top-level GraphQL error formatting.
//!
//! Resolver errors carry their HTTP status (and validation entries) as
//! extensions; here they are lifted into the error object itself so every
//! error reads `{message, status, data?, locations?, path?}`.

use async_graphql::{Response, ServerError};
use serde::Serialize;
use serde_json::Value;

const DEFAULT_STATUS: u16 = 500;

#[derive(Debug, Serialize)]
pub struct FormattedError {
    pub message: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locations: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<Value>,
}

/// `{data, errors?}` body of `POST /graphql`.
#[derive(Debug, Serialize)]
pub struct GraphQlResponse {
    pub data: Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FormattedError>,
}

pub fn format_error(error: &ServerError) -> FormattedError {
    let extensions = error
        .extensions
        .as_ref()
        .and_then(|ext| serde_json::to_value(ext).ok())
        .unwrap_or_default();

    let status = extensions
        .get("status")
        .and_then(Value::as_u64)
        .and_then(|s| u16::try_from(s).ok())
        .unwrap_or(DEFAULT_STATUS);

    let non_empty = |value: Value| match &value {
        Value::Array(items) if items.is_empty() => None,
        _ => Some(value),
    };

    FormattedError {
        message: error.message.clone(),
        status,
        data: extensions.get("data").cloned(),
        locations: serde_json::to_value(&error.locations).ok().and_then(non_empty),
        path: serde_json::to_value(&error.path).ok().and_then(non_empty),
    }
}

pub fn format_response(response: Response) -> GraphQlResponse {
    let errors: Vec<FormattedError> = response.errors.iter().map(format_error).collect();
    for error in &errors {
        if error.status >= DEFAULT_STATUS {
            tracing::error!(status = error.status, "GraphQL error: {}", error.message);
        } else {
            tracing::debug!(status = error.status, "GraphQL error: {}", error.message);
        }
    }

    GraphQlResponse {
        data: response.data.into_json().unwrap_or_default(),
        errors,
    }
}
