//! Error body returned by every endpoint.

use serde::{Deserialize, Serialize};

/// A validation message attached to one input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMessage {
    pub field: String,
    pub message: String,
}

/// `{message, status, data?}` error body.
///
/// `data` is only present for validation failures and lists every invalid
/// field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<FieldMessage>>,
}

impl ErrorResponse {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Vec<FieldMessage>) -> Self {
        self.data = Some(data);
        self
    }

    pub fn internal_error() -> Self {
        Self::new(500, "An error occurred")
    }
}
