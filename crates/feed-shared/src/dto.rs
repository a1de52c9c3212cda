//! Data Transfer Objects - bodies of the REST endpoints.

use serde::{Deserialize, Serialize};

/// Response of `PUT /upload-image`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}

impl UploadResponse {
    pub fn uploaded(file_path: impl Into<String>) -> Self {
        Self {
            message: "File uploaded".to_string(),
            file_path: Some(file_path.into()),
        }
    }

    pub fn no_file() -> Self {
        Self {
            message: "No file uploaded".to_string(),
            file_path: None,
        }
    }
}

/// Response of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub storage: String,
    pub timestamp: String,
}
