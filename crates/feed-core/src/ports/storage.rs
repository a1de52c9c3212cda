//! Image storage port.

use async_trait::async_trait;

/// Storage for uploaded images.
///
/// Paths returned by `save` are public paths (`images/<file>`) that the
/// static file route serves and that `delete` accepts back.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store an image and return its public path.
    async fn save(&self, file_name: &str, bytes: &[u8]) -> Result<String, StorageError>;

    /// Remove a previously stored image. Missing files are not an error.
    async fn delete(&self, path: &str) -> Result<(), StorageError>;
}

/// Image storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Path is outside the image store: {0}")]
    InvalidPath(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
