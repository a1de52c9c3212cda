//! Local filesystem image store.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};

use feed_core::ports::{ImageStore, StorageError};

/// Stores images as flat files in one directory.
///
/// Public paths look like `images/<timestamp>-<name>`; the prefix is the
/// URL segment the static file route is mounted on.
pub struct LocalImageStore {
    dir: PathBuf,
    public_prefix: String,
}

impl LocalImageStore {
    pub fn new(dir: impl Into<PathBuf>, public_prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            public_prefix: public_prefix.into().trim_matches('/').to_string(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the directory if it does not exist yet.
    pub async fn ensure_dir(&self) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Map a public path back to a file inside the store.
    ///
    /// Only `<prefix>/<file>` is accepted: no nested directories, no `..`.
    fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        let invalid = || StorageError::InvalidPath(path.to_string());

        let relative = path
            .trim_start_matches('/')
            .strip_prefix(self.public_prefix.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or_else(invalid)?;

        let mut components = Path::new(relative).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(file)), None) => Ok(self.dir.join(file)),
            _ => Err(invalid()),
        }
    }
}

/// Keep the original name readable but filesystem-safe.
fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "image".to_string()
    } else {
        cleaned.to_string()
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn save(&self, file_name: &str, bytes: &[u8]) -> Result<String, StorageError> {
        let stamp = Utc::now()
            .to_rfc3339_opts(SecondsFormat::Millis, true)
            .replace(':', "-");
        let stored_name = format!("{}-{}", stamp, sanitize_file_name(file_name));

        self.ensure_dir().await?;
        tokio::fs::write(self.dir.join(&stored_name), bytes).await?;

        let public_path = format!("{}/{}", self.public_prefix, stored_name);
        tracing::debug!(image = %public_path, size = bytes.len(), "Image stored");
        Ok(public_path)
    }

    async fn delete(&self, path: &str) -> Result<(), StorageError> {
        let file = self.resolve(path)?;
        match tokio::fs::remove_file(&file).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
