use crate::ports::ImageStore;

/// Remove an image without failing the caller.
///
/// Cleanup runs after the owning record is already gone, so errors are
/// logged and swallowed.
pub async fn clear_image(store: &dyn ImageStore, path: &str) {
    if path.trim().is_empty() {
        return;
    }
    match store.delete(path).await {
        Ok(()) => tracing::debug!(image = %path, "Image removed"),
        Err(e) => tracing::warn!(image = %path, error = %e, "Failed to remove image"),
    }
}
