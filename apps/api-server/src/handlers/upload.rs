//! Image upload endpoint.

use actix_multipart::{Field, Multipart};
use actix_web::{HttpMessage, HttpRequest, HttpResponse, web};
use feed_core::domain::ImageKind;
use feed_core::services::clear_image;
use feed_shared::dto::UploadResponse;
use futures::TryStreamExt;

use crate::middleware::auth::RequestAuth;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const IMAGE_FIELD: &str = "image";
const OLD_PATH_FIELD: &str = "oldPath";
const MAX_TEXT_FIELD_BYTES: usize = 1024;

/// Store an uploaded image and drop the one it replaces.
///
/// A body that is not `multipart/*` carries no file and is answered like an
/// empty form.
///
/// PUT /upload-image
pub async fn upload_image(
    req: HttpRequest,
    state: web::Data<AppState>,
    auth: RequestAuth,
    mut payload: Multipart,
) -> AppResult<HttpResponse> {
    auth.require()?;

    if !is_multipart(&req) {
        return Ok(HttpResponse::Ok().json(UploadResponse::no_file()));
    }

    let mut image: Option<(String, Vec<u8>)> = None;
    let mut old_path: Option<String> = None;

    while let Some(mut field) = payload.try_next().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            IMAGE_FIELD => {
                let mime = field
                    .content_type()
                    .map(|m| m.essence_str().to_string())
                    .unwrap_or_default();
                if ImageKind::from_mime(&mime).is_none() {
                    tracing::debug!(mime = %mime, "Rejected image upload");
                    return Err(AppError::Unprocessable("Unsupported image type".to_string()));
                }
                let file_name = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename())
                    .unwrap_or(IMAGE_FIELD)
                    .to_string();
                let bytes = read_field(&mut field, state.max_upload_bytes, "Image too large").await?;
                image = Some((file_name, bytes));
            }
            OLD_PATH_FIELD => {
                let bytes = read_field(&mut field, MAX_TEXT_FIELD_BYTES, "oldPath too long").await?;
                let value = String::from_utf8(bytes)
                    .map_err(|_| AppError::BadRequest("oldPath must be UTF-8".to_string()))?;
                old_path = Some(value);
            }
            _ => {
                read_field(&mut field, state.max_upload_bytes, "Field too large").await?;
            }
        }
    }

    let Some((file_name, bytes)) = image else {
        return Ok(HttpResponse::Ok().json(UploadResponse::no_file()));
    };

    let path = state
        .images
        .save(&file_name, &bytes)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to store image: {}", e)))?;
    tracing::info!(image = %path, bytes = bytes.len(), "Image uploaded");

    if let Some(old) = old_path.as_deref() {
        clear_image(state.images.as_ref(), old).await;
    }

    Ok(HttpResponse::Created().json(UploadResponse::uploaded(path)))
}

fn is_multipart(req: &HttpRequest) -> bool {
    matches!(req.mime_type(), Ok(Some(mime)) if mime.type_().as_str() == "multipart")
}

async fn read_field(field: &mut Field, limit: usize, too_large: &str) -> AppResult<Vec<u8>> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(multipart_error)? {
        if bytes.len() + chunk.len() > limit {
            return Err(AppError::PayloadTooLarge(too_large.to_string()));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

fn multipart_error(err: actix_multipart::MultipartError) -> AppError {
    AppError::BadRequest(format!("Invalid multipart body: {}", err))
}
