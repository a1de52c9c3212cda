//! HTTP handlers and route configuration.

mod graphql;
mod health;
mod upload;

use std::path::Path;

use actix_web::{HttpRequest, error::JsonPayloadError, web};

use crate::config::IMAGE_ROUTE;
use crate::middleware::error::AppError;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig, images_dir: &Path) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .route("/health", web::get().to(health::health_check))
        .service(
            web::resource("/graphql")
                .route(web::post().to(graphql::graphql))
                .route(web::get().to(graphql::graphiql)),
        )
        .route("/upload-image", web::put().to(upload::upload_image))
        .service(actix_files::Files::new(
            &format!("/{}", IMAGE_ROUTE),
            images_dir.to_path_buf(),
        ));
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(format!("Invalid JSON body: {}", err)).into()
}
