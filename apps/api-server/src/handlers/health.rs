//! Health check endpoint.

use actix_web::{HttpResponse, web};
use feed_shared::dto::HealthResponse;

use crate::state::AppState;

/// Health check endpoint - returns server status and storage backend.
///
/// GET /health
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let status = if database_reachable(&state).await {
        "ok"
    } else {
        "degraded"
    };

    let response = HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        storage: state.storage_kind().to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    HttpResponse::Ok().json(response)
}

#[cfg(feature = "postgres")]
async fn database_reachable(state: &AppState) -> bool {
    match &state.db {
        Some(db) => match db.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Database ping failed: {}", e);
                false
            }
        },
        None => true,
    }
}

#[cfg(not(feature = "postgres"))]
async fn database_reachable(_state: &AppState) -> bool {
    true
}
