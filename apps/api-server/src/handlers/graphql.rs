//! GraphQL endpoint and GraphiQL IDE.

use actix_web::{HttpResponse, web};
use async_graphql::http::GraphiQLSource;

use crate::graphql::format_response;
use crate::middleware::auth::RequestAuth;
use crate::state::AppState;

/// Execute a GraphQL request with the caller's auth context attached.
///
/// POST /graphql
pub async fn graphql(
    state: web::Data<AppState>,
    auth: RequestAuth,
    request: web::Json<async_graphql::Request>,
) -> HttpResponse {
    let request = request.into_inner().data(auth.into_inner());
    let response = state.schema.execute(request).await;

    HttpResponse::Ok().json(format_response(response))
}

/// GraphiQL IDE.
///
/// GET /graphql
pub async fn graphiql() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(GraphiQLSource::build().endpoint("/graphql").finish())
}
