//! CORS policy: any origin, the methods the API serves, and the two
//! request headers clients send.

use actix_cors::Cors;
use actix_web::http::{Method, header};

/// Build the CORS middleware. Preflight `OPTIONS` requests are answered here.
pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods([
            Method::OPTIONS,
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allowed_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(3600)
}
