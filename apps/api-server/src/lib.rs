//! # Feed API Server
//!
//! actix-web application serving the GraphQL feed API, image uploads and
//! the static image directory.

pub mod config;
pub mod graphql;
pub mod handlers;
pub mod middleware;
pub mod state;
pub mod telemetry;
