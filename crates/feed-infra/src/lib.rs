//! # Feed Infrastructure
//!
//! Concrete implementations of the ports defined in `feed-core`:
//! JWT tokens, Argon2 password hashing, SeaORM and in-memory repositories,
//! and local image storage.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No database driver, in-memory repositories only
//! - `postgres` - PostgreSQL repositories via SeaORM

pub mod auth;
pub mod database;
pub mod storage;

pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
pub use database::{
    DatabaseConfig, DatabaseConnections, InMemoryPostRepository, InMemoryUserRepository,
};
pub use storage::LocalImageStore;

#[cfg(feature = "postgres")]
pub use database::{PostgresPostRepository, PostgresUserRepository};
