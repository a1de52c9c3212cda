//! # Feed Core
//!
//! The domain layer of the feed backend.
//! Entities, ports, validation rules and the application services that
//! enforce authentication and ownership. No infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;
pub mod validation;

pub use error::{DomainError, FieldError, RepoError};
pub use services::{AuthContext, PostService, UserService};
