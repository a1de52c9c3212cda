//! # Feed Shared
//!
//! Wire types shared between the backend and its clients.

pub mod dto;
pub mod response;

pub use response::{ErrorResponse, FieldMessage};
