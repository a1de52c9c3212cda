//! Application services - the rules each GraphQL resolver delegates to.

mod auth_context;
mod images;
mod posts;
mod users;

pub use auth_context::AuthContext;
pub use images::clear_image;
pub use posts::{POSTS_PER_PAGE, PostService, page_offset};
pub use users::{LoginData, UserService};

use uuid::Uuid;

use crate::error::DomainError;

/// Parse a client-supplied id. Anything that is not a valid id cannot name
/// an existing entity, so it is reported as not found.
pub(crate) fn parse_id(entity_type: &'static str, id: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(id).map_err(|_| DomainError::not_found(entity_type, id))
}
