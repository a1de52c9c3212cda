//! GraphQL schema: root operations, object types and error formatting.

mod format;
mod schema;
mod types;

pub use format::{FormattedError, GraphQlResponse, format_error, format_response};
pub use schema::{FeedSchema, MutationRoot, QueryRoot, build_schema};
pub use types::{AuthData, PostData, PostInput, PostObject, UserInput, UserObject};

use async_graphql::{Context, ErrorExtensions};
use feed_core::{AuthContext, DomainError};

use crate::middleware::error::AppError;

/// Convert service results into resolver results carrying `status`/`data`
/// extensions.
pub(crate) trait IntoGraphQl<T> {
    fn into_graphql(self) -> async_graphql::Result<T>;
}

impl<T> IntoGraphQl<T> for Result<T, DomainError> {
    fn into_graphql(self) -> async_graphql::Result<T> {
        self.map_err(|e| AppError::from(e).extend())
    }
}

/// The request's auth context, attached by the HTTP handler.
pub(crate) fn auth(ctx: &Context<'_>) -> AuthContext {
    ctx.data_opt::<AuthContext>().copied().unwrap_or_default()
}
