//! Root query and mutation operations.

use std::sync::Arc;

use async_graphql::{Context, EmptySubscription, ID, Object, Result, Schema};
use feed_core::{PostService, UserService};

use super::types::{
    AuthData, DeleteMsg, PostData, PostInput, PostObject, UserInput, UserObject, UserStatus,
};
use super::{IntoGraphQl, auth};

pub type FeedSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Build the schema with the services resolvers depend on.
pub fn build_schema(users: Arc<UserService>, posts: Arc<PostService>) -> FeedSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(users)
        .data(posts)
        .finish()
}

fn users<'a>(ctx: &Context<'a>) -> Result<&'a Arc<UserService>> {
    ctx.data::<Arc<UserService>>()
}

fn posts<'a>(ctx: &Context<'a>) -> Result<&'a Arc<PostService>> {
    ctx.data::<Arc<PostService>>()
}

#[derive(Default)]
pub struct QueryRoot;

#[Object(name = "RootQuery")]
impl QueryRoot {
    /// Exchange credentials for an access token.
    async fn login(&self, ctx: &Context<'_>, email: String, password: String) -> Result<AuthData> {
        let login = users(ctx)?.login(&email, &password).await.into_graphql()?;
        Ok(AuthData {
            token: login.token,
            user_id: login.user_id.to_string(),
        })
    }

    /// One page of the feed, newest first.
    async fn posts(&self, ctx: &Context<'_>, page: Option<i32>) -> Result<PostData> {
        let page = posts(ctx)?.list(&auth(ctx), page).await.into_graphql()?;
        Ok(PostData {
            posts: page.posts.into_iter().map(PostObject).collect(),
            total_posts: i32::try_from(page.total_posts).unwrap_or(i32::MAX),
        })
    }

    async fn post(&self, ctx: &Context<'_>, id: ID) -> Result<PostObject> {
        let post = posts(ctx)?.get(&auth(ctx), &id).await.into_graphql()?;
        Ok(PostObject(post))
    }

    async fn user_status(&self, ctx: &Context<'_>) -> Result<UserStatus> {
        let message = users(ctx)?.status(&auth(ctx)).await.into_graphql()?;
        Ok(UserStatus { message })
    }
}

#[derive(Default)]
pub struct MutationRoot;

#[Object(name = "RootMutation")]
impl MutationRoot {
    async fn create_user(&self, ctx: &Context<'_>, user_input: UserInput) -> Result<UserObject> {
        let user = users(ctx)?.register(user_input.into()).await.into_graphql()?;
        Ok(UserObject(user))
    }

    async fn create_post(&self, ctx: &Context<'_>, post_input: PostInput) -> Result<PostObject> {
        let post = posts(ctx)?
            .create(&auth(ctx), post_input.into())
            .await
            .into_graphql()?;
        Ok(PostObject(post))
    }

    async fn update_post(
        &self,
        ctx: &Context<'_>,
        id: ID,
        post_input: PostInput,
    ) -> Result<PostObject> {
        let post = posts(ctx)?
            .update(&auth(ctx), &id, post_input.into())
            .await
            .into_graphql()?;
        Ok(PostObject(post))
    }

    async fn delete_post(&self, ctx: &Context<'_>, id: ID) -> Result<DeleteMsg> {
        posts(ctx)?.delete(&auth(ctx), &id).await.into_graphql()?;
        Ok(DeleteMsg {
            message: "Post deleted".to_string(),
        })
    }

    async fn update_status(&self, ctx: &Context<'_>, status: String) -> Result<UserStatus> {
        let message = users(ctx)?
            .update_status(&auth(ctx), status)
            .await
            .into_graphql()?;
        Ok(UserStatus { message })
    }
}
