//! GraphQL object and input types.

use std::sync::Arc;

use async_graphql::{Context, ErrorExtensions, ID, InputObject, Object, Result, SimpleObject};
use chrono::{DateTime, SecondsFormat, Utc};
use feed_core::domain::{NewUser, Post, PostDraft, User};
use feed_core::{PostService, UserService};

use super::IntoGraphQl;
use crate::middleware::error::AppError;

fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// A post as seen by clients.
pub struct PostObject(pub Post);

#[Object(name = "Post")]
impl PostObject {
    #[graphql(name = "_id")]
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    async fn title(&self) -> &str {
        &self.0.title
    }

    async fn content(&self) -> &str {
        &self.0.content
    }

    async fn image_url(&self) -> Option<&str> {
        self.0.image_url.as_deref()
    }

    /// The post's author.
    async fn creator(&self, ctx: &Context<'_>) -> Result<UserObject> {
        let users = ctx.data::<Arc<UserService>>()?;
        users
            .find(self.0.user_id)
            .await
            .into_graphql()?
            .map(UserObject)
            .ok_or_else(|| AppError::NotFound("Could not find user".to_string()).extend())
    }

    async fn created_at(&self) -> String {
        timestamp(&self.0.created_at)
    }

    async fn updated_at(&self) -> String {
        timestamp(&self.0.updated_at)
    }
}

/// A user as seen by clients. The password hash is never exposed.
pub struct UserObject(pub User);

#[Object(name = "User")]
impl UserObject {
    #[graphql(name = "_id")]
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn email(&self) -> &str {
        &self.0.email
    }

    async fn status(&self) -> &str {
        &self.0.status
    }

    /// Posts authored by this user, newest first.
    async fn posts(&self, ctx: &Context<'_>) -> Result<Vec<PostObject>> {
        let posts = ctx.data::<Arc<PostService>>()?;
        let owned = posts.by_owner(self.0.id).await.into_graphql()?;
        Ok(owned.into_iter().map(PostObject).collect())
    }
}

#[derive(SimpleObject)]
pub struct AuthData {
    pub token: String,
    pub user_id: String,
}

#[derive(SimpleObject)]
pub struct PostData {
    pub posts: Vec<PostObject>,
    pub total_posts: i32,
}

#[derive(SimpleObject)]
pub struct DeleteMsg {
    pub message: String,
}

#[derive(SimpleObject)]
pub struct UserStatus {
    pub message: String,
}

#[derive(InputObject)]
#[graphql(name = "UserInputData")]
pub struct UserInput {
    pub email: String,
    pub name: String,
    pub password: String,
}

impl From<UserInput> for NewUser {
    fn from(input: UserInput) -> Self {
        NewUser {
            email: input.email,
            name: input.name,
            password: input.password,
        }
    }
}

#[derive(InputObject)]
#[graphql(name = "PostInputData")]
pub struct PostInput {
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
}

impl From<PostInput> for PostDraft {
    fn from(input: PostInput) -> Self {
        let draft = PostDraft::new(input.title, input.content);
        match input.image_url {
            Some(url) if !url.trim().is_empty() => draft.with_image(url),
            _ => draft,
        }
    }
}
