use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Post, PostDraft, PostPage};
use crate::error::{DomainError, RepoError};
use crate::ports::{ImageStore, PostRepository, UserRepository};
use crate::validation;

use super::{AuthContext, clear_image, parse_id};

/// Fixed feed page size.
pub const POSTS_PER_PAGE: u64 = 2;

/// Offset of a 1-indexed page. Missing, zero and negative pages mean page 1.
pub fn page_offset(page: Option<i32>) -> u64 {
    let page = match page {
        Some(p) if p > 0 => p as u64,
        _ => 1,
    };
    (page - 1) * POSTS_PER_PAGE
}

/// Post lifecycle and the public feed.
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
    images: Arc<dyn ImageStore>,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
        images: Arc<dyn ImageStore>,
    ) -> Self {
        Self {
            posts,
            users,
            images,
        }
    }

    /// Create a post owned by the acting user.
    ///
    /// The owner's post collection is derived from `Post::user_id`, so the
    /// single insert also adds the post to it.
    pub async fn create(&self, auth: &AuthContext, draft: PostDraft) -> Result<Post, DomainError> {
        let user_id = auth.require()?;
        validation::validate_post(&draft)?;

        let owner = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::Unauthenticated("Invalid User"))?;

        let post = self.posts.insert(Post::new(owner.id, draft)).await?;
        tracing::info!(post_id = %post.id, user_id = %owner.id, "Post created");
        Ok(post)
    }

    /// Replace title, content and image of a post the acting user owns.
    pub async fn update(
        &self,
        auth: &AuthContext,
        id: &str,
        draft: PostDraft,
    ) -> Result<Post, DomainError> {
        let user_id = auth.require()?;
        validation::validate_post(&draft)?;

        let mut post = self.owned_post(user_id, id).await?;
        post.apply(draft);

        let post_id = post.id;
        self.posts.update(post).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::not_found("post", post_id),
            other => other.into(),
        })
    }

    /// Delete a post the acting user owns, then drop its image.
    pub async fn delete(&self, auth: &AuthContext, id: &str) -> Result<(), DomainError> {
        let user_id = auth.require()?;
        let post = self.owned_post(user_id, id).await?;

        self.posts.delete(post.id).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::not_found("post", post.id),
            other => other.into(),
        })?;
        tracing::info!(post_id = %post.id, user_id = %user_id, "Post deleted");

        if let Some(image) = post.image_url.as_deref() {
            clear_image(self.images.as_ref(), image).await;
        }
        Ok(())
    }

    /// One page of the feed, newest first, with the total post count.
    pub async fn list(&self, auth: &AuthContext, page: Option<i32>) -> Result<PostPage, DomainError> {
        auth.require()?;
        let total_posts = self.posts.count().await?;
        let posts = self
            .posts
            .find_page(page_offset(page), POSTS_PER_PAGE)
            .await?;
        Ok(PostPage { posts, total_posts })
    }

    /// A single post by id.
    pub async fn get(&self, auth: &AuthContext, id: &str) -> Result<Post, DomainError> {
        auth.require()?;
        self.find(id).await
    }

    /// Posts owned by a user, newest first.
    pub async fn by_owner(&self, user_id: Uuid) -> Result<Vec<Post>, DomainError> {
        Ok(self.posts.find_by_user_id(user_id).await?)
    }

    async fn find(&self, id: &str) -> Result<Post, DomainError> {
        let post_id = parse_id("post", id)?;
        self.posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", post_id))
    }

    async fn owned_post(&self, user_id: Uuid, id: &str) -> Result<Post, DomainError> {
        let post = self.find(id).await?;
        if !post.is_owned_by(user_id) {
            tracing::warn!(post_id = %post.id, user_id = %user_id, "Rejected access to foreign post");
            return Err(DomainError::Forbidden("Not authorized to access this post"));
        }
        Ok(post)
    }
}
