use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::authorization::{self, Outcome};
use crate::domain::{Actor, Post, PostDetails, PostDraft};
use crate::error::DomainError;
use crate::ports::{CategoryRepository, LocationRepository, PostRepository};

/// Single-post reads and the author-only create/edit/delete flows.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    categories: Arc<dyn CategoryRepository>,
    locations: Arc<dyn LocationRepository>,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        categories: Arc<dyn CategoryRepository>,
        locations: Arc<dyn LocationRepository>,
    ) -> Self {
        Self {
            posts,
            categories,
            locations,
        }
    }

    /// A post as seen by `viewer`. Hidden posts are reported as missing.
    pub async fn detail(
        &self,
        post_id: Uuid,
        viewer: Option<&Actor>,
        now: DateTime<Utc>,
    ) -> Result<PostDetails, DomainError> {
        self.posts
            .find_details(post_id)
            .await?
            .filter(|post| authorization::can_view(post, viewer, now))
            .ok_or_else(|| DomainError::not_found("post", post_id))
    }

    pub async fn create(&self, actor: &Actor, draft: PostDraft) -> Result<Post, DomainError> {
        self.validate(&draft).await?;

        let post = self.posts.save(Post::new(actor.id, draft)).await?;
        tracing::info!(post_id = %post.id, author = %actor.username, "Post created");
        Ok(post)
    }

    pub async fn update(
        &self,
        actor: &Actor,
        post_id: Uuid,
        draft: PostDraft,
    ) -> Result<Outcome<Post>, DomainError> {
        let mut post = self.owned_post(post_id).await?;
        if !authorization::can_modify(actor, &post) {
            tracing::warn!(%post_id, actor = %actor.username, "Edit by non-author redirected");
            return Ok(Outcome::RedirectToPost(post.id));
        }

        self.validate(&draft).await?;
        post.apply(draft);

        let post = self.posts.save(post).await?;
        tracing::info!(%post_id, "Post updated");
        Ok(Outcome::Applied(post))
    }

    pub async fn delete(&self, actor: &Actor, post_id: Uuid) -> Result<Outcome<()>, DomainError> {
        let post = self.owned_post(post_id).await?;
        if !authorization::can_modify(actor, &post) {
            tracing::warn!(%post_id, actor = %actor.username, "Delete by non-author redirected");
            return Ok(Outcome::RedirectToPost(post.id));
        }

        self.posts.delete(post.id).await?;
        tracing::info!(%post_id, "Post deleted");
        Ok(Outcome::Applied(()))
    }

    async fn owned_post(&self, post_id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", post_id))
    }

    /// Field rules plus existence of the referenced category and location.
    async fn validate(&self, draft: &PostDraft) -> Result<(), DomainError> {
        draft.validate()?;

        if self.categories.find_by_id(draft.category_id).await?.is_none() {
            return Err(DomainError::Validation(format!(
                "Category {} does not exist",
                draft.category_id
            )));
        }
        if let Some(location_id) = draft.location_id {
            if self.locations.find_by_id(location_id).await?.is_none() {
                return Err(DomainError::Validation(format!(
                    "Location {location_id} does not exist"
                )));
            }
        }
        Ok(())
    }
}
