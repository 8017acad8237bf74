use std::sync::Arc;

use uuid::Uuid;

use super::authorization::{self, Outcome};
use crate::domain::{Actor, Comment, CommentDetails, CommentDraft};
use crate::error::DomainError;
use crate::ports::{CommentRepository, PostRepository};

/// Comment listing and the author-only comment flows.
///
/// Comments are not filtered by visibility: whoever can see the post sees all
/// of its comments.
#[derive(Clone)]
pub struct CommentService {
    comments: Arc<dyn CommentRepository>,
    posts: Arc<dyn PostRepository>,
}

impl CommentService {
    pub fn new(comments: Arc<dyn CommentRepository>, posts: Arc<dyn PostRepository>) -> Self {
        Self { comments, posts }
    }

    /// Comments on a post, oldest first.
    pub async fn comments_for(&self, post_id: Uuid) -> Result<Vec<CommentDetails>, DomainError> {
        Ok(self.comments.list_for_post(post_id).await?)
    }

    pub async fn comment_count(&self, post_id: Uuid) -> Result<u64, DomainError> {
        Ok(self.comments.count_for_post(post_id).await?)
    }

    pub async fn create(
        &self,
        actor: &Actor,
        post_id: Uuid,
        draft: CommentDraft,
    ) -> Result<Comment, DomainError> {
        if self.posts.find_by_id(post_id).await?.is_none() {
            return Err(DomainError::not_found("post", post_id));
        }
        draft.validate()?;

        let comment = self
            .comments
            .save(Comment::new(actor.id, post_id, draft.text))
            .await?;
        tracing::info!(comment_id = %comment.id, %post_id, "Comment added");
        Ok(comment)
    }

    pub async fn update(
        &self,
        actor: &Actor,
        post_id: Uuid,
        comment_id: Uuid,
        draft: CommentDraft,
    ) -> Result<Outcome<Comment>, DomainError> {
        let mut comment = self.comment_on(post_id, comment_id).await?;
        if !authorization::can_modify(actor, &comment) {
            tracing::warn!(%comment_id, actor = %actor.username, "Comment edit by non-author redirected");
            return Ok(Outcome::RedirectToPost(comment.post_id));
        }

        draft.validate()?;
        comment.text = draft.text;

        Ok(Outcome::Applied(self.comments.save(comment).await?))
    }

    pub async fn delete(
        &self,
        actor: &Actor,
        post_id: Uuid,
        comment_id: Uuid,
    ) -> Result<Outcome<()>, DomainError> {
        let comment = self.comment_on(post_id, comment_id).await?;
        if !authorization::can_modify(actor, &comment) {
            tracing::warn!(%comment_id, actor = %actor.username, "Comment delete by non-author redirected");
            return Ok(Outcome::RedirectToPost(comment.post_id));
        }

        self.comments.delete(comment.id).await?;
        tracing::info!(%comment_id, %post_id, "Comment deleted");
        Ok(Outcome::Applied(()))
    }

    async fn comment_on(&self, post_id: Uuid, comment_id: Uuid) -> Result<Comment, DomainError> {
        self.comments
            .find_by_id(comment_id)
            .await?
            .filter(|comment| comment.post_id == post_id)
            .ok_or_else(|| DomainError::not_found("comment", comment_id))
    }
}
