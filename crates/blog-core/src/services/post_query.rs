use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::{Actor, Category, PostDetails, User};
use crate::error::DomainError;
use crate::pagination::{Page, PageRequest};
use crate::ports::{CategoryRepository, PostListQuery, PostRepository, UserRepository};

/// Builds the paginated post listings: the index, a category, and a profile.
#[derive(Clone)]
pub struct PostQueryService {
    posts: Arc<dyn PostRepository>,
    categories: Arc<dyn CategoryRepository>,
    users: Arc<dyn UserRepository>,
}

impl PostQueryService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        categories: Arc<dyn CategoryRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            posts,
            categories,
            users,
        }
    }

    /// All publicly visible posts.
    pub async fn list_index(
        &self,
        now: DateTime<Utc>,
        page: PageRequest,
    ) -> Result<Page<PostDetails>, DomainError> {
        self.fetch(PostListQuery::visible_at(now), page).await
    }

    /// Visible posts of a published category.
    pub async fn list_by_category(
        &self,
        slug: &str,
        now: DateTime<Utc>,
        page: PageRequest,
    ) -> Result<(Page<PostDetails>, Category), DomainError> {
        let category = self
            .categories
            .find_by_slug(slug)
            .await?
            .filter(|category| category.is_published)
            .ok_or_else(|| DomainError::not_found("category", slug))?;

        let posts = self
            .fetch(PostListQuery::visible_at(now).in_category(category.id), page)
            .await?;

        Ok((posts, category))
    }

    /// Posts written by `username`.
    ///
    /// The profile owner sees every one of their posts, including unpublished
    /// and scheduled ones; everyone else sees only the visible ones.
    pub async fn list_by_profile(
        &self,
        username: &str,
        viewer: Option<&Actor>,
        now: DateTime<Utc>,
        page: PageRequest,
    ) -> Result<(Page<PostDetails>, User), DomainError> {
        let profile = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found("user", username))?;

        let self_view = viewer.is_some_and(|actor| actor.id == profile.id);
        let query = if self_view {
            PostListQuery::default()
        } else {
            PostListQuery::visible_at(now)
        };

        let posts = self.fetch(query.by_author(profile.id), page).await?;
        Ok((posts, profile))
    }

    async fn fetch(
        &self,
        query: PostListQuery,
        page: PageRequest,
    ) -> Result<Page<PostDetails>, DomainError> {
        tracing::debug!(?query, page = page.number, "Listing posts");

        let posts = self.posts.list(query, page).await?;
        page.ensure_in_range(posts.total)?;
        Ok(posts)
    }
}
