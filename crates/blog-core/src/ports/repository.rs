use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Category, Comment, CommentDetails, Location, Post, PostDetails, User};
use crate::error::RepoError;
use crate::pagination::{Page, PageRequest};

/// Generic repository trait defining standard CRUD operations.
///
/// Implementations are the Entity Store: they own referential actions, so
/// `delete` cascades or nulls dependent rows according to each relation.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their unique username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    /// Find a user by email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
}

#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, Uuid> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError>;
}

#[async_trait]
pub trait LocationRepository: BaseRepository<Location, Uuid> {}

/// Filters for a post listing. Unset fields do not restrict the result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostListQuery {
    pub author_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    /// Keep only posts publicly visible at this instant.
    pub visible_at: Option<DateTime<Utc>>,
}

impl PostListQuery {
    pub fn visible_at(now: DateTime<Utc>) -> Self {
        Self {
            visible_at: Some(now),
            ..Self::default()
        }
    }

    pub fn by_author(mut self, author_id: Uuid) -> Self {
        self.author_id = Some(author_id);
        self
    }

    pub fn in_category(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }
}

#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Fetch a post with author, category, location and comment count.
    async fn find_details(&self, id: Uuid) -> Result<Option<PostDetails>, RepoError>;

    /// List posts newest `pub_date` first.
    async fn list(
        &self,
        query: PostListQuery,
        page: PageRequest,
    ) -> Result<Page<PostDetails>, RepoError>;
}

#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// Comments on a post, oldest first.
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<CommentDetails>, RepoError>;

    async fn count_for_post(&self, post_id: Uuid) -> Result<u64, RepoError>;
}
