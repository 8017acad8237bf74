//! In-memory Entity Store - used when no database is configured and in tests.
//!
//! Enforces the same rules as the PostgreSQL schema: unique usernames and
//! category slugs, cascading deletes from users and posts, and null-on-delete
//! for a post's category and location.
//! Note: Data is lost on process restart.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use blog_core::domain::{
    Author, Category, Comment, CommentDetails, Location, Post, PostDetails, User,
};
use blog_core::error::RepoError;
use blog_core::pagination::{Page, PageRequest};
use blog_core::ports::{
    BaseRepository, CategoryRepository, CommentRepository, LocationRepository, PostListQuery,
    PostRepository, UserRepository,
};
use blog_core::services::visibility;

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    categories: HashMap<Uuid, Category>,
    locations: HashMap<Uuid, Location>,
    posts: HashMap<Uuid, Post>,
    comments: HashMap<Uuid, Comment>,
}

impl Tables {
    fn author(&self, user_id: Uuid) -> Result<Author, RepoError> {
        self.users
            .get(&user_id)
            .map(User::as_author)
            .ok_or_else(|| RepoError::Constraint(format!("author {user_id} does not exist")))
    }

    fn details(&self, post: &Post) -> Result<PostDetails, RepoError> {
        Ok(PostDetails {
            post: post.clone(),
            author: self.author(post.author_id)?,
            category: post
                .category_id
                .and_then(|id| self.categories.get(&id))
                .cloned(),
            location: post
                .location_id
                .and_then(|id| self.locations.get(&id))
                .cloned(),
            comment_count: self.comment_count(post.id),
        })
    }

    fn comment_count(&self, post_id: Uuid) -> u64 {
        self.comments
            .values()
            .filter(|comment| comment.post_id == post_id)
            .count() as u64
    }

    fn matches(&self, post: &Post, query: &PostListQuery) -> bool {
        if query.author_id.is_some_and(|id| id != post.author_id) {
            return false;
        }
        if query.category_id.is_some_and(|id| Some(id) != post.category_id) {
            return false;
        }
        query.visible_at.is_none_or(|now| {
            let category = post.category_id.and_then(|id| self.categories.get(&id));
            visibility::is_visible(post, category, now)
        })
    }

    /// Remove a post together with its comments.
    fn cascade_post(&mut self, post_id: Uuid) {
        self.posts.remove(&post_id);
        self.comments.retain(|_, comment| comment.post_id != post_id);
    }
}

/// Entity Store held in process memory behind an async RwLock.
pub struct InMemoryEntityStore {
    tables: RwLock<Tables>,
}

impl InMemoryEntityStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
        }
    }
}

impl Default for InMemoryEntityStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryEntityStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .values()
            .any(|other| other.id != user.id && other.username == user.username)
        {
            return Err(RepoError::Constraint(format!(
                "username {} already exists",
                user.username
            )));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }

        let authored: Vec<Uuid> = tables
            .posts
            .values()
            .filter(|post| post.author_id == id)
            .map(|post| post.id)
            .collect();
        for post_id in authored {
            tables.cascade_post(post_id);
        }
        tables.comments.retain(|_, comment| comment.author_id != id);

        tracing::debug!(user_id = %id, "User deleted with authored posts and comments");
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryEntityStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|user| user.email == email)
            .cloned())
    }
}

#[async_trait]
impl BaseRepository<Category, Uuid> for InMemoryEntityStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, RepoError> {
        Ok(self.tables.read().await.categories.get(&id).cloned())
    }

    async fn save(&self, category: Category) -> Result<Category, RepoError> {
        let mut tables = self.tables.write().await;
        if tables
            .categories
            .values()
            .any(|other| other.id != category.id && other.slug == category.slug)
        {
            return Err(RepoError::Constraint(format!(
                "slug {} already exists",
                category.slug
            )));
        }
        tables.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables.categories.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        for post in tables.posts.values_mut() {
            if post.category_id == Some(id) {
                post.category_id = None;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl CategoryRepository for InMemoryEntityStore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .categories
            .values()
            .find(|category| category.slug == slug)
            .cloned())
    }
}

#[async_trait]
impl BaseRepository<Location, Uuid> for InMemoryEntityStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Location>, RepoError> {
        Ok(self.tables.read().await.locations.get(&id).cloned())
    }

    async fn save(&self, location: Location) -> Result<Location, RepoError> {
        let mut tables = self.tables.write().await;
        tables.locations.insert(location.id, location.clone());
        Ok(location)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables.locations.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        for post in tables.posts.values_mut() {
            if post.location_id == Some(id) {
                post.location_id = None;
            }
        }
        Ok(())
    }
}

impl LocationRepository for InMemoryEntityStore {}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryEntityStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn save(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&post.author_id) {
            return Err(RepoError::Constraint(format!(
                "author {} does not exist",
                post.author_id
            )));
        }
        if post
            .category_id
            .is_some_and(|id| !tables.categories.contains_key(&id))
        {
            return Err(RepoError::Constraint("category does not exist".to_string()));
        }
        if post
            .location_id
            .is_some_and(|id| !tables.locations.contains_key(&id))
        {
            return Err(RepoError::Constraint("location does not exist".to_string()));
        }
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&id) {
            return Err(RepoError::NotFound);
        }
        tables.cascade_post(id);
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryEntityStore {
    async fn find_details(&self, id: Uuid) -> Result<Option<PostDetails>, RepoError> {
        let tables = self.tables.read().await;
        tables
            .posts
            .get(&id)
            .map(|post| tables.details(post))
            .transpose()
    }

    async fn list(
        &self,
        query: PostListQuery,
        page: PageRequest,
    ) -> Result<Page<PostDetails>, RepoError> {
        let tables = self.tables.read().await;
        let mut posts: Vec<&Post> = tables
            .posts
            .values()
            .filter(|post| tables.matches(post, &query))
            .collect();
        posts.sort_by(|a, b| {
            b.pub_date
                .cmp(&a.pub_date)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });

        let page = Page::slice(posts, page);
        let items = page
            .items
            .iter()
            .map(|post| tables.details(post))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page {
            items,
            number: page.number,
            per_page: page.per_page,
            total: page.total,
            num_pages: page.num_pages,
        })
    }
}

#[async_trait]
impl BaseRepository<Comment, Uuid> for InMemoryEntityStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        Ok(self.tables.read().await.comments.get(&id).cloned())
    }

    async fn save(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&comment.author_id) {
            return Err(RepoError::Constraint("author does not exist".to_string()));
        }
        if !tables.posts.contains_key(&comment.post_id) {
            return Err(RepoError::Constraint("post does not exist".to_string()));
        }
        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables
            .comments
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl CommentRepository for InMemoryEntityStore {
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<CommentDetails>, RepoError> {
        let tables = self.tables.read().await;
        let mut comments: Vec<&Comment> = tables
            .comments
            .values()
            .filter(|comment| comment.post_id == post_id)
            .collect();
        comments.sort_by_key(|comment| (comment.created_at, comment.id));

        comments
            .into_iter()
            .map(|comment| {
                Ok(CommentDetails {
                    comment: comment.clone(),
                    author: tables.author(comment.author_id)?,
                })
            })
            .collect()
    }

    async fn count_for_post(&self, post_id: Uuid) -> Result<u64, RepoError> {
        Ok(self.tables.read().await.comment_count(post_id))
    }
}
