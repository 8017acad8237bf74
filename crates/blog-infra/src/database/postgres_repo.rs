//! PostgreSQL repository implementations.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait,
};
use uuid::Uuid;

use blog_core::domain::{Author, Category, CommentDetails, Location, PostDetails, User};
use blog_core::error::RepoError;
use blog_core::pagination::{PAGE_SIZE, Page, PageRequest};
use blog_core::ports::{
    CategoryRepository, CommentRepository, LocationRepository, PostListQuery, PostRepository,
    UserRepository,
};

use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::location::{self, Entity as LocationEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, query_error};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL category repository.
pub type PostgresCategoryRepository = PostgresBaseRepository<CategoryEntity>;

/// PostgreSQL location repository.
pub type PostgresLocationRepository = PostgresBaseRepository<LocationEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(%username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(self.db.as_ref())
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(%email, "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let result = CategoryEntity::find()
            .filter(category::Column::Slug.eq(slug))
            .one(self.db.as_ref())
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }
}

impl LocationRepository for PostgresLocationRepository {}

impl PostgresPostRepository {
    /// Resolve authors, categories, locations and comment counts for a page of posts
    /// with one query per relation.
    async fn with_relations(
        &self,
        models: Vec<post::Model>,
    ) -> Result<Vec<PostDetails>, RepoError> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let post_ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
        let author_ids: Vec<Uuid> = models.iter().map(|m| m.author_id).collect();
        let category_ids: Vec<Uuid> = models.iter().filter_map(|m| m.category_id).collect();
        let location_ids: Vec<Uuid> = models.iter().filter_map(|m| m.location_id).collect();

        let authors: HashMap<Uuid, Author> = UserEntity::find()
            .filter(user::Column::Id.is_in(author_ids))
            .all(self.db.as_ref())
            .await
            .map_err(query_error)?
            .into_iter()
            .map(|m| (m.id, m.into()))
            .collect();

        let categories: HashMap<Uuid, Category> = if category_ids.is_empty() {
            HashMap::new()
        } else {
            CategoryEntity::find()
                .filter(category::Column::Id.is_in(category_ids))
                .all(self.db.as_ref())
                .await
                .map_err(query_error)?
                .into_iter()
                .map(|m| (m.id, m.into()))
                .collect()
        };

        let locations: HashMap<Uuid, Location> = if location_ids.is_empty() {
            HashMap::new()
        } else {
            LocationEntity::find()
                .filter(location::Column::Id.is_in(location_ids))
                .all(self.db.as_ref())
                .await
                .map_err(query_error)?
                .into_iter()
                .map(|m| (m.id, m.into()))
                .collect()
        };

        let comment_counts: HashMap<Uuid, i64> = CommentEntity::find()
            .select_only()
            .column(comment::Column::PostId)
            .column_as(Expr::col(comment::Column::Id).count(), "comment_count")
            .filter(comment::Column::PostId.is_in(post_ids))
            .group_by(comment::Column::PostId)
            .into_tuple::<(Uuid, i64)>()
            .all(self.db.as_ref())
            .await
            .map_err(query_error)?
            .into_iter()
            .collect();

        models
            .into_iter()
            .map(|model| {
                let author = authors.get(&model.author_id).cloned().ok_or_else(|| {
                    RepoError::Query(format!("author {} of post {} missing", model.author_id, model.id))
                })?;
                let category = model.category_id.and_then(|id| categories.get(&id).cloned());
                let location = model.location_id.and_then(|id| locations.get(&id).cloned());
                let comment_count = comment_counts
                    .get(&model.id)
                    .map_or(0, |count| u64::try_from(*count).unwrap_or_default());

                Ok(PostDetails {
                    post: model.into(),
                    author,
                    category,
                    location,
                    comment_count,
                })
            })
            .collect()
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_details(&self, id: Uuid) -> Result<Option<PostDetails>, RepoError> {
        let Some(model) = PostEntity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(query_error)?
        else {
            return Ok(None);
        };

        Ok(self.with_relations(vec![model]).await?.pop())
    }

    async fn list(
        &self,
        query: PostListQuery,
        page: PageRequest,
    ) -> Result<Page<PostDetails>, RepoError> {
        let mut select = PostEntity::find();

        if let Some(author_id) = query.author_id {
            select = select.filter(post::Column::AuthorId.eq(author_id));
        }
        if let Some(category_id) = query.category_id {
            select = select.filter(post::Column::CategoryId.eq(category_id));
        }
        if let Some(now) = query.visible_at {
            select = select
                .join(
                    sea_orm::JoinType::LeftJoin,
                    post::Relation::Category.def(),
                )
                .filter(post::Column::IsPublished.eq(true))
                .filter(post::Column::PubDate.lte(now))
                .filter(
                    Condition::any()
                        .add(post::Column::CategoryId.is_null())
                        .add(category::Column::IsPublished.eq(true)),
                );
        }

        let paginator = select
            .order_by_desc(post::Column::PubDate)
            .order_by_desc(post::Column::CreatedAt)
            .paginate(self.db.as_ref(), PAGE_SIZE);

        let total = paginator.num_items().await.map_err(query_error)?;
        // Pages past the end are never queried
        let models = if page.offset() < total {
            paginator
                .fetch_page(page.index())
                .await
                .map_err(query_error)?
        } else {
            Vec::new()
        };

        tracing::debug!(?query, total, page = page.number, "Fetched post page");

        let items = self.with_relations(models).await?;
        Ok(Page::new(items, page, total))
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<CommentDetails>, RepoError> {
        let rows = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .find_also_related(UserEntity)
            .order_by_asc(comment::Column::CreatedAt)
            .order_by_asc(comment::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(query_error)?;

        rows.into_iter()
            .map(|(comment, author)| {
                let author = author.ok_or_else(|| {
                    RepoError::Query(format!("author of comment {} missing", comment.id))
                })?;
                Ok(CommentDetails {
                    comment: comment.into(),
                    author: author.into(),
                })
            })
            .collect()
    }

    async fn count_for_post(&self, post_id: Uuid) -> Result<u64, RepoError> {
        CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .count(self.db.as_ref())
            .await
            .map_err(query_error)
    }
}
