//! Application state - shared across all handlers.

use std::sync::Arc;

use blog_core::ports::{
    CategoryRepository, CommentRepository, LocationRepository, PostRepository, UserRepository,
};
use blog_core::services::{CommentService, PostQueryService, PostService, ProfileService};
use blog_infra::{DatabaseConfig, InMemoryEntityStore};

#[cfg(feature = "postgres")]
use blog_infra::DatabaseConnections;
#[cfg(feature = "postgres")]
use blog_infra::database::{
    PostgresCategoryRepository, PostgresCommentRepository, PostgresLocationRepository,
    PostgresPostRepository, PostgresUserRepository,
};

/// Shared application state: the core services wired to one Entity Store.
#[derive(Clone)]
pub struct AppState {
    pub queries: PostQueryService,
    pub posts: PostService,
    pub comments: CommentService,
    pub profiles: ProfileService,
}

/// One handle per port, all backed by the same Entity Store.
struct Repositories {
    users: Arc<dyn UserRepository>,
    categories: Arc<dyn CategoryRepository>,
    locations: Arc<dyn LocationRepository>,
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
}

impl Repositories {
    fn in_memory(store: Arc<InMemoryEntityStore>) -> Self {
        Self {
            users: store.clone(),
            categories: store.clone(),
            locations: store.clone(),
            posts: store.clone(),
            comments: store,
        }
    }

    #[cfg(feature = "postgres")]
    fn postgres(connections: DatabaseConnections) -> Self {
        let db = Arc::new(connections.main);
        Self {
            users: Arc::new(PostgresUserRepository::new(db.clone())),
            categories: Arc::new(PostgresCategoryRepository::new(db.clone())),
            locations: Arc::new(PostgresLocationRepository::new(db.clone())),
            posts: Arc::new(PostgresPostRepository::new(db.clone())),
            comments: Arc::new(PostgresCommentRepository::new(db)),
        }
    }
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(db_config: Option<&DatabaseConfig>) -> Self {
        #[cfg(feature = "postgres")]
        let repositories = match db_config {
            Some(config) => match DatabaseConnections::init(config).await {
                Ok(connections) => Repositories::postgres(connections),
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                    Repositories::in_memory(Arc::default())
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                Repositories::in_memory(Arc::default())
            }
        };

        #[cfg(not(feature = "postgres"))]
        let repositories = {
            let _ = db_config;
            tracing::info!("Running without postgres feature - using in-memory store");
            Repositories::in_memory(Arc::default())
        };

        tracing::info!("Application state initialized");
        Self::from_repositories(repositories)
    }

    /// State backed by the given in-memory store.
    #[cfg(test)]
    pub fn in_memory(store: Arc<InMemoryEntityStore>) -> Self {
        Self::from_repositories(Repositories::in_memory(store))
    }

    fn from_repositories(repos: Repositories) -> Self {
        Self {
            queries: PostQueryService::new(
                repos.posts.clone(),
                repos.categories.clone(),
                repos.users.clone(),
            ),
            posts: PostService::new(
                repos.posts.clone(),
                repos.categories,
                repos.locations,
            ),
            comments: CommentService::new(repos.comments, repos.posts),
            profiles: ProfileService::new(repos.users),
        }
    }
}
