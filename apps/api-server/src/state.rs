//! Application state shared across handlers and resolvers.

use std::sync::Arc;

use feed_core::ports::{ImageStore, PasswordService, PostRepository, TokenService, UserRepository};
use feed_core::{PostService, UserService};
use feed_infra::{
    Argon2PasswordService, DatabaseConfig, DatabaseConnections, InMemoryPostRepository,
    InMemoryUserRepository, JwtTokenService, LocalImageStore,
};

use crate::config::{AppConfig, IMAGE_ROUTE};
use crate::graphql::{FeedSchema, build_schema};

/// Repository pair backing the services.
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
}

impl Repositories {
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            posts: Arc::new(InMemoryPostRepository::new()),
        }
    }
}

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserService>,
    pub posts: Arc<PostService>,
    pub tokens: Arc<dyn TokenService>,
    pub images: Arc<dyn ImageStore>,
    pub schema: FeedSchema,
    /// Database connections (None when running in-memory).
    pub db: Option<Arc<DatabaseConnections>>,
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Create application state from configuration.
    ///
    /// Falls back to in-memory repositories when no database is configured
    /// or the connection fails.
    pub async fn new(config: &AppConfig) -> Self {
        let (db, repos) = connect(config.database.as_ref()).await;

        let images = LocalImageStore::new(&config.images.dir, IMAGE_ROUTE);
        if let Err(e) = images.ensure_dir().await {
            tracing::error!(
                dir = %images.dir().display(),
                "Failed to create image directory: {}",
                e
            );
        }

        Self::build(
            repos,
            Arc::new(images),
            Arc::new(JwtTokenService::new(config.jwt.clone())),
            Arc::new(Argon2PasswordService::new()),
            db,
            config.images.max_upload_bytes,
        )
    }

    /// Wire services and the GraphQL schema from explicit parts.
    pub fn build(
        repos: Repositories,
        images: Arc<dyn ImageStore>,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
        db: Option<Arc<DatabaseConnections>>,
        max_upload_bytes: usize,
    ) -> Self {
        let users = Arc::new(UserService::new(
            repos.users.clone(),
            passwords,
            tokens.clone(),
        ));
        let posts = Arc::new(PostService::new(repos.posts, repos.users, images.clone()));
        let schema = build_schema(users.clone(), posts.clone());

        Self {
            users,
            posts,
            tokens,
            images,
            schema,
            db,
            max_upload_bytes,
        }
    }

    /// Storage backend label for the health endpoint.
    pub fn storage_kind(&self) -> &'static str {
        if self.db.is_some() {
            "postgres"
        } else {
            "in-memory"
        }
    }

    /// Release external resources after the server stops.
    pub async fn shutdown(&self) {
        if let Some(db) = &self.db {
            close(db).await;
        }
    }
}

#[cfg(feature = "postgres")]
async fn close(db: &DatabaseConnections) {
    match db.close().await {
        Ok(()) => tracing::info!("Database connections closed"),
        Err(e) => tracing::error!("Failed to close database connections: {}", e),
    }
}

#[cfg(not(feature = "postgres"))]
async fn close(_db: &DatabaseConnections) {}

#[cfg(feature = "postgres")]
async fn connect(
    config: Option<&DatabaseConfig>,
) -> (Option<Arc<DatabaseConnections>>, Repositories) {
    use feed_infra::{PostgresPostRepository, PostgresUserRepository};

    let Some(config) = config else {
        tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        return (None, Repositories::in_memory());
    };

    match DatabaseConnections::init(config).await {
        Ok(connections) => {
            tracing::info!("Database connection established");
            let connections = Arc::new(connections);
            let repos = Repositories {
                users: Arc::new(PostgresUserRepository::new(connections.clone())),
                posts: Arc::new(PostgresPostRepository::new(connections.clone())),
            };
            (Some(connections), repos)
        }
        Err(e) => {
            tracing::error!("Failed to connect to database: {}. Using in-memory fallback.", e);
            (None, Repositories::in_memory())
        }
    }
}

#[cfg(not(feature = "postgres"))]
async fn connect(
    _config: Option<&DatabaseConfig>,
) -> (Option<Arc<DatabaseConnections>>, Repositories) {
    tracing::info!("Built without postgres support - using in-memory repositories");
    (None, Repositories::in_memory())
}
