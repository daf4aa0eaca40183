//! Application state - shared across all handlers.

use std::sync::Arc;

use inkpost_core::ports::{PasswordService, PostRepository, TokenService, UserRepository};
use inkpost_core::services::PostService;
use inkpost_infra::{
    Argon2PasswordService, InMemoryPostRepository, InMemoryUserRepository, JwtConfig,
    JwtTokenService,
};

use crate::config::AppConfig;

type Repositories = (Arc<dyn UserRepository>, Arc<dyn PostRepository>);

/// Shared application state, built once from `AppConfig`.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<PostService>,
    pub users: Arc<dyn UserRepository>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    ///
    /// Falls back to in-memory repositories when no database is configured
    /// or the connection fails.
    pub async fn new(config: &AppConfig) -> Self {
        let (users, posts) = Self::repositories(config).await;
        tracing::info!("Application state initialized");
        Self::with_repositories(users, posts, &config.jwt)
    }

    /// State backed entirely by in-memory repositories.
    pub fn in_memory(jwt: &JwtConfig) -> Self {
        let (users, posts) = in_memory_repositories();
        Self::with_repositories(users, posts, jwt)
    }

    pub fn with_repositories(
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        jwt: &JwtConfig,
    ) -> Self {
        Self {
            posts: Arc::new(PostService::new(posts, users.clone())),
            users,
            tokens: Arc::new(JwtTokenService::new(jwt.clone())),
            passwords: Arc::new(Argon2PasswordService::new()),
        }
    }

    #[cfg(feature = "postgres")]
    async fn repositories(config: &AppConfig) -> Repositories {
        use inkpost_infra::database::connect;
        use inkpost_infra::{PostgresPostRepository, PostgresUserRepository};

        let Some(db_config) = config.database.as_ref() else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return in_memory_repositories();
        };

        match connect(db_config).await {
            Ok(conn) => {
                let users: Arc<dyn UserRepository> =
                    Arc::new(PostgresUserRepository::new(conn.clone()));
                let posts: Arc<dyn PostRepository> = Arc::new(PostgresPostRepository::new(conn));
                (users, posts)
            }
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                in_memory_repositories()
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn repositories(_config: &AppConfig) -> Repositories {
        tracing::info!("Running without postgres feature - using in-memory repositories");
        in_memory_repositories()
    }
}

fn in_memory_repositories() -> Repositories {
    let users: Arc<dyn UserRepository> = Arc::new(InMemoryUserRepository::new());
    let posts: Arc<dyn PostRepository> = Arc::new(InMemoryPostRepository::new());
    (users, posts)
}
