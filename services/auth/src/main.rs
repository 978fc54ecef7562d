use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod error;
mod extract;
mod jwt;
mod middleware;
mod models;
mod password;
mod rate_limiter;
mod repositories;
mod routes;
mod session;
mod validation;

use common::{
    cache::{RedisConfig, RedisPool},
    database::{self, DatabaseConfig},
    settings::ServerConfig,
};
use tokio::net::TcpListener;

use crate::{
    jwt::{JwtConfig, JwtService},
    models::NewUser,
    rate_limiter::{RateLimiter, RateLimiterConfig},
    repositories::UserRepository,
    session::SessionManager,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub redis_pool: RedisPool,
    pub jwt_service: JwtService,
    pub user_repository: UserRepository,
    pub session_manager: SessionManager,
    pub rate_limiter: RateLimiter,
}

/// Create the administrator account named by `ADMIN_EMAIL` / `ADMIN_PASSWORD`, once.
async fn bootstrap_superuser(user_repository: &UserRepository) -> Result<()> {
    let (Ok(email), Ok(password)) = (
        std::env::var("ADMIN_EMAIL"),
        std::env::var("ADMIN_PASSWORD"),
    ) else {
        return Ok(());
    };

    let email = models::normalize_email(&email);
    if user_repository.find_by_email(&email).await?.is_some() {
        info!("Superuser {} already exists", email);
        return Ok(());
    }

    validation::validate_email(&email).map_err(|message| anyhow::anyhow!(message))?;
    if let Err(message) = validation::validate_password(&password) {
        warn!("ADMIN_PASSWORD rejected: {}", message);
        anyhow::bail!(message);
    }

    let password_hash = password::hash_password(&password)?;
    let admin = user_repository
        .create_superuser(&NewUser::superuser(&email, &password_hash))
        .await?;
    info!("Created superuser {} ({})", admin.username, admin.id);

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting authentication service");

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = database::init_pool(&db_config).await?;

    // Check database connectivity
    if database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }
    database::run_migrations(&pool).await?;

    // Initialize JWT service
    let jwt_config = JwtConfig::from_env()?;
    let jwt_service = JwtService::new(jwt_config)?;

    // Initialize Redis connection pool
    let redis_config = RedisConfig::from_env()?;
    let redis_pool = RedisPool::new(&redis_config)?;

    let user_repository = UserRepository::new(pool);
    bootstrap_superuser(&user_repository).await?;

    let session_manager =
        SessionManager::new(redis_pool.clone(), jwt_service.refresh_token_expiry());
    let rate_limiter = RateLimiter::new(RateLimiterConfig::default());

    let app_state = AppState {
        redis_pool,
        jwt_service,
        user_repository,
        session_manager,
        rate_limiter,
    };

    info!("Authentication service initialized successfully");

    // Start the web server
    let app = routes::create_router(app_state);

    let server_config = ServerConfig::from_env("AUTH", 3000)?;
    let listener = TcpListener::bind(server_config.bind_addr()).await?;
    info!(
        "Authentication service listening on {}",
        server_config.bind_addr()
    );

    axum::serve(listener, app).await?;

    Ok(())
}
