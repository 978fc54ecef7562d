use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod access;
mod error;
mod extract;
mod middleware;
mod models;
mod repositories;
mod routes;
mod state;
mod validation;

use common::{
    cache::{RedisConfig, RedisPool},
    database::{self, DatabaseConfig},
    settings::ServerConfig,
};
use tokio::net::TcpListener;

use crate::{middleware::JwtConfig, state::AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting API service");

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

    // Initialize Redis connection pool
    let redis_config = RedisConfig::from_env()?;
    let redis_pool = RedisPool::new(&redis_config)?;

    // Access tokens are issued by the auth service; only the public key is needed here
    let token_verifier = JwtConfig::from_env()?.verifier()?;

    let app_state = AppState::new(pool, redis_pool, token_verifier);

    info!("API service initialized successfully");

    // Start the web server
    let app = routes::create_router(app_state);

    let server_config = ServerConfig::from_env("API", 3001)?;
    let listener = TcpListener::bind(server_config.bind_addr()).await?;
    info!("API service listening on {}", server_config.bind_addr());

    axum::serve(listener, app).await?;

    Ok(())
}
