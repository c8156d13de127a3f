use std::time::Duration;

use server::analysis::UserLocks;
use server::clients::lichess::LichessClient;
use server::config;
use server::db;
use server::db::store::PgStore;
use server::routes;

use anyhow::Context;
use axum::{routing::get, Extension, Router};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = config::Config::from_env();

    // Connect to Postgres
    tracing::info!("Connecting to database...");
    let pool = db::pool::create_pool(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    // Run schema migrations
    tracing::info!("Running migrations...");
    db::pool::run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;

    let lichess = LichessClient::new(
        &config.lichess_base_url,
        Duration::from_secs(config.lichess_timeout_secs),
    )
    .context("Failed to build Lichess client")?;
    tracing::info!("Using Lichess at {}", config.lichess_base_url);

    // CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/api/results/{username}", get(routes::results::get_results))
        .route("/api/users/{username}/stats", get(routes::results::get_stored_stats))
        .route("/api/leaderboards", get(routes::leaderboards::get_leaderboards))
        // Shared state
        .layer(Extension(PgStore::new(pool)))
        .layer(Extension(lichess))
        .layer(Extension(UserLocks::default()))
        .layer(CompressionLayer::new())
        .layer(cors);

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
