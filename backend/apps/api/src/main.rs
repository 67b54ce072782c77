//! API Server Entry Point
//!
//! Wires the Postgres store, thumbnail storage and token verifier into the
//! learning router. Startup failures use `anyhow`; request errors render
//! through `learning::LearningError`.

use anyhow::Context;
use axum::{
    Router, http,
    http::{Method, header},
};
use base64::Engine;
use base64::engine::general_purpose;
use learning::{LearningConfig, PgLearningRepository, learning_router};
use platform::blob::FsBlobStore;
use platform::token::{TokenConfig, TokenVerifier};
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Minimum accepted length of the decoded token secret
const MIN_TOKEN_SECRET_LEN: usize = 32;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,learning=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url =
        env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;
    let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(5);

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(&database_url)
        .await?;

    tracing::info!(max_connections, "Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Bearer token configuration
    let token_config = if cfg!(debug_assertions) {
        match env::var("TOKEN_SECRET") {
            Ok(secret_b64) => decode_token_secret(&secret_b64)?,
            Err(_) => {
                tracing::warn!("TOKEN_SECRET not set, using a random development secret");
                TokenConfig::with_random_secret()
            }
        }
    } else {
        // In production, load secret from environment
        let secret_b64 =
            env::var("TOKEN_SECRET").context("TOKEN_SECRET must be set in production")?;
        decode_token_secret(&secret_b64)?
    };

    // Learning configuration
    let learning_config = if cfg!(debug_assertions) {
        LearningConfig::development()
    } else {
        LearningConfig::default()
    };

    // Thumbnail storage
    let blob_root = env::var("BLOB_ROOT").unwrap_or_else(|_| "./data/blobs".to_string());
    let blob_public_url = env::var("BLOB_PUBLIC_URL").unwrap_or_else(|_| "/files".to_string());
    tokio::fs::create_dir_all(&blob_root)
        .await
        .with_context(|| format!("cannot create blob root {blob_root}"))?;
    let blobs = FsBlobStore::new(&blob_root, blob_public_url);

    let learning_store = PgLearningRepository::new(pool.clone());

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:40922,http://127.0.0.1:40922".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router
    let app = Router::new()
        .nest(
            "/api",
            learning_router(
                learning_store,
                blobs,
                TokenVerifier::new(&token_config),
                learning_config,
            ),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr: SocketAddr = env::var("LISTEN_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:31113".to_string())
        .parse()
        .context("LISTEN_ADDR must be a socket address")?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

fn decode_token_secret(secret_b64: &str) -> anyhow::Result<TokenConfig> {
    let secret = Engine::decode(&general_purpose::STANDARD, secret_b64.trim())
        .context("TOKEN_SECRET must be base64")?;
    anyhow::ensure!(
        secret.len() >= MIN_TOKEN_SECRET_LEN,
        "TOKEN_SECRET must decode to at least {MIN_TOKEN_SECRET_LEN} bytes"
    );
    Ok(TokenConfig::new(secret))
}
