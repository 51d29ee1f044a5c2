//! Agency Backend - library for app logic and testing

pub mod config;
pub mod content;
pub mod db;
pub mod logging;
pub mod mail;
pub mod markup;
pub mod repo;
pub mod routes;
pub mod slug;
pub mod state;

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use thiserror::Error;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer,
};

use crate::config::{AppConfig, ConfigError};
use crate::content::{BlogPost, PortfolioItem, Service, TeamMember, Testimonial};
use crate::db::DbConfig;
use crate::mail::MailError;
use crate::repo::{ContentStore, RepoError};
use crate::routes::content::{list_public, show_public};
use crate::state::AppState;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("content store unavailable: {0}")]
    Store(#[from] RepoError),
    #[error("email relay setup failed: {0}")]
    Mail(#[from] MailError),
    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

/// CORS from `ALLOWED_ORIGINS` / `FRONTEND_ORIGIN`, falling back to the
/// local frontend dev server.
pub fn configure_cors(config: &AppConfig) -> CorsLayer {
    let mut allowed_origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if allowed_origins.is_empty() {
        allowed_origins = vec![
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://127.0.0.1:3000"),
        ];
    }

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

/// Create and configure the application router.
pub fn create_app(state: AppState) -> Router {
    let cors = configure_cors(&state.config);
    tracing::info!(backend = state.content.backend(), "CORS configured");

    Router::new()
        .route("/api/team", get(list_public::<TeamMember>))
        .route("/api/testimonials", get(list_public::<Testimonial>))
        .route("/api/services", get(list_public::<Service>))
        .route("/api/services/{slug}", get(show_public::<Service>))
        .route("/api/portfolio", get(list_public::<PortfolioItem>))
        .route("/api/portfolio/{slug}", get(show_public::<PortfolioItem>))
        .route("/api/blog", get(list_public::<BlogPost>))
        .route("/api/blog/{slug}", get(show_public::<BlogPost>))
        .route("/api/contact", post(routes::contact::submit_contact))
        .route("/api/logs", post(routes::logs::receive_client_logs))
        .nest("/api/admin", routes::admin::router(state.clone()))
        .route("/sitemap.xml", get(routes::sitemap::sitemap))
        .route("/rss.xml", get(routes::rss::rss_feed))
        .route("/health", get(routes::health::health_ping))
        .route("/health/detailed", get(routes::health::health_detailed))
        .route("/health/store", get(routes::health::health_store))
        .route("/health/ready", get(routes::health::health_ready))
        .with_state(state)
        .layer(logging::middleware::propagate_request_id_layer())
        .layer(middleware::from_fn(logging::middleware::log_request))
        .layer(logging::middleware::request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        // Global 2 MB request body cap
        .layer(RequestBodyLimitLayer::new(2 * 1024 * 1024))
        .layer(cors)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

async fn serve() -> Result<(), StartupError> {
    let config = AppConfig::from_env()?;
    tracing::info!(
        environment = %config.environment,
        backend = ?config.backend,
        "Configuration loaded"
    );

    if config.admin_password_hash.is_none() {
        tracing::warn!(
            "Neither ADMIN_HASH_PASSWORD nor ADMIN_PASSWORD is set. Admin routes will answer 503."
        );
    }

    let content = ContentStore::connect(config.backend, DbConfig::default()).await?;
    let mailer = mail::from_config(&config.mail)?;
    let addr = config.bind_addr()?;

    let app = create_app(AppState::new(content, mailer, config));

    tracing::info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

/// Run the server (used by main).
pub async fn run() -> Result<(), StartupError> {
    dotenvy::dotenv().ok();

    // Held until return so buffered log lines are flushed.
    let _log_guards = logging::init();

    routes::health::init_start_time();

    let result = serve().await;
    if let Err(e) = &result {
        tracing::error!("Server stopped: {}", e);
    }
    result
}
