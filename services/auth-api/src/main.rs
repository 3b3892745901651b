//! Warden Auth API
//!
//! Authentication microservice. Every route requires a provisioned API key in
//! the `X-API-Key` header.
//!
//! ## REST Endpoints
//!
//! - `GET /api/v1/health` - Database-backed health check
//! - `POST /api/v1/register` - Create a user
//! - `POST /api/v1/login` - Exchange credentials for an access token
//! - `GET /api/v1/me` - Identity of the presented bearer token

mod config;
mod csp;
mod error;
mod extractors;
mod handlers;
mod state;

use std::net::SocketAddr;

use axum::http::header;
use axum::routing::{get, post};
use axum::Router;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::csp::ContentSecurityPolicy;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("auth_api=debug".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Warden Auth API");

    // Load configuration; a weak JWT secret stops startup here
    let config = Config::from_env()?;
    tracing::info!(
        http_port = config.http_port,
        host = %config.auth.host,
        token_ttl_secs = config.auth.token_ttl.as_secs(),
        "Configuration loaded"
    );

    // Create database pool
    let pool = warden_db::create_pool(&config.database_url).await?;
    tracing::info!("Database pool created");

    let http_addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));

    let state = AppState::new(pool, config)?;
    let app = build_router(state)?;

    tracing::info!("HTTP server listening on {}", http_addr);
    let listener = tokio::net::TcpListener::bind(http_addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn build_router(state: AppState) -> anyhow::Result<Router> {
    let request_timeout = state.request_timeout();
    let csp = ContentSecurityPolicy::strict().header_value()?;

    // API v1 routes, all behind the API-key gate
    let api_v1 = Router::new()
        .route("/health", get(handlers::health))
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/me", get(handlers::me))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            extractors::require_api_key,
        ));

    // Build middleware stack (order matters - outermost first)
    let middleware = ServiceBuilder::new()
        // Request ID propagation (outermost)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        // Tracing with request details
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Every response, rejections included, carries the policy
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            csp,
        ))
        // Request timeout (innermost - closest to handler)
        .layer(TimeoutLayer::new(request_timeout));

    Ok(Router::new()
        .nest("/api/v1", api_v1)
        .layer(middleware)
        .with_state(state))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
