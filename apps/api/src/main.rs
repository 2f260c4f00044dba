mod ai;
mod auth;
mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod response;
mod routes;
mod state;
mod store;
#[cfg(test)]
mod test_support;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use axum::http::{
    header::{AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::ai::AiService;
use crate::auth::{jwt::parse_expiry, TokenKeys};
use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::{LlmClient, OpenAiClient};
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::PgStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log,
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Talent API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let store = Arc::new(PgStore::new(create_pool(&config.database_url).await?));

    // Initialize the model provider
    let provider = OpenAiClient::new(config.openai_api_key.clone(), &config.openai_base_url)
        .context("Failed to initialize the OpenAI client")?;
    info!(
        "LLM client initialized (model: {}, endpoint: {})",
        llm_client::openai::MODEL,
        config.openai_base_url
    );
    let llm = LlmClient::new(Arc::new(provider));

    let tokens = TokenKeys::new(
        config.jwt_secret.as_bytes(),
        parse_expiry(&config.jwt_expire)?,
    );

    // Build app state
    let state = AppState {
        users: store.clone(),
        ai: AiService::new(llm, store),
        tokens,
        started_at: Instant::now(),
    };

    let cors = CorsLayer::new()
        .allow_origin(
            config
                .cors_origin
                .parse::<HeaderValue>()
                .context("CORS_ORIGIN must be a valid origin")?,
        )
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = TcpListener::bind(addr).await?;
    serve(listener, app, shutdown_signal()).await?;
    info!("Server stopped");

    Ok(())
}

/// Serves until `shutdown` resolves, then lets in-flight requests finish.
async fn serve(
    listener: TcpListener,
    app: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}

/// Resolves on SIGINT (Ctrl+C) or, on unix, SIGTERM.
async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for SIGINT: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = interrupt => info!("SIGINT received, closing HTTP server"),
        _ = terminate => info!("SIGTERM received, closing HTTP server"),
    }
}
