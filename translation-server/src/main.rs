mod api;
mod auth;
mod cache;
mod config;
mod documents;
mod errors;
mod openapi;
mod state;
mod store;
#[cfg(test)]
mod test_utils;
mod translation;

use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::Router;
use log::{error, info};
use std::net::SocketAddr;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable};

#[tokio::main]
async fn main() {
    // Load a .env file when present, real environment variables win
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Failed to load .env file: {}", e);
        }
    }

    // Initialize logging
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    // Load configuration
    let config = match config::AppConfig::new() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize application state
    let state = match AppState::new(&config) {
        Ok(state) => state,
        Err(e) => {
            error!("Failed to initialize application state: {}", e);
            std::process::exit(1);
        }
    };

    let app = create_app(state);

    // Build server address
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    // Start server
    let server = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    // Start the server and wait for it to finish
    info!("Server running on {}, press Ctrl+C to stop", addr);
    let serve = axum::serve(server, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;
    if let Err(e) = serve {
        error!("Server error: {}", e);
        std::process::exit(1);
    }

    info!("Server shutdown complete");
}

/// Create a new application instance with a given state
pub fn create_app(state: AppState) -> Router {
    // Collect routes together with their OpenAPI documentation
    let (api_router, api_doc) = OpenApiRouter::with_openapi(openapi::ApiDoc::openapi())
        .merge(api::router(&state))
        .split_for_parts();
    let body_limit = state.config.documents.max_upload_size_bytes();

    Router::new()
        .merge(api_router)
        .merge(openapi::router(api_doc.clone()))
        .merge(Scalar::with_url("/scalar", api_doc))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

// Simple signal handler that works on all platforms
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down");
        }
    }
}
