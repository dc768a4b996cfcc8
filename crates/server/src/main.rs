use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use neon_sign_lib::{SignGenerator, SignSettings};
use tower_http::cors::CorsLayer;

mod routes;

#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<SignGenerator>,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(routes::health))
        .route("/api/sign", post(routes::sign_glb))
        .route("/api/sign/inspect", post(routes::inspect))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "neon_sign_server=info,neon_sign_lib=info".into()),
        )
        .init();

    let generator = match SignGenerator::new(SignSettings::load()) {
        Ok(generator) => generator,
        Err(e) => {
            tracing::error!("Failed to load glyph source: {e}");
            return;
        }
    };
    let state = AppState {
        generator: Arc::new(generator),
    };

    let addr = std::env::var("NEON_SIGN_ADDR").unwrap_or_else(|_| "0.0.0.0:3001".into());
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {addr}: {e}");
            return;
        }
    };
    tracing::info!("Server running on http://{addr}");
    if let Err(e) = axum::serve(listener, app(state)).await {
        tracing::error!("Server error: {e}");
    }
}
