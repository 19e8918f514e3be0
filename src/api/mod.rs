use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::fallback::SyntheticGenerator;
use crate::upstream::TrendSource;

pub mod error;
pub mod handlers;
pub mod models;

pub struct AppState {
    pub config: Config,
    pub source: Arc<dyn TrendSource>,
    pub generator: SyntheticGenerator,
}

impl AppState {
    pub fn new(config: Config, source: Arc<dyn TrendSource>) -> Self {
        AppState {
            config,
            source,
            generator: SyntheticGenerator::new(),
        }
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    // Any origin may call the API.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/trends", get(handlers::trends_handler))
        .route("/health", get(handlers::health_handler))
        .with_state(state)
        .layer(cors)
}
