//! KisanSahayak advisory backend
//!
//! Serves crop advisories and weekly plans generated by an external AI
//! service, caching the latest of each so farmers keep useful guidance when
//! the connection drops.

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod external;
pub mod handlers;
pub mod routes;
pub mod services;

pub use config::Config;
pub use error::{AdvisoryError, AppError, AppResult, WorkflowResult};
pub use external::{AdvisoryClient, GeminiClient};
pub use services::{
    AdvisoryService, CacheStore, ConnectivityMonitor, FileCacheStore, MemoryCacheStore,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub advisory: Arc<AdvisoryService>,
    pub config: Arc<Config>,
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "KisanSahayak Advisory API v1.0"
}
