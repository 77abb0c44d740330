//! Route definitions for the KisanSahayak advisory backend

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Advisory (initial load, refresh)
        .nest("/advisory", advisory_routes())
        // Weekly plan (manual download, saved copy)
        .nest("/weekly-plan", weekly_plan_routes())
        // Connectivity edges reported by the client shell
        .route(
            "/connectivity",
            get(handlers::get_connectivity).put(handlers::set_connectivity),
        )
}

/// Advisory routes
fn advisory_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::get_advisory))
        .route("/refresh", post(handlers::refresh_advisory))
        .route("/cached", get(handlers::get_cached_advisory))
}

/// Weekly plan routes
fn weekly_plan_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::get_weekly_plan))
        .route("/cached", get(handlers::get_cached_weekly_plan))
}
