//! HTTP API handlers and routing.

pub mod error;

mod auth;
mod health;
mod mint;
mod resolve;
mod update;

use axum::{
    http::{header, Method},
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::state::AppState;

/// Create the main API router with all routes and middleware.
///
/// The wildcard resolve route is registered last; static routes (mint,
/// update, health) take precedence over it.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_origin(Any);

    Router::new()
        // Health endpoints (no auth required)
        .merge(health::routes())
        // Minting and updating (bearer key required)
        .route("/mint", post(mint::mint_ark))
        .route("/update", put(update::update_ark))
        // Resolution catches every other path
        .route("/{*ark}", get(resolve::resolve_ark))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Application state
        .with_state(state)
}
