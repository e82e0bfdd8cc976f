use std::sync::Arc;

use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::server_state::ServerState;

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server_state;

pub fn build_router(state: Arc<ServerState>) -> Router {
    // Listing and clearing are operator actions, saving is open to every visitor.
    let admin = Router::new()
        .route("/locations", get(routes::list_locations).delete(routes::clear_locations))
        .route_layer(from_fn_with_state(state.clone(), middleware::require_admin_token));

    Router::new()
        .route("/save-location", post(routes::save_location))
        .merge(admin)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(from_fn(middleware::log_request))
}
