//! Public pages: home, about, schedule and the route table

mod handler;

pub use handler::*;

use axum::{middleware, routing::get, Router};

use crate::{middleware::require_owner, state::AppState};

/// Page routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::home))
        .route("/about", get(handler::about))
        .route("/schedule", get(handler::schedule))
        .route(
            "/routes",
            get(handler::route_table).route_layer(middleware::from_fn(require_owner)),
        )
}
