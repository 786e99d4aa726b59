//! User registration and role management handlers

mod handler;
pub mod request;

pub use handler::*;
pub use request::*;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::{middleware::require_owner, state::AppState};

/// User routes
pub fn routes() -> Router<AppState> {
    let owner_only = Router::new()
        .route("/users/{user_id}/edit", get(handler::edit_user))
        .route("/users/{user_id}", put(handler::update_user))
        .route_layer(middleware::from_fn(require_owner));

    Router::new()
        .route("/users/new", get(handler::new_user))
        .route("/users", post(handler::create_user))
        .merge(owner_only)
}
