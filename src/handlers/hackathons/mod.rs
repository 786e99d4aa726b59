//! Hackathon handlers

mod handler;
pub mod request;

pub use handler::*;
pub use request::*;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use crate::{
    middleware::{require_hackathon_owner, require_owner},
    state::AppState,
};

/// Hackathon routes
pub fn routes(state: AppState) -> Router<AppState> {
    let owner = middleware::from_fn(require_owner);
    let hackathon_owner = middleware::from_fn_with_state(state, require_hackathon_owner);

    Router::new()
        .route(
            "/hackathons",
            get(handler::list_hackathons).merge(post(handler::create_hackathon).route_layer(owner.clone())),
        )
        .route("/hackathons/new", get(handler::new_hackathon).route_layer(owner))
        .route(
            "/hackathons/{hackathon_id}",
            get(handler::show_hackathon).merge(
                put(handler::update_hackathon)
                    .merge(delete(handler::delete_hackathon))
                    .route_layer(hackathon_owner.clone()),
            ),
        )
        .route(
            "/hackathons/{hackathon_id}/edit",
            get(handler::edit_hackathon).route_layer(hackathon_owner),
        )
}
