//! Team membership handlers

mod handler;

pub use handler::*;

use axum::{
    routing::{delete, post},
    Router,
};

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/hackathons/{hackathon_id}/projects/{project_id}/join",
            post(handler::join_project),
        )
        .route(
            "/hackathons/{hackathon_id}/projects/{project_id}/leave",
            delete(handler::leave_project),
        )
}
