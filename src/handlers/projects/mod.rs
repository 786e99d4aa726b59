//! Project handlers, nested under their hackathon

mod handler;
pub mod request;

pub use handler::*;
pub use request::*;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// Project routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/hackathons/{hackathon_id}/projects",
            get(handler::list_projects).post(handler::create_project),
        )
        .route("/hackathons/{hackathon_id}/projects/new", get(handler::new_project))
        .route(
            "/hackathons/{hackathon_id}/projects/{project_id}",
            get(handler::show_project).put(handler::update_project),
        )
        .route(
            "/hackathons/{hackathon_id}/projects/{project_id}/edit",
            get(handler::edit_project),
        )
        .route(
            "/hackathons/{hackathon_id}/projects/{project_id}/image",
            get(handler::project_image).put(handler::update_project_image),
        )
        .route(
            "/hackathons/{hackathon_id}/projects/{project_id}/toggle-presenting",
            post(handler::toggle_presenting),
        )
}
