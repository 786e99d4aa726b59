//! Profile handlers for the signed-in user

mod handler;
pub mod request;

pub use handler::*;
pub use request::*;

use axum::{
    routing::{get, put},
    Router,
};

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(handler::show_profile).put(handler::update_profile))
        .route("/profile/edit", get(handler::edit_profile))
        .route("/profile/password", put(handler::update_password))
}
