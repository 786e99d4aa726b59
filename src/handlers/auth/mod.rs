//! Authentication handlers

mod handler;
pub mod request;

pub use handler::*;
pub use request::*;

use axum::{
    routing::{delete, get},
    Router,
};

use crate::state::AppState;

/// Authentication routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/signin", get(handler::sign_in_page).post(handler::sign_in))
        .route("/signout", delete(handler::sign_out))
        .route(
            "/reset-password",
            get(handler::reset_password_page).post(handler::reset_password),
        )
}
