//! Owner back-office handlers

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

/// Admin routes, all behind the owner role
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin", get(handler::overview))
        // User management
        .route("/admin/users", get(handler::list_users).post(handler::create_user))
        .route("/admin/users/new", get(handler::new_user))
        .route(
            "/admin/users/{user_id}",
            get(handler::show_user).put(handler::update_user).delete(handler::delete_user),
        )
        .route("/admin/users/{user_id}/edit", get(handler::edit_user))
        // Content
        .route("/admin/hackathons", get(handler::list_hackathons))
        .route("/admin/projects", get(handler::list_projects))
        // Platform settings
        .route("/admin/emails", get(handler::emails))
        .route("/admin/config", get(handler::show_config).put(handler::update_config))
        .route("/admin/passwords", get(handler::passwords))
        .route("/admin/passwords/{user_id}", post(handler::require_password_reset))
        .route("/admin/domains", get(handler::list_domains).post(handler::create_domain))
        .route(
            "/admin/domains/{domain_id}",
            put(handler::update_domain).delete(handler::delete_domain),
        )
        .route("/admin/audit-logs", get(handler::audit_logs))
        .route_layer(middleware::from_fn(require_owner))
}
