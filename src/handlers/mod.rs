//! HTTP Request Handlers
//!
//! This module contains all HTTP request handlers organized by domain, and
//! assembles them with the middleware chain into the application router.

pub mod admin;
pub mod auth;
pub mod files;
pub mod hackathons;
pub mod health;
pub mod memberships;
pub mod page;
pub mod pages;
pub mod profile;
pub mod projects;
pub mod users;

use axum::{extract::DefaultBodyLimit, middleware, Router};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::{
    constants::REQUEST_BODY_OVERHEAD_BYTES,
    middleware::{authorize, force_ssl, logging_middleware, password_reset_gate, session_loader},
    state::AppState,
};

/// Every route the application serves, as shown on the owner route table
pub const ROUTE_TABLE: &[(&str, &str)] = &[
    ("GET", "/"),
    ("GET", "/about"),
    ("GET", "/schedule"),
    ("GET", "/routes"),
    ("GET", "/health"),
    ("GET", "/signin"),
    ("POST", "/signin"),
    ("DELETE", "/signout"),
    ("GET", "/reset-password"),
    ("POST", "/reset-password"),
    ("GET", "/users/new"),
    ("POST", "/users"),
    ("GET", "/users/{user_id}/edit"),
    ("PUT", "/users/{user_id}"),
    ("GET", "/hackathons"),
    ("POST", "/hackathons"),
    ("GET", "/hackathons/new"),
    ("GET", "/hackathons/{hackathon_id}"),
    ("PUT", "/hackathons/{hackathon_id}"),
    ("DELETE", "/hackathons/{hackathon_id}"),
    ("GET", "/hackathons/{hackathon_id}/edit"),
    ("GET", "/hackathons/{hackathon_id}/projects"),
    ("POST", "/hackathons/{hackathon_id}/projects"),
    ("GET", "/hackathons/{hackathon_id}/projects/new"),
    ("GET", "/hackathons/{hackathon_id}/projects/{project_id}"),
    ("PUT", "/hackathons/{hackathon_id}/projects/{project_id}"),
    ("GET", "/hackathons/{hackathon_id}/projects/{project_id}/edit"),
    ("GET", "/hackathons/{hackathon_id}/projects/{project_id}/image"),
    ("PUT", "/hackathons/{hackathon_id}/projects/{project_id}/image"),
    ("POST", "/hackathons/{hackathon_id}/projects/{project_id}/toggle-presenting"),
    ("POST", "/hackathons/{hackathon_id}/projects/{project_id}/join"),
    ("DELETE", "/hackathons/{hackathon_id}/projects/{project_id}/leave"),
    ("GET", "/files"),
    ("POST", "/files"),
    ("GET", "/files/new"),
    ("GET", "/files/{file_id}"),
    ("DELETE", "/files/{file_id}"),
    ("GET", "/files/{file_id}/download"),
    ("GET", "/profile"),
    ("PUT", "/profile"),
    ("GET", "/profile/edit"),
    ("PUT", "/profile/password"),
    ("GET", "/admin"),
    ("GET", "/admin/users"),
    ("POST", "/admin/users"),
    ("GET", "/admin/users/new"),
    ("GET", "/admin/users/{user_id}"),
    ("PUT", "/admin/users/{user_id}"),
    ("DELETE", "/admin/users/{user_id}"),
    ("GET", "/admin/users/{user_id}/edit"),
    ("GET", "/admin/hackathons"),
    ("GET", "/admin/projects"),
    ("GET", "/admin/emails"),
    ("GET", "/admin/config"),
    ("PUT", "/admin/config"),
    ("GET", "/admin/passwords"),
    ("POST", "/admin/passwords/{user_id}"),
    ("GET", "/admin/domains"),
    ("POST", "/admin/domains"),
    ("PUT", "/admin/domains/{domain_id}"),
    ("DELETE", "/admin/domains/{domain_id}"),
    ("GET", "/admin/audit-logs"),
];

/// All routes without middleware
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(pages::routes())
        .merge(auth::routes())
        .merge(users::routes())
        .merge(hackathons::routes(state))
        .merge(projects::routes())
        .merge(memberships::routes())
        .merge(files::routes())
        .merge(profile::routes())
        .merge(admin::routes())
}

/// The complete application
///
/// Layers run outermost first: tracing, HTTPS redirect, request logging,
/// session loading, the forced-reset gate and finally authorization.
pub fn app(state: AppState) -> Router {
    let body_limit = state.config().uploads.max_file_size_bytes + REQUEST_BODY_OVERHEAD_BYTES;

    routes(state.clone())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn(authorize))
        .layer(middleware::from_fn(password_reset_gate))
        .layer(middleware::from_fn_with_state(state.clone(), session_loader))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn_with_state(state.clone(), force_ssl))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
