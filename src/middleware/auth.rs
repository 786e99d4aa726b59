//! Access control middleware
//!
//! `password_reset_gate` and `authorize` run for every request after the
//! session loader. `require_owner` and `require_hackathon_owner` are route
//! layers guarding individual routes.

use std::collections::HashMap;

use axum::{
    body::Body,
    extract::{Path, Request, State},
    http::Method,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::debug;

use crate::{error::AppError, middleware::session::RequestContext, state::AppState};

pub const MSG_SIGN_IN_REQUIRED: &str = "You must be signed in to access that page";
pub const MSG_OWNER_REQUIRED: &str = "You must be an owner to access that page";
pub const MSG_HACKATHON_OWNER_REQUIRED: &str = "You must be the owner of this hackathon to access that page";
pub const MSG_RESET_REQUIRED: &str = "You must reset your password before continuing";

/// Whether `path` may be served without a signed-in user
pub fn is_public(method: &Method, path: &str) -> bool {
    match path {
        "/" | "/about" | "/users/new" | "/signin" | "/reset-password" | "/health" => true,
        "/users" => method == Method::POST,
        _ => path.starts_with("/assets/"),
    }
}

fn context(request: &Request<Body>) -> Option<RequestContext> {
    request.extensions().get::<RequestContext>().cloned()
}

/// Send users flagged for a forced reset to the reset page
pub async fn password_reset_gate(request: Request<Body>, next: Next) -> Response {
    let path = request.uri().path();
    let exempt = path == "/reset-password" || path == "/signout" || path.starts_with("/assets/");

    if let Some(ctx) = context(&request) {
        if !exempt && ctx.current_user.as_ref().is_some_and(|u| u.force_password_reset) {
            debug!(path = %request.uri().path(), "Redirecting user with forced password reset");
            ctx.warning(MSG_RESET_REQUIRED);
            return Redirect::to("/reset-password").into_response();
        }
    }

    next.run(request).await
}

/// Require a signed-in user outside the public whitelist
pub async fn authorize(request: Request<Body>, next: Next) -> Response {
    if is_public(request.method(), request.uri().path()) {
        return next.run(request).await;
    }

    match context(&request) {
        Some(ctx) if ctx.current_user.is_some() => next.run(request).await,
        Some(ctx) => {
            debug!(path = %request.uri().path(), "Auth failed: no signed-in user");
            ctx.danger(MSG_SIGN_IN_REQUIRED);
            Redirect::to("/signin").into_response()
        }
        None => Redirect::to("/signin").into_response(),
    }
}

/// Require the owner role
pub async fn require_owner(request: Request<Body>, next: Next) -> Response {
    match context(&request) {
        Some(ctx) if ctx.is_owner() => next.run(request).await,
        Some(ctx) => {
            debug!(path = %request.uri().path(), "Owner role required");
            ctx.danger(MSG_OWNER_REQUIRED);
            Redirect::to("/").into_response()
        }
        None => Redirect::to("/").into_response(),
    }
}

/// Require the signed-in user to own the hackathon named by `{hackathon_id}`
pub async fn require_hackathon_owner(
    State(state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let Some(hackathon_id) = params.get("hackathon_id") else {
        return AppError::not_found("Hackathon").into_response();
    };

    let hackathon = match state.repo().find_hackathon(hackathon_id).await {
        Ok(Some(hackathon)) => hackathon,
        Ok(None) => return AppError::not_found("Hackathon").into_response(),
        Err(e) => return e.into_response(),
    };

    match context(&request) {
        Some(ctx) if ctx.current_user.as_ref().is_some_and(|u| hackathon.is_owned_by(u.id)) => {
            next.run(request).await
        }
        Some(ctx) => {
            ctx.danger(MSG_HACKATHON_OWNER_REQUIRED);
            Redirect::to("/").into_response()
        }
        None => Redirect::to("/").into_response(),
    }
}
