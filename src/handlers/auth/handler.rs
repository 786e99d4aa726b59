//! Authentication handler implementations

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Form,
};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    handlers::page::{redirect, refuse, Page},
    middleware::{auth::MSG_SIGN_IN_REQUIRED, RequestContext},
    services::AuthService,
    state::AppState,
};

use super::request::{ResetPasswordForm, SignInForm};

pub const MSG_INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Sign-in form
pub async fn sign_in_page(ctx: RequestContext) -> Page<()> {
    Page::new(&ctx, "auth/new", ())
}

/// Sign in with email and password
pub async fn sign_in(
    State(state): State<AppState>,
    ctx: RequestContext,
    Form(form): Form<SignInForm>,
) -> AppResult<Response> {
    if form.validate().is_err() {
        return Ok(refuse(&ctx, "/signin", MSG_INVALID_CREDENTIALS));
    }

    match AuthService::sign_in(state.repo(), &form.email, &form.password, &ctx.client).await {
        Ok(user) => {
            ctx.sign_in(user.id);
            ctx.success("Welcome back!");
            Ok(redirect("/"))
        }
        Err(AppError::InvalidCredentials) => Ok(refuse(&ctx, "/signin", MSG_INVALID_CREDENTIALS)),
        Err(e) => Err(e),
    }
}

/// Sign out and clear the session
pub async fn sign_out(State(state): State<AppState>, ctx: RequestContext) -> Response {
    if let Some(user) = &ctx.current_user {
        AuthService::sign_out(state.repo(), user, &ctx.client).await;
    }
    ctx.sign_out();
    ctx.success("Signed out");
    redirect("/")
}

/// Forced password reset form
pub async fn reset_password_page(ctx: RequestContext) -> Response {
    if ctx.current_user.is_none() {
        return refuse(&ctx, "/signin", MSG_SIGN_IN_REQUIRED);
    }
    Page::new(&ctx, "auth/reset_password", ()).into_response()
}

/// Store the new password and clear the reset flag
pub async fn reset_password(
    State(state): State<AppState>,
    ctx: RequestContext,
    Form(form): Form<ResetPasswordForm>,
) -> AppResult<Response> {
    let Some(user) = ctx.current_user.clone() else {
        return Ok(refuse(&ctx, "/signin", MSG_SIGN_IN_REQUIRED));
    };

    match AuthService::reset_forced_password(
        state.repo(),
        &user,
        &form.password,
        &form.password_confirmation,
        &ctx.client,
    )
    .await
    {
        Ok(_) => {
            ctx.success("Password updated successfully!");
            Ok(redirect("/"))
        }
        Err(AppError::Invalid(errors)) => {
            Ok(Page::new(&ctx, "auth/reset_password", ()).with_errors(errors).into_response())
        }
        Err(e) => Err(e),
    }
}
