//! User handler implementations

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Form,
};
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    constants::roles,
    error::{AppError, AppResult},
    handlers::page::{redirect, refuse, Page},
    middleware::{auth::MSG_OWNER_REQUIRED, RequestContext},
    models::User,
    services::UserService,
    state::AppState,
    validation::FieldErrors,
};

use super::request::{RegisterForm, RoleForm};

#[derive(Debug, Serialize)]
pub struct UserForm {
    pub user: Option<User>,
    pub roles: &'static [&'static str],
}

/// Sign-up form
pub async fn new_user(ctx: RequestContext) -> Page<UserForm> {
    Page::new(&ctx, "users/new", UserForm { user: None, roles: roles::ALL })
}

/// Create an account
///
/// Visitors register themselves and are signed in. A signed-in owner
/// creates an account for someone else.
pub async fn create_user(
    State(state): State<AppState>,
    ctx: RequestContext,
    Form(form): Form<RegisterForm>,
) -> AppResult<Response> {
    let form_errors = form.validate().err().map(FieldErrors::from).unwrap_or_default();

    let result = match ctx.current_user.clone() {
        None => {
            if !form_errors.is_empty() {
                return Ok(render_new(&ctx, form_errors));
            }
            UserService::register(state.repo(), form.into_account(false), &ctx.client).await
        }
        Some(actor) if actor.is_owner() => {
            if !form_errors.is_empty() {
                return Ok(render_new(&ctx, form_errors));
            }
            UserService::admin_create(state.repo(), form.into_account(true), &actor, &ctx.client).await
        }
        Some(_) => return Ok(refuse(&ctx, "/", MSG_OWNER_REQUIRED)),
    };

    match result {
        Ok(user) if ctx.current_user.is_none() => {
            ctx.sign_in(user.id);
            ctx.success("Account created! Welcome");
            Ok(redirect("/"))
        }
        Ok(_) => {
            ctx.success("User created successfully");
            Ok(redirect("/admin/users"))
        }
        Err(AppError::Forbidden(message)) => Ok(refuse(&ctx, "/users/new", message)),
        Err(AppError::Invalid(errors)) => Ok(render_new(&ctx, errors)),
        Err(e) => Err(e),
    }
}

fn render_new(ctx: &RequestContext, errors: FieldErrors) -> Response {
    Page::new(ctx, "users/new", UserForm { user: None, roles: roles::ALL })
        .with_errors(errors)
        .into_response()
}

/// Role edit form
pub async fn edit_user(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(user_id): Path<Uuid>,
) -> AppResult<Page<UserForm>> {
    let user = UserService::get_user_by_id(state.repo(), user_id).await?;
    Ok(Page::new(&ctx, "users/edit", UserForm { user: Some(user), roles: roles::ALL }))
}

/// Change a user's role
pub async fn update_user(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(user_id): Path<Uuid>,
    Form(form): Form<RoleForm>,
) -> AppResult<Response> {
    let actor = ctx.user()?.clone();

    match UserService::update_role(state.repo(), user_id, &form.role, &actor, &ctx.client).await {
        Ok(_) => {
            ctx.success("User updated");
            Ok(redirect("/admin"))
        }
        Err(AppError::Invalid(_)) => Ok(refuse(&ctx, "/admin", "Invalid role")),
        Err(e) => Err(e),
    }
}
