//! Page documents and redirects
//!
//! Every HTML route answers with a [`Page`]: the template it would render,
//! the data handed to that template, the flash messages due on this page and
//! the signed-in user. Field errors from a failed form post come back on the
//! same page with a 422 status.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;

use crate::{
    error::AppError,
    middleware::{Flash, RequestContext},
    models::UserSummary,
    validation::FieldErrors,
};

#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub template: &'static str,
    #[serde(skip)]
    pub status: StatusCode,
    pub flash: Vec<Flash>,
    pub current_user: Option<UserSummary>,
    #[serde(skip_serializing_if = "FieldErrors::is_empty")]
    pub errors: FieldErrors,
    pub data: T,
}

impl<T: Serialize> Page<T> {
    /// Build a page, consuming the pending flash messages
    pub fn new(ctx: &RequestContext, template: &'static str, data: T) -> Self {
        Self {
            template,
            status: StatusCode::OK,
            flash: ctx.take_flash(),
            current_user: ctx.current_user.as_ref().map(UserSummary::from),
            errors: FieldErrors::new(),
            data,
        }
    }

    /// Re-render a form with its validation errors
    pub fn with_errors(mut self, errors: FieldErrors) -> Self {
        self.errors = errors;
        self.status = StatusCode::UNPROCESSABLE_ENTITY;
        self
    }
}

impl<T: Serialize> IntoResponse for Page<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// See-other redirect; pending flash messages travel with it
pub fn redirect(to: impl AsRef<str>) -> Response {
    Redirect::to(to.as_ref()).into_response()
}

/// Flash `message` as danger and redirect
pub fn refuse(ctx: &RequestContext, to: impl AsRef<str>, message: impl Into<String>) -> Response {
    ctx.danger(message);
    redirect(to)
}

/// First message of a validation or refusal error, used where a form
/// reports failures through a flash instead of re-rendering
pub fn flash_message(error: &AppError) -> Option<String> {
    match error {
        AppError::Invalid(errors) => errors.messages().next().map(str::to_string),
        AppError::Forbidden(message) | AppError::Conflict(message) => Some(message.clone()),
        _ => None,
    }
}
