//! Profile handler implementations

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Form,
};
use serde::Serialize;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    handlers::page::{flash_message, redirect, refuse, Page},
    middleware::RequestContext,
    models::UserSummary,
    services::{profile_service::ProfileOverview, ProfileService},
    state::AppState,
    validation::FieldErrors,
};

use super::request::{PasswordForm, ProfileForm};

#[derive(Debug, Serialize)]
pub struct ProfilePage {
    pub user: UserSummary,
    #[serde(flatten)]
    pub overview: ProfileOverview,
}

pub async fn show_profile(State(state): State<AppState>, ctx: RequestContext) -> AppResult<Page<ProfilePage>> {
    let user = ctx.user()?.clone();
    let overview = ProfileService::overview(state.repo(), &user).await?;
    Ok(Page::new(
        &ctx,
        "profile/show",
        ProfilePage {
            user: UserSummary::from(&user),
            overview,
        },
    ))
}

pub async fn edit_profile(ctx: RequestContext) -> AppResult<Page<ProfileForm>> {
    let form = ProfileForm::from_user(ctx.user()?);
    Ok(Page::new(&ctx, "profile/edit", form))
}

pub async fn update_profile(
    State(state): State<AppState>,
    ctx: RequestContext,
    Form(form): Form<ProfileForm>,
) -> AppResult<Response> {
    let user = ctx.user()?.clone();
    if let Err(errors) = form.validate() {
        return Ok(Page::new(&ctx, "profile/edit", form).with_errors(FieldErrors::from(errors)).into_response());
    }

    match ProfileService::update(state.repo(), &user, form.to_changes(), &ctx.client).await {
        Ok(_) => {
            ctx.success("Profile updated!");
            Ok(redirect("/profile"))
        }
        Err(AppError::Invalid(errors)) => {
            Ok(Page::new(&ctx, "profile/edit", form).with_errors(errors).into_response())
        }
        Err(e) => Err(e),
    }
}

/// Change the password; failures are reported as a flash on the profile page
pub async fn update_password(
    State(state): State<AppState>,
    ctx: RequestContext,
    Form(form): Form<PasswordForm>,
) -> AppResult<Response> {
    let user = ctx.user()?.clone();

    match ProfileService::change_password(state.repo(), &user, form.into(), &ctx.client).await {
        Ok(_) => {
            ctx.success("Password updated successfully!");
            Ok(redirect("/profile"))
        }
        Err(e @ AppError::Invalid(_)) => Ok(refuse(&ctx, "/profile", flash_message(&e).unwrap_or_default())),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use tower::ServiceExt;

    use crate::db::MockRepository;
    use crate::test_utils::{fixtures, test_app};

    #[tokio::test]
    async fn test_wrong_current_password_is_flashed() {
        let user = fixtures::user_with_password("ada@example.com", "Secret1!");
        let cookie = test_app::session_cookie(&user);

        let mut repo = MockRepository::new();
        repo.expect_find_user().return_once(move |_| Ok(Some(user)));
        repo.expect_update_password().never();

        let app = test_app::create_test_app(repo);
        let response = app
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/profile/password")
                    .header(header::COOKIE, cookie)
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(
                        "current_password=wrong&password=Other2%40x&password_confirmation=Other2%40x",
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/profile");
        assert_eq!(test_app::flash_messages(&response), ["Current password is incorrect"]);
    }
}
