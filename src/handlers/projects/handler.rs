//! Project handler implementations

use axum::{
    extract::{Multipart, Path, State},
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::{
    constants::project_statuses,
    error::{AppError, AppResult},
    handlers::page::{flash_message, redirect, refuse, Page},
    middleware::RequestContext,
    models::{Hackathon, Project},
    services::{
        project_service::{ProjectDetails, ProjectIndex, MSG_NOT_FOUNDER},
        ConfigurationService, ProjectService,
    },
    state::AppState,
    utils::MultipartForm,
    validation::FieldErrors,
};

use super::request::{take_image, ProjectForm};

#[derive(Debug, Serialize)]
pub struct ProjectFormPage {
    pub hackathon: Hackathon,
    pub project: Option<Project>,
    pub form: ProjectForm,
    pub statuses: &'static [&'static str],
    pub images_enabled: bool,
}

fn project_path(hackathon_id: &str, project_id: i64) -> String {
    format!("/hackathons/{hackathon_id}/projects/{project_id}")
}

pub async fn list_projects(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(hackathon_id): Path<String>,
) -> AppResult<Page<ProjectIndex>> {
    let index = ProjectService::index(state.repo(), &hackathon_id).await?;
    Ok(Page::new(&ctx, "projects/index", index))
}

pub async fn new_project(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(hackathon_id): Path<String>,
) -> AppResult<Response> {
    let hackathon = ProjectService::hackathon(state.repo(), &hackathon_id).await?;
    form_page(&state, &ctx, "projects/new", hackathon, None, ProjectForm::blank(), FieldErrors::new()).await
}

/// Create a project; the creator becomes its founder and first member
pub async fn create_project(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(hackathon_id): Path<String>,
    multipart: Multipart,
) -> AppResult<Response> {
    let founder = ctx.user()?.clone();
    let (form, draft) = ProjectForm::read(MultipartForm::read(multipart).await?);
    let max_image = state.config().uploads.max_image_size_bytes;

    match ProjectService::create(state.repo(), &hackathon_id, draft, &founder, max_image, &ctx.client).await {
        Ok(project) => {
            ctx.success("Project created successfully!");
            Ok(redirect(project_path(&hackathon_id, project.id)))
        }
        Err(AppError::Invalid(errors)) => {
            let hackathon = ProjectService::hackathon(state.repo(), &hackathon_id).await?;
            form_page(&state, &ctx, "projects/new", hackathon, None, form, errors).await
        }
        Err(e) => Err(e),
    }
}

pub async fn show_project(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path((hackathon_id, project_id)): Path<(String, i64)>,
) -> AppResult<Page<ProjectDetails>> {
    let viewer = ctx.user()?.clone();
    let details = ProjectService::details(state.repo(), &hackathon_id, project_id, &viewer).await?;
    Ok(Page::new(&ctx, "projects/show", details))
}

/// Edit form; only the founder gets it
pub async fn edit_project(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path((hackathon_id, project_id)): Path<(String, i64)>,
) -> AppResult<Response> {
    let actor = ctx.user()?.clone();

    match ProjectService::editable(state.repo(), &hackathon_id, project_id, &actor).await {
        Ok((hackathon, project)) => {
            let form = ProjectForm::from_project(&project);
            form_page(&state, &ctx, "projects/edit", hackathon, Some(project), form, FieldErrors::new()).await
        }
        Err(AppError::Forbidden(_)) => Ok(refuse(&ctx, project_path(&hackathon_id, project_id), MSG_NOT_FOUNDER)),
        Err(e) => Err(e),
    }
}

pub async fn update_project(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path((hackathon_id, project_id)): Path<(String, i64)>,
    multipart: Multipart,
) -> AppResult<Response> {
    let actor = ctx.user()?.clone();
    let (form, draft) = ProjectForm::read(MultipartForm::read(multipart).await?);
    let max_image = state.config().uploads.max_image_size_bytes;

    let result =
        ProjectService::update(state.repo(), &hackathon_id, project_id, draft, &actor, max_image, &ctx.client).await;
    match result {
        Ok(project) => {
            ctx.success("Project updated successfully!");
            Ok(redirect(project_path(&hackathon_id, project.id)))
        }
        Err(AppError::Forbidden(_)) => Ok(refuse(&ctx, project_path(&hackathon_id, project_id), MSG_NOT_FOUNDER)),
        Err(AppError::Invalid(errors)) => {
            let (hackathon, project) = ProjectService::get(state.repo(), &hackathon_id, project_id).await?;
            form_page(&state, &ctx, "projects/edit", hackathon, Some(project), form, errors).await
        }
        Err(e) => Err(e),
    }
}

/// Serve the stored project image
pub async fn project_image(
    State(state): State<AppState>,
    Path((hackathon_id, project_id)): Path<(String, i64)>,
) -> AppResult<Response> {
    let image = ProjectService::image(state.repo(), &hackathon_id, project_id).await?;
    Ok(([(CONTENT_TYPE, image.content_type)], image.data).into_response())
}

/// Replace the project image; problems are reported as a flash
pub async fn update_project_image(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path((hackathon_id, project_id)): Path<(String, i64)>,
    multipart: Multipart,
) -> AppResult<Response> {
    let actor = ctx.user()?.clone();
    let image = take_image(&mut MultipartForm::read(multipart).await?);
    let max_image = state.config().uploads.max_image_size_bytes;
    let back = project_path(&hackathon_id, project_id);

    let result =
        ProjectService::update_image(state.repo(), &hackathon_id, project_id, image, &actor, max_image, &ctx.client)
            .await;
    match result {
        Ok(_) => {
            ctx.success("Project image updated successfully!");
            Ok(redirect(back))
        }
        Err(e @ (AppError::Invalid(_) | AppError::Forbidden(_))) => {
            let message = flash_message(&e).unwrap_or_else(|| MSG_NOT_FOUNDER.to_string());
            Ok(refuse(&ctx, back, message))
        }
        Err(e) => Err(e),
    }
}

/// Flip the presenting flag; anyone but the founder gets a 403
pub async fn toggle_presenting(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path((hackathon_id, project_id)): Path<(String, i64)>,
) -> AppResult<Response> {
    let actor = ctx.user()?.clone();
    ProjectService::toggle_presenting(state.repo(), &hackathon_id, project_id, &actor, &ctx.client).await?;

    ctx.success("Project presenting status updated!");
    Ok(redirect(project_path(&hackathon_id, project_id)))
}

async fn form_page(
    state: &AppState,
    ctx: &RequestContext,
    template: &'static str,
    hackathon: Hackathon,
    project: Option<Project>,
    form: ProjectForm,
    errors: FieldErrors,
) -> AppResult<Response> {
    let images_enabled = ConfigurationService::settings(state.repo()).await?.project_images_enabled;
    let page = Page::new(
        ctx,
        template,
        ProjectFormPage {
            hackathon,
            project,
            form,
            statuses: project_statuses::ALL,
            images_enabled,
        },
    );

    Ok(if errors.is_empty() {
        page.into_response()
    } else {
        page.with_errors(errors).into_response()
    })
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
    async fn test_toggle_presenting_by_stranger_is_forbidden() {
        let viewer = fixtures::hacker();
        let cookie = test_app::session_cookie(&viewer);
        let hackathon = fixtures::hackathon(fixtures::owner().id);
        let project = fixtures::project(7, &hackathon.id, Some(fixtures::owner().id));

        let mut repo = MockRepository::new();
        repo.expect_find_user().return_once(move |_| Ok(Some(viewer)));
        repo.expect_find_hackathon().return_once(move |_| Ok(Some(hackathon)));
        repo.expect_find_project().return_once(move |_| Ok(Some(project)));
        repo.expect_set_presenting().never();

        let app = test_app::create_test_app(repo);
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/hackathons/a1b2c3d4e5f6/projects/7/toggle-presenting")
                    .header(header::COOKIE, cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_edit_by_non_founder_redirects_with_flash() {
        let viewer = fixtures::hacker();
        let cookie = test_app::session_cookie(&viewer);
        let hackathon = fixtures::hackathon(fixtures::owner().id);
        let project = fixtures::project(7, &hackathon.id, Some(fixtures::owner().id));

        let mut repo = MockRepository::new();
        repo.expect_find_user().return_once(move |_| Ok(Some(viewer)));
        repo.expect_find_hackathon().return_once(move |_| Ok(Some(hackathon)));
        repo.expect_find_project().return_once(move |_| Ok(Some(project)));

        let app = test_app::create_test_app(repo);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/hackathons/a1b2c3d4e5f6/projects/7/edit")
                    .header(header::COOKIE, cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers()[header::LOCATION],
            "/hackathons/a1b2c3d4e5f6/projects/7"
        );
        assert_eq!(test_app::flash_messages(&response), ["You can only edit your own projects."]);
    }
}
