//! Hackathon handler implementations

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    Form,
};
use serde::{Deserialize, Serialize};

use crate::{
    constants::{hackathon_statuses, HACKATHON_PROJECTS_PAGE_SIZE},
    error::{AppError, AppResult},
    handlers::page::{redirect, refuse, Page},
    middleware::RequestContext,
    models::{Hackathon, PageParams, Paginated},
    services::{hackathon_service::HackathonOverview, HackathonService},
    state::AppState,
    validation::FieldErrors,
};

use super::request::HackathonForm;

#[derive(Debug, Serialize)]
pub struct HackathonFormPage {
    pub hackathon: Option<Hackathon>,
    pub form: HackathonForm,
    pub statuses: &'static [&'static str],
}

/// Page number of the project list on a hackathon page
#[derive(Debug, Deserialize)]
pub struct ProjectsPageQuery {
    #[serde(default)]
    pub page: Option<i64>,
}

pub async fn list_hackathons(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(page): Query<PageParams>,
) -> AppResult<Page<Paginated<Hackathon>>> {
    let hackathons = HackathonService::list(state.repo(), page).await?;
    Ok(Page::new(&ctx, "hackathons/index", hackathons))
}

pub async fn new_hackathon(ctx: RequestContext) -> Page<HackathonFormPage> {
    let form = HackathonForm {
        status: hackathon_statuses::UPCOMING.to_string(),
        ..HackathonForm::default()
    };
    form_page(&ctx, "hackathons/new", None, form)
}

pub async fn create_hackathon(
    State(state): State<AppState>,
    ctx: RequestContext,
    Form(form): Form<HackathonForm>,
) -> AppResult<Response> {
    let owner = ctx.user()?.clone();

    let result = match form.to_draft() {
        Ok(draft) => HackathonService::create(state.repo(), draft, &owner, &ctx.client).await,
        Err(errors) => Err(AppError::Invalid(errors)),
    };

    match result {
        Ok(hackathon) => {
            ctx.success("Hackathon created successfully!");
            Ok(redirect(format!("/hackathons/{}", hackathon.id)))
        }
        Err(AppError::Invalid(errors)) => Ok(invalid(&ctx, "hackathons/new", None, form, errors)),
        Err(e) => Err(e),
    }
}

/// Hackathon page with its projects and statistics
pub async fn show_hackathon(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(hackathon_id): Path<String>,
    Query(query): Query<ProjectsPageQuery>,
) -> AppResult<Page<HackathonOverview>> {
    let viewer = ctx.user()?.clone();
    let page = PageParams::new(query.page.unwrap_or(1), HACKATHON_PROJECTS_PAGE_SIZE);

    let overview = HackathonService::overview(state.repo(), &hackathon_id, &viewer, page).await?;
    Ok(Page::new(&ctx, "hackathons/show", overview))
}

pub async fn edit_hackathon(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(hackathon_id): Path<String>,
) -> AppResult<Page<HackathonFormPage>> {
    let hackathon = HackathonService::get(state.repo(), &hackathon_id).await?;
    let form = HackathonForm::from_hackathon(&hackathon);
    Ok(form_page(&ctx, "hackathons/edit", Some(hackathon), form))
}

pub async fn update_hackathon(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(hackathon_id): Path<String>,
    Form(form): Form<HackathonForm>,
) -> AppResult<Response> {
    let actor = ctx.user()?.clone();

    let result = match form.to_draft() {
        Ok(draft) => HackathonService::update(state.repo(), &hackathon_id, draft, &actor, &ctx.client).await,
        Err(errors) => Err(AppError::Invalid(errors)),
    };

    match result {
        Ok(hackathon) => {
            ctx.success("Hackathon updated successfully!");
            Ok(redirect(format!("/hackathons/{}", hackathon.id)))
        }
        Err(AppError::Invalid(errors)) => {
            let hackathon = HackathonService::get(state.repo(), &hackathon_id).await?;
            Ok(invalid(&ctx, "hackathons/edit", Some(hackathon), form, errors))
        }
        Err(e) => Err(e),
    }
}

pub async fn delete_hackathon(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(hackathon_id): Path<String>,
) -> AppResult<Response> {
    let actor = ctx.user()?.clone();

    match HackathonService::delete(state.repo(), &hackathon_id, &actor, &ctx.client).await {
        Ok(_) => {
            ctx.success("Hackathon deleted successfully!");
            Ok(redirect("/hackathons"))
        }
        Err(AppError::Conflict(message)) => Ok(refuse(&ctx, format!("/hackathons/{hackathon_id}"), message)),
        Err(e) => Err(e),
    }
}

fn form_page(
    ctx: &RequestContext,
    template: &'static str,
    hackathon: Option<Hackathon>,
    form: HackathonForm,
) -> Page<HackathonFormPage> {
    Page::new(
        ctx,
        template,
        HackathonFormPage {
            hackathon,
            form,
            statuses: hackathon_statuses::ALL,
        },
    )
}

fn invalid(
    ctx: &RequestContext,
    template: &'static str,
    hackathon: Option<Hackathon>,
    form: HackathonForm,
    errors: FieldErrors,
) -> Response {
    form_page(ctx, template, hackathon, form)
        .with_errors(errors)
        .into_response()
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
    async fn test_unauthenticated_visit_redirects_to_sign_in() {
        let app = test_app::create_test_app(MockRepository::new());

        let response = app
            .oneshot(Request::builder().uri("/hackathons").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/signin");
        assert_eq!(
            test_app::flash_messages(&response),
            ["You must be signed in to access that page"]
        );
    }

    #[tokio::test]
    async fn test_non_owner_cannot_edit_hackathon() {
        let viewer = fixtures::hacker();
        let cookie = test_app::session_cookie(&viewer);
        let hackathon = fixtures::hackathon(fixtures::owner().id);

        let mut repo = MockRepository::new();
        repo.expect_find_user().return_once(move |_| Ok(Some(viewer)));
        repo.expect_find_hackathon().return_once(move |_| Ok(Some(hackathon)));
        repo.expect_update_hackathon().never();

        let app = test_app::create_test_app(repo);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/hackathons/a1b2c3d4e5f6/edit")
                    .header(header::COOKIE, cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/");
    }

    #[tokio::test]
    async fn test_missing_hackathon_is_not_found_for_owner_routes() {
        let owner = fixtures::owner();
        let cookie = test_app::session_cookie(&owner);

        let mut repo = MockRepository::new();
        repo.expect_find_user().return_once(move |_| Ok(Some(owner)));
        repo.expect_find_hackathon().return_once(|_| Ok(None));

        let app = test_app::create_test_app(repo);
        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/hackathons/ffffffffffff")
                    .header(header::COOKIE, cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
