//! Join and leave handlers
//!
//! Both answer with a redirect to the hackathon page; refusals travel as a
//! danger flash.

use axum::{
    extract::{Path, State},
    response::Response,
};

use crate::{
    error::{AppError, AppResult},
    handlers::page::{flash_message, redirect, refuse},
    middleware::RequestContext,
    services::{
        membership_service::{JoinOutcome, LeaveOutcome},
        MembershipService,
    },
    state::AppState,
};

pub async fn join_project(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path((hackathon_id, project_id)): Path<(String, i64)>,
) -> AppResult<Response> {
    let user = ctx.user()?.clone();
    let back = format!("/hackathons/{hackathon_id}");

    match MembershipService::join(state.repo(), &hackathon_id, project_id, &user, &ctx.client).await {
        Ok((_, JoinOutcome::Joined(_))) => ctx.success("You joined the project!"),
        Ok((_, JoinOutcome::AlreadyMember)) => ctx.warning("You are already a member of this project."),
        Err(e @ (AppError::Forbidden(_) | AppError::Conflict(_))) => {
            return Ok(refuse(&ctx, back, flash_message(&e).unwrap_or_default()));
        }
        Err(e) => return Err(e),
    }

    Ok(redirect(back))
}

pub async fn leave_project(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path((hackathon_id, project_id)): Path<(String, i64)>,
) -> AppResult<Response> {
    let user = ctx.user()?.clone();
    let back = format!("/hackathons/{hackathon_id}");

    match MembershipService::leave(state.repo(), &hackathon_id, project_id, &user, &ctx.client).await {
        Ok((_, LeaveOutcome::Left)) => ctx.success("You left the project."),
        Ok((_, LeaveOutcome::NotMember)) => ctx.warning("You are not a member of this project."),
        Err(e @ AppError::Forbidden(_)) => {
            return Ok(refuse(&ctx, back, flash_message(&e).unwrap_or_default()));
        }
        Err(e) => return Err(e),
    }

    Ok(redirect(back))
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
    async fn test_founder_cannot_leave() {
        let founder = fixtures::hacker();
        let cookie = test_app::session_cookie(&founder);
        let hackathon = fixtures::hackathon(fixtures::owner().id);
        let project = fixtures::project(7, &hackathon.id, Some(founder.id));

        let mut repo = MockRepository::new();
        repo.expect_find_user().return_once(move |_| Ok(Some(founder)));
        repo.expect_find_hackathon().return_once(move |_| Ok(Some(hackathon)));
        repo.expect_find_project().return_once(move |_| Ok(Some(project)));
        repo.expect_delete_membership().never();

        let app = test_app::create_test_app(repo);
        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/hackathons/a1b2c3d4e5f6/projects/7/leave")
                    .header(header::COOKIE, cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/hackathons/a1b2c3d4e5f6");
        assert_eq!(test_app::flash_messages(&response), ["You cannot leave a project you own."]);
    }

    #[tokio::test]
    async fn test_join_twice_warns() {
        let member = fixtures::hacker();
        let cookie = test_app::session_cookie(&member);
        let hackathon = fixtures::hackathon(fixtures::owner().id);
        let project = fixtures::project(7, &hackathon.id, None);

        let mut repo = MockRepository::new();
        repo.expect_find_user().return_once(move |_| Ok(Some(member)));
        repo.expect_find_hackathon().return_once(move |_| Ok(Some(hackathon)));
        repo.expect_find_project().return_once(move |_| Ok(Some(project)));
        repo.expect_is_member().return_once(|_, _| Ok(true));
        repo.expect_create_membership().never();

        let app = test_app::create_test_app(repo);
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/hackathons/a1b2c3d4e5f6/projects/7/join")
                    .header(header::COOKIE, cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            test_app::flash_messages(&response),
            ["You are already a member of this project."]
        );
    }
}
