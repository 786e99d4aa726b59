//! Page handler implementations

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::{
    error::AppResult,
    handlers::{
        page::{redirect, Page},
        ROUTE_TABLE,
    },
    middleware::RequestContext,
    models::{ConfigurationSettings, Hackathon},
    services::{ConfigurationService, HackathonService},
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct CompanyPage {
    pub company: ConfigurationSettings,
}

#[derive(Debug, Serialize)]
pub struct SchedulePage {
    pub hackathons: Vec<Hackathon>,
}

#[derive(Debug, Serialize)]
pub struct RouteInfo {
    pub method: &'static str,
    pub path: &'static str,
}

/// Landing page; signed-in users go straight to the hackathon list
pub async fn home(State(state): State<AppState>, ctx: RequestContext) -> AppResult<Response> {
    if ctx.current_user.is_some() {
        return Ok(redirect("/hackathons"));
    }

    let company = ConfigurationService::settings(state.repo()).await?;
    Ok(Page::new(&ctx, "home/index", CompanyPage { company }).into_response())
}

pub async fn about(State(state): State<AppState>, ctx: RequestContext) -> AppResult<Page<CompanyPage>> {
    let company = ConfigurationService::settings(state.repo()).await?;
    Ok(Page::new(&ctx, "about/index", CompanyPage { company }))
}

/// Schedules of upcoming and active hackathons
pub async fn schedule(State(state): State<AppState>, ctx: RequestContext) -> AppResult<Page<SchedulePage>> {
    let hackathons = HackathonService::schedule(state.repo()).await?;
    Ok(Page::new(&ctx, "schedule/index", SchedulePage { hackathons }))
}

pub async fn route_table(ctx: RequestContext) -> Page<Vec<RouteInfo>> {
    let routes = ROUTE_TABLE
        .iter()
        .map(|&(method, path)| RouteInfo { method, path })
        .collect();
    Page::new(&ctx, "routes/index", routes)
}
