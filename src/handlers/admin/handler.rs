//! Admin handler implementations

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    Form,
};
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    constants::{audit_actions, hackathon_statuses, project_statuses, resource_types, roles},
    error::{AppError, AppResult},
    handlers::{
        page::{flash_message, redirect, refuse, Page},
        users::request::RegisterForm,
    },
    middleware::RequestContext,
    models::{
        CompanyAllowedDomain, CompanyConfiguration, ConfigurationSettings, Hackathon, PageParams, Paginated,
        ProjectWithHackathon, User, UserFilter,
    },
    services::{
        admin_service::{AdminOverview, UserDetails},
        audit_service::AuditLogPage,
        AdminService, AuditService, ConfigurationService, DomainService, UserService,
    },
    state::AppState,
    validation::{fields, FieldErrors},
};

use super::request::{AdminUserForm, AuditLogQuery, ConfigForm, DomainForm, StatusQuery, UsersQuery};

#[derive(Debug, Serialize)]
pub struct UserList {
    pub users: Paginated<User>,
    pub search: Option<String>,
    pub role: Option<String>,
    pub roles: &'static [&'static str],
}

#[derive(Debug, Serialize)]
pub struct UserFormPage {
    pub user: Option<User>,
    pub form: Option<AdminUserForm>,
    pub roles: &'static [&'static str],
}

#[derive(Debug, Serialize)]
pub struct FilteredList<T> {
    pub items: Paginated<T>,
    pub statuses: &'static [&'static str],
}

#[derive(Debug, Serialize)]
pub struct DomainList {
    pub domains: Vec<CompanyAllowedDomain>,
}

#[derive(Debug, Serialize)]
pub struct ConfigPage {
    pub config: ConfigurationSettings,
}

#[derive(Debug, Serialize)]
pub struct PasswordsPage {
    pub flagged: Vec<User>,
    pub users: Paginated<User>,
}

#[derive(Debug, Serialize)]
pub struct AuditLogsPage {
    #[serde(flatten)]
    pub page: AuditLogPage,
    pub actions: &'static [&'static str],
    pub resource_types: &'static [&'static str],
}

/// Dashboard with platform counters and recent activity
pub async fn overview(State(state): State<AppState>, ctx: RequestContext) -> AppResult<Page<AdminOverview>> {
    let overview = AdminService::overview(state.repo()).await?;
    Ok(Page::new(&ctx, "admin/index", overview))
}

pub async fn list_users(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(query): Query<UsersQuery>,
) -> AppResult<Page<UserList>> {
    let (filter, page) = query.split();
    let (search, role) = (filter.search.clone(), filter.role.clone());
    let users = AdminService::users(state.repo(), filter, page).await?;

    Ok(Page::new(
        &ctx,
        "admin/users/index",
        UserList {
            users,
            search,
            role,
            roles: roles::ALL,
        },
    ))
}

pub async fn new_user(ctx: RequestContext) -> Page<UserFormPage> {
    Page::new(
        &ctx,
        "admin/users/new",
        UserFormPage {
            user: None,
            form: None,
            roles: roles::ALL,
        },
    )
}

/// Create an account without the domain allow-list
pub async fn create_user(
    State(state): State<AppState>,
    ctx: RequestContext,
    Form(form): Form<RegisterForm>,
) -> AppResult<Response> {
    let actor = ctx.user()?.clone();
    if let Err(errors) = form.validate() {
        return Ok(user_form(&ctx, "admin/users/new", None, None, errors.into()));
    }

    match UserService::admin_create(state.repo(), form.into_account(true), &actor, &ctx.client).await {
        Ok(_) => {
            ctx.success("User created successfully");
            Ok(redirect("/admin/users"))
        }
        Err(AppError::Invalid(errors)) => Ok(user_form(&ctx, "admin/users/new", None, None, errors)),
        Err(e) => Err(e),
    }
}

pub async fn show_user(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(user_id): Path<Uuid>,
) -> AppResult<Page<UserDetails>> {
    let details = AdminService::user_details(state.repo(), user_id).await?;
    Ok(Page::new(&ctx, "admin/users/show", details))
}

pub async fn edit_user(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(user_id): Path<Uuid>,
) -> AppResult<Response> {
    let user = UserService::get_user_by_id(state.repo(), user_id).await?;
    let form = AdminUserForm::from(&user);
    Ok(user_form(&ctx, "admin/users/edit", Some(user), Some(form), FieldErrors::new()))
}

/// Update name, email, team, role and the forced reset flag
pub async fn update_user(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(user_id): Path<Uuid>,
    Form(form): Form<AdminUserForm>,
) -> AppResult<Response> {
    let actor = ctx.user()?.clone();
    let user = UserService::get_user_by_id(state.repo(), user_id).await?;
    if let Err(errors) = form.validate() {
        return Ok(user_form(&ctx, "admin/users/edit", Some(user), Some(form), errors.into()));
    }

    match UserService::admin_update(state.repo(), user.id, form.clone().into_changes(), &actor, &ctx.client).await {
        Ok(_) => {
            ctx.success("User updated successfully");
            Ok(redirect("/admin/users"))
        }
        Err(AppError::Invalid(errors)) if errors.has(fields::ROLE) => Ok(refuse(
            &ctx,
            format!("/admin/users/{user_id}/edit"),
            "Invalid role specified",
        )),
        Err(AppError::Invalid(errors)) => Ok(user_form(&ctx, "admin/users/edit", Some(user), Some(form), errors)),
        Err(e) => Err(e),
    }
}

/// Delete an account; owner accounts are refused with a flash
pub async fn delete_user(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(user_id): Path<Uuid>,
) -> AppResult<Response> {
    let actor = ctx.user()?.clone();

    match UserService::delete(state.repo(), user_id, &actor, &ctx.client).await {
        Ok(_) => {
            ctx.success("User deleted successfully");
            Ok(redirect("/admin/users"))
        }
        Err(AppError::Conflict(message)) => Ok(refuse(&ctx, "/admin/users", message)),
        Err(e) => Err(e),
    }
}

fn user_form(
    ctx: &RequestContext,
    template: &'static str,
    user: Option<User>,
    form: Option<AdminUserForm>,
    errors: FieldErrors,
) -> Response {
    let page = Page::new(
        ctx,
        template,
        UserFormPage {
            user,
            form,
            roles: roles::ALL,
        },
    );
    if errors.is_empty() {
        page.into_response()
    } else {
        page.with_errors(errors).into_response()
    }
}

pub async fn list_hackathons(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(query): Query<StatusQuery>,
) -> AppResult<Page<FilteredList<Hackathon>>> {
    let (filter, page) = query.hackathons();
    let items = AdminService::hackathons(state.repo(), filter, page).await?;
    Ok(Page::new(
        &ctx,
        "admin/hackathons/index",
        FilteredList {
            items,
            statuses: hackathon_statuses::ALL,
        },
    ))
}

pub async fn list_projects(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(query): Query<StatusQuery>,
) -> AppResult<Page<FilteredList<ProjectWithHackathon>>> {
    let (filter, page) = query.projects();
    let items = AdminService::projects(state.repo(), filter, page).await?;
    Ok(Page::new(
        &ctx,
        "admin/projects/index",
        FilteredList {
            items,
            statuses: project_statuses::ALL,
        },
    ))
}

/// Email domain overview
pub async fn emails(State(state): State<AppState>, ctx: RequestContext) -> AppResult<Page<DomainList>> {
    let domains = DomainService::list(state.repo()).await?;
    Ok(Page::new(&ctx, "admin/emails/index", DomainList { domains }))
}

pub async fn show_config(State(state): State<AppState>, ctx: RequestContext) -> AppResult<Page<ConfigPage>> {
    let configuration = ConfigurationService::load(state.repo()).await?;
    Ok(config_page(&ctx, configuration.settings))
}

/// Apply the fields that changed
pub async fn update_config(
    State(state): State<AppState>,
    ctx: RequestContext,
    Form(fields): Form<HashMap<String, String>>,
) -> AppResult<Response> {
    let actor = ctx.user()?.clone();
    let current: CompanyConfiguration = ConfigurationService::load(state.repo()).await?;

    let incoming = match ConfigForm(fields).apply_to(&current.settings) {
        Ok(settings) => settings,
        Err(errors) => return Ok(config_page(&ctx, current.settings).with_errors(errors).into_response()),
    };

    match ConfigurationService::update(state.repo(), incoming.clone(), &actor, &ctx.client).await {
        Ok(update) if update.changed.is_empty() => {
            ctx.info("No changes were made to the configuration.");
            Ok(redirect("/admin/config"))
        }
        Ok(_) => {
            ctx.success("Company configuration updated successfully!");
            Ok(redirect("/admin/config"))
        }
        Err(AppError::Invalid(errors)) => Ok(config_page(&ctx, incoming).with_errors(errors).into_response()),
        Err(e) => Err(e),
    }
}

fn config_page(ctx: &RequestContext, config: ConfigurationSettings) -> Page<ConfigPage> {
    Page::new(ctx, "admin/config/index", ConfigPage { config })
}

/// Users flagged for a forced reset, plus the accounts that can be flagged
pub async fn passwords(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(page): Query<PageParams>,
) -> AppResult<Page<PasswordsPage>> {
    let flagged = AdminService::flagged_users(state.repo()).await?;
    let users = AdminService::users(state.repo(), UserFilter::default(), page).await?;
    Ok(Page::new(&ctx, "admin/passwords/index", PasswordsPage { flagged, users }))
}

pub async fn require_password_reset(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(user_id): Path<Uuid>,
) -> AppResult<Response> {
    let actor = ctx.user()?.clone();
    let user = UserService::flag_for_password_reset(state.repo(), user_id, &actor, &ctx.client).await?;

    ctx.success(format!("{} must reset their password at next sign in", user.name));
    Ok(redirect("/admin/passwords"))
}

pub async fn list_domains(State(state): State<AppState>, ctx: RequestContext) -> AppResult<Page<DomainList>> {
    let domains = DomainService::list(state.repo()).await?;
    Ok(Page::new(&ctx, "admin/domains/index", DomainList { domains }))
}

pub async fn create_domain(
    State(state): State<AppState>,
    ctx: RequestContext,
    Form(form): Form<DomainForm>,
) -> AppResult<Response> {
    let actor = ctx.user()?.clone();

    match DomainService::create(state.repo(), form.into(), &actor, &ctx.client).await {
        Ok(_) => ctx.success("Domain added successfully!"),
        Err(e @ (AppError::Invalid(_) | AppError::Conflict(_))) => {
            ctx.danger(flash_message(&e).unwrap_or_else(|| "Could not create domain".to_string()));
        }
        Err(e) => return Err(e),
    }
    Ok(redirect("/admin/domains"))
}

pub async fn update_domain(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(domain_id): Path<Uuid>,
    Form(form): Form<DomainForm>,
) -> AppResult<Response> {
    let actor = ctx.user()?.clone();

    match DomainService::update(state.repo(), domain_id, form.into(), &actor, &ctx.client).await {
        Ok(_) => ctx.success("Domain updated successfully!"),
        Err(e @ (AppError::Invalid(_) | AppError::Conflict(_))) => {
            ctx.danger(flash_message(&e).unwrap_or_else(|| "Could not update domain".to_string()));
        }
        Err(e) => return Err(e),
    }
    Ok(redirect("/admin/domains"))
}

pub async fn delete_domain(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(domain_id): Path<Uuid>,
) -> AppResult<Response> {
    let actor = ctx.user()?.clone();
    DomainService::delete(state.repo(), domain_id, &actor, &ctx.client).await?;

    ctx.success("Domain deleted successfully!");
    Ok(redirect("/admin/domains"))
}

/// Audit trail with search, action and resource filters
pub async fn audit_logs(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(query): Query<AuditLogQuery>,
) -> AppResult<Page<AuditLogsPage>> {
    let (filter, page) = query.split();
    let logs = AuditService::list(state.repo(), filter, page).await?;

    Ok(Page::new(
        &ctx,
        "admin/audit_logs/index",
        AuditLogsPage {
            page: logs,
            actions: audit_actions::ALL,
            resource_types: resource_types::ALL,
        },
    ))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use chrono::Utc;
    use tower::ServiceExt;

    use super::*;
    use crate::db::MockRepository;
    use crate::test_utils::{fixtures, test_app};

    #[tokio::test]
    async fn test_hacker_cannot_update_config() {
        let hacker = fixtures::hacker();
        let cookie = test_app::session_cookie(&hacker);

        let mut repo = MockRepository::new();
        repo.expect_find_user().return_once(move |_| Ok(Some(hacker)));
        repo.expect_canonical_configuration().never();
        repo.expect_update_configuration().never();

        let app = test_app::create_test_app(repo);
        let response = app
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/admin/config")
                    .header(header::COOKIE, cookie)
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("company_name=Hijacked&file_uploads_enabled=false"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/");
        assert_eq!(
            test_app::flash_messages(&response),
            ["You must be an owner to access that page"]
        );
    }

    #[tokio::test]
    async fn test_unchanged_config_flashes_info() {
        let owner = fixtures::owner();
        let cookie = test_app::session_cookie(&owner);
        let configuration = CompanyConfiguration {
            id: Uuid::new_v4(),
            settings: ConfigurationSettings::default(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let mut repo = MockRepository::new();
        repo.expect_find_user().return_once(move |_| Ok(Some(owner)));
        repo.expect_canonical_configuration()
            .times(2)
            .returning(move || Ok(Some(configuration.clone())));
        repo.expect_update_configuration().never();

        let body = [
            "allow_public_registration",
            "require_email_verification",
            "password_require_uppercase",
            "password_require_numbers",
            "file_uploads_enabled",
            "project_images_enabled",
            "team_formation_enabled",
            "public_profiles_enabled",
        ]
        .map(|flag| format!("{flag}=true"))
        .join("&");

        let app = test_app::create_test_app(repo);
        let response = app
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/admin/config")
                    .header(header::COOKIE, cookie)
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/admin/config");
        assert_eq!(
            test_app::flash_messages(&response),
            ["No changes were made to the configuration."]
        );
    }

    #[tokio::test]
    async fn test_owner_accounts_are_not_deleted() {
        let owner = fixtures::owner();
        let cookie = test_app::session_cookie(&owner);
        let other_owner = User {
            id: Uuid::new_v4(),
            ..fixtures::owner()
        };
        let target = other_owner.id;

        let mut repo = MockRepository::new();
        repo.expect_find_user()
            .times(2)
            .returning(move |id| Ok(Some(if id == target { other_owner.clone() } else { owner.clone() })));
        repo.expect_delete_user().never();

        let app = test_app::create_test_app(repo);
        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/admin/users/{target}"))
                    .header(header::COOKIE, cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/admin/users");
        assert_eq!(test_app::flash_messages(&response), ["Cannot delete owner accounts"]);
    }
}
