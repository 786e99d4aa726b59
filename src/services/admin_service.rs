//! Admin service
//!
//! Read models for the owner back-office. Mutations live in the services
//! owning each entity.

use serde::Serialize;
use uuid::Uuid;

use crate::{
    constants::ADMIN_RECENT_LIMIT,
    db::Repository,
    error::AppResult,
    models::{
        Hackathon, HackathonFilter, PageParams, Paginated, ProjectFilter, ProjectWithHackathon, User,
        UserFilter,
    },
    services::UserService,
};

/// Platform-wide counters
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct SystemStats {
    pub total_users: i64,
    pub total_hackathons: i64,
    pub total_projects: i64,
    pub active_projects: i64,
    pub presenting_projects: i64,
}

/// Admin dashboard contents
#[derive(Debug, Serialize)]
pub struct AdminOverview {
    pub stats: SystemStats,
    pub recent_users: Vec<User>,
    pub recent_hackathons: Vec<Hackathon>,
    pub recent_projects: Vec<ProjectWithHackathon>,
    /// Presenting projects of active hackathons, in presentation order
    pub presenting_projects: Vec<ProjectWithHackathon>,
}

/// A user together with the projects they founded
#[derive(Debug, Serialize)]
pub struct UserDetails {
    pub user: User,
    pub projects: Vec<ProjectWithHackathon>,
}

/// Admin service for the owner back-office
pub struct AdminService;

impl AdminService {
    pub async fn system_stats(repo: &dyn Repository) -> AppResult<SystemStats> {
        Ok(SystemStats {
            total_users: repo.count_users().await?,
            total_hackathons: repo.count_hackathons().await?,
            total_projects: repo.count_projects().await?,
            active_projects: repo.count_active_projects().await?,
            presenting_projects: repo.count_presenting_projects().await?,
        })
    }

    pub async fn overview(repo: &dyn Repository) -> AppResult<AdminOverview> {
        Ok(AdminOverview {
            stats: Self::system_stats(repo).await?,
            recent_users: repo.recent_users(ADMIN_RECENT_LIMIT).await?,
            recent_hackathons: repo.recent_hackathons(ADMIN_RECENT_LIMIT).await?,
            recent_projects: repo.recent_projects(ADMIN_RECENT_LIMIT).await?,
            presenting_projects: repo.presenting_projects_from_active().await?,
        })
    }

    /// List users with search and role filters
    pub async fn users(repo: &dyn Repository, filter: UserFilter, page: PageParams) -> AppResult<Paginated<User>> {
        repo.list_users(clean(filter), page).await
    }

    pub async fn user_details(repo: &dyn Repository, id: Uuid) -> AppResult<UserDetails> {
        let user = UserService::get_user_by_id(repo, id).await?;
        let projects = repo.projects_by_user_with_hackathon(user.id).await?;
        Ok(UserDetails { user, projects })
    }

    pub async fn hackathons(
        repo: &dyn Repository,
        filter: HackathonFilter,
        page: PageParams,
    ) -> AppResult<Paginated<Hackathon>> {
        let filter = HackathonFilter {
            search: non_blank(filter.search),
            status: non_blank(filter.status),
        };
        repo.list_hackathons(filter, page).await
    }

    pub async fn projects(
        repo: &dyn Repository,
        filter: ProjectFilter,
        page: PageParams,
    ) -> AppResult<Paginated<ProjectWithHackathon>> {
        let filter = ProjectFilter {
            search: non_blank(filter.search),
            status: non_blank(filter.status),
        };
        repo.list_projects(filter, page).await
    }

    /// Users who must pick a new password at their next request
    pub async fn flagged_users(repo: &dyn Repository) -> AppResult<Vec<User>> {
        repo.users_flagged_for_reset().await
    }
}

fn clean(filter: UserFilter) -> UserFilter {
    UserFilter {
        search: non_blank(filter.search),
        role: non_blank(filter.role),
    }
}

/// Empty query-string values mean "no filter"
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
