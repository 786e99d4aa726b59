//! Data-access interface used by the service layer

use std::collections::HashMap;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        AuditLog, AuditLogFilter, CompanyAllowedDomain, CompanyConfiguration, ConfigurationSettings,
        DomainAttributes, File, FileInfo, Hackathon, HackathonChanges, HackathonFilter, NewAuditLog,
        NewFile, NewHackathon, NewProject, NewUser, PageParams, Paginated, Project, ProjectChanges,
        ProjectFilter, ProjectImage, ProjectMember, ProjectMembership, ProjectWithFounder,
        ProjectWithHackathon, User, UserChanges, UserFilter,
    },
};

/// One method per query shape. No method performs business validation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Repository: Send + Sync {
    /// Verify the store is reachable
    async fn ping(&self) -> AppResult<()>;

    // Users
    async fn count_users(&self) -> AppResult<i64>;
    async fn find_user(&self, id: Uuid) -> AppResult<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn find_users_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<User>>;
    async fn recent_users(&self, limit: i64) -> AppResult<Vec<User>>;
    async fn email_taken(&self, email: &str, exclude: Option<Uuid>) -> AppResult<bool>;
    async fn create_user(&self, user: NewUser) -> AppResult<User>;
    async fn update_user(&self, id: Uuid, changes: UserChanges) -> AppResult<User>;
    async fn update_password(&self, id: Uuid, password_hash: &str, force_reset: bool) -> AppResult<User>;
    async fn set_force_password_reset(&self, id: Uuid, force: bool) -> AppResult<User>;
    async fn delete_user(&self, id: Uuid) -> AppResult<()>;
    async fn list_users(&self, filter: UserFilter, page: PageParams) -> AppResult<Paginated<User>>;
    async fn users_flagged_for_reset(&self) -> AppResult<Vec<User>>;

    // Hackathons
    async fn count_hackathons(&self) -> AppResult<i64>;
    async fn find_hackathon(&self, id: &str) -> AppResult<Option<Hackathon>>;
    async fn hackathons_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<Hackathon>>;
    async fn recent_hackathons(&self, limit: i64) -> AppResult<Vec<Hackathon>>;
    async fn active_hackathons_with_schedule(&self) -> AppResult<Vec<Hackathon>>;
    async fn active_hackathon_ids(&self) -> AppResult<Vec<String>>;
    async fn list_hackathons(&self, filter: HackathonFilter, page: PageParams) -> AppResult<Paginated<Hackathon>>;
    async fn visible_hackathons(&self) -> AppResult<Vec<Hackathon>>;
    async fn create_hackathon(&self, hackathon: NewHackathon) -> AppResult<Hackathon>;
    async fn update_hackathon(&self, id: &str, changes: HackathonChanges) -> AppResult<Hackathon>;
    async fn delete_hackathon(&self, id: &str) -> AppResult<()>;

    // Projects
    async fn count_projects(&self) -> AppResult<i64>;
    async fn count_active_projects(&self) -> AppResult<i64>;
    async fn count_presenting_projects(&self) -> AppResult<i64>;
    async fn count_projects_in_hackathon(&self, hackathon_id: &str) -> AppResult<i64>;
    async fn count_active_projects_in_hackathon(&self, hackathon_id: &str) -> AppResult<i64>;
    async fn find_project(&self, id: i64) -> AppResult<Option<Project>>;
    async fn projects_by_hackathon(&self, hackathon_id: &str) -> AppResult<Vec<ProjectWithFounder>>;
    async fn projects_by_hackathon_page(
        &self,
        hackathon_id: &str,
        page: PageParams,
    ) -> AppResult<Paginated<ProjectWithFounder>>;
    async fn projects_by_user(&self, user_id: Uuid) -> AppResult<Vec<Project>>;
    async fn projects_by_user_with_hackathon(&self, user_id: Uuid) -> AppResult<Vec<ProjectWithHackathon>>;
    async fn presenting_projects_by_hackathon(&self, hackathon_id: &str) -> AppResult<Vec<ProjectWithFounder>>;
    async fn presenting_projects_from_active(&self) -> AppResult<Vec<ProjectWithHackathon>>;
    async fn recent_projects(&self, limit: i64) -> AppResult<Vec<ProjectWithHackathon>>;
    async fn all_projects(&self) -> AppResult<Vec<Project>>;
    async fn list_projects(&self, filter: ProjectFilter, page: PageParams) -> AppResult<Paginated<ProjectWithHackathon>>;
    async fn user_has_project_in_hackathon(&self, hackathon_id: &str, user_id: Uuid) -> AppResult<bool>;
    /// Inserts the project and the founder's membership in one transaction
    async fn create_project_with_founder(&self, project: NewProject) -> AppResult<Project>;
    async fn update_project(&self, id: i64, changes: ProjectChanges) -> AppResult<Project>;
    async fn update_project_image(&self, id: i64, image: ProjectImage) -> AppResult<Project>;
    async fn set_presenting(&self, id: i64, presenting: bool) -> AppResult<Project>;

    // Memberships
    async fn find_membership(&self, project_id: i64, user_id: Uuid) -> AppResult<Option<ProjectMembership>>;
    async fn count_members(&self, project_id: i64) -> AppResult<i64>;
    async fn member_counts(&self, project_ids: &[i64]) -> AppResult<HashMap<i64, i64>>;
    async fn is_member(&self, project_id: i64, user_id: Uuid) -> AppResult<bool>;
    async fn project_members(&self, project_id: i64) -> AppResult<Vec<ProjectMember>>;
    async fn member_project_ids_in_hackathon(&self, hackathon_id: &str, user_id: Uuid) -> AppResult<Vec<i64>>;
    async fn count_participants(&self, hackathon_id: &str) -> AppResult<i64>;
    async fn create_membership(&self, project_id: i64, user_id: Uuid) -> AppResult<ProjectMembership>;
    async fn delete_membership(&self, id: Uuid) -> AppResult<()>;
    async fn projects_joined_by_user(&self, user_id: Uuid) -> AppResult<Vec<Project>>;

    // Files
    async fn find_file(&self, id: &str) -> AppResult<Option<File>>;
    async fn list_files(&self) -> AppResult<Vec<FileInfo>>;
    async fn files_by_project(&self, project_id: i64) -> AppResult<Vec<FileInfo>>;
    async fn create_file(&self, file: NewFile) -> AppResult<FileInfo>;
    async fn delete_file(&self, id: &str) -> AppResult<()>;

    // Allowed domains
    async fn is_domain_allowed(&self, domain: &str) -> AppResult<bool>;
    async fn active_domains(&self) -> AppResult<Vec<CompanyAllowedDomain>>;
    async fn all_domains(&self) -> AppResult<Vec<CompanyAllowedDomain>>;
    async fn find_domain(&self, id: Uuid) -> AppResult<Option<CompanyAllowedDomain>>;
    async fn create_domain(&self, attrs: DomainAttributes) -> AppResult<CompanyAllowedDomain>;
    async fn update_domain(&self, id: Uuid, attrs: DomainAttributes) -> AppResult<CompanyAllowedDomain>;
    async fn delete_domain(&self, id: Uuid) -> AppResult<()>;

    // Company configuration
    async fn canonical_configuration(&self) -> AppResult<Option<CompanyConfiguration>>;
    async fn create_configuration(&self, settings: ConfigurationSettings) -> AppResult<CompanyConfiguration>;
    async fn update_configuration(
        &self,
        id: Uuid,
        settings: ConfigurationSettings,
    ) -> AppResult<CompanyConfiguration>;

    // Audit log
    async fn insert_audit_log(&self, entry: NewAuditLog) -> AppResult<()>;
    async fn list_audit_logs(&self, filter: AuditLogFilter, page: PageParams) -> AppResult<Paginated<AuditLog>>;
}
