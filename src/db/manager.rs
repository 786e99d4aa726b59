//! PostgreSQL implementation of [`Repository`]

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
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

use super::{
    repositories::{
        AuditLogRepository, CompanyAllowedDomainRepository, CompanyConfigurationRepository,
        FileRepository, HackathonRepository, ProjectMembershipRepository, ProjectRepository,
        UserRepository,
    },
    Repository,
};

/// Aggregates the per-entity repositories over one connection pool
#[derive(Clone)]
pub struct RepositoryManager {
    pool: PgPool,
}

impl RepositoryManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Repository for RepositoryManager {
    async fn ping(&self) -> AppResult<()> {
        super::ping(&self.pool).await?;
        Ok(())
    }

    async fn count_users(&self) -> AppResult<i64> {
        UserRepository::count(&self.pool).await
    }

    async fn find_user(&self, id: Uuid) -> AppResult<Option<User>> {
        UserRepository::find_by_id(&self.pool, &id).await
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        UserRepository::find_by_email(&self.pool, email).await
    }

    async fn find_users_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<User>> {
        UserRepository::find_by_ids(&self.pool, ids).await
    }

    async fn recent_users(&self, limit: i64) -> AppResult<Vec<User>> {
        UserRepository::recent(&self.pool, limit).await
    }

    async fn email_taken(&self, email: &str, exclude: Option<Uuid>) -> AppResult<bool> {
        UserRepository::email_taken(&self.pool, email, exclude).await
    }

    async fn create_user(&self, user: NewUser) -> AppResult<User> {
        UserRepository::create(&self.pool, &user).await
    }

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> AppResult<User> {
        UserRepository::update(&self.pool, &id, &changes).await
    }

    async fn update_password(&self, id: Uuid, password_hash: &str, force_reset: bool) -> AppResult<User> {
        UserRepository::update_password(&self.pool, &id, password_hash, force_reset).await
    }

    async fn set_force_password_reset(&self, id: Uuid, force: bool) -> AppResult<User> {
        UserRepository::set_force_password_reset(&self.pool, &id, force).await
    }

    async fn delete_user(&self, id: Uuid) -> AppResult<()> {
        UserRepository::delete(&self.pool, &id).await
    }

    async fn list_users(&self, filter: UserFilter, page: PageParams) -> AppResult<Paginated<User>> {
        let (users, total) = UserRepository::list(&self.pool, &filter, page.offset(), page.limit()).await?;
        Ok(Paginated::new(users, page, total))
    }

    async fn users_flagged_for_reset(&self) -> AppResult<Vec<User>> {
        UserRepository::flagged_for_reset(&self.pool).await
    }

    async fn count_hackathons(&self) -> AppResult<i64> {
        HackathonRepository::count(&self.pool).await
    }

    async fn find_hackathon(&self, id: &str) -> AppResult<Option<Hackathon>> {
        HackathonRepository::find_by_id(&self.pool, id).await
    }

    async fn hackathons_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<Hackathon>> {
        HackathonRepository::find_by_owner(&self.pool, &owner_id).await
    }

    async fn recent_hackathons(&self, limit: i64) -> AppResult<Vec<Hackathon>> {
        HackathonRepository::recent(&self.pool, limit).await
    }

    async fn active_hackathons_with_schedule(&self) -> AppResult<Vec<Hackathon>> {
        HackathonRepository::active_with_schedule(&self.pool).await
    }

    async fn active_hackathon_ids(&self) -> AppResult<Vec<String>> {
        HackathonRepository::active_ids(&self.pool).await
    }

    async fn list_hackathons(&self, filter: HackathonFilter, page: PageParams) -> AppResult<Paginated<Hackathon>> {
        let (hackathons, total) =
            HackathonRepository::list(&self.pool, &filter, page.offset(), page.limit()).await?;
        Ok(Paginated::new(hackathons, page, total))
    }

    async fn visible_hackathons(&self) -> AppResult<Vec<Hackathon>> {
        HackathonRepository::visible(&self.pool).await
    }

    async fn create_hackathon(&self, hackathon: NewHackathon) -> AppResult<Hackathon> {
        HackathonRepository::create(&self.pool, &hackathon).await
    }

    async fn update_hackathon(&self, id: &str, changes: HackathonChanges) -> AppResult<Hackathon> {
        HackathonRepository::update(&self.pool, id, &changes).await
    }

    async fn delete_hackathon(&self, id: &str) -> AppResult<()> {
        HackathonRepository::delete(&self.pool, id).await
    }

    async fn count_projects(&self) -> AppResult<i64> {
        ProjectRepository::count(&self.pool).await
    }

    async fn count_active_projects(&self) -> AppResult<i64> {
        ProjectRepository::count_active(&self.pool).await
    }

    async fn count_presenting_projects(&self) -> AppResult<i64> {
        ProjectRepository::count_presenting(&self.pool).await
    }

    async fn count_projects_in_hackathon(&self, hackathon_id: &str) -> AppResult<i64> {
        ProjectRepository::count_in_hackathon(&self.pool, hackathon_id).await
    }

    async fn count_active_projects_in_hackathon(&self, hackathon_id: &str) -> AppResult<i64> {
        ProjectRepository::count_active_in_hackathon(&self.pool, hackathon_id).await
    }

    async fn find_project(&self, id: i64) -> AppResult<Option<Project>> {
        ProjectRepository::find_by_id(&self.pool, id).await
    }

    async fn projects_by_hackathon(&self, hackathon_id: &str) -> AppResult<Vec<ProjectWithFounder>> {
        ProjectRepository::find_by_hackathon(&self.pool, hackathon_id).await
    }

    async fn projects_by_hackathon_page(
        &self,
        hackathon_id: &str,
        page: PageParams,
    ) -> AppResult<Paginated<ProjectWithFounder>> {
        let (projects, total) = ProjectRepository::find_by_hackathon_paginated(
            &self.pool,
            hackathon_id,
            page.offset(),
            page.limit(),
        )
        .await?;
        Ok(Paginated::new(projects, page, total))
    }

    async fn projects_by_user(&self, user_id: Uuid) -> AppResult<Vec<Project>> {
        ProjectRepository::find_by_user(&self.pool, &user_id).await
    }

    async fn projects_by_user_with_hackathon(&self, user_id: Uuid) -> AppResult<Vec<ProjectWithHackathon>> {
        ProjectRepository::find_by_user_with_hackathon(&self.pool, &user_id).await
    }

    async fn presenting_projects_by_hackathon(&self, hackathon_id: &str) -> AppResult<Vec<ProjectWithFounder>> {
        ProjectRepository::find_presenting_by_hackathon(&self.pool, hackathon_id).await
    }

    async fn presenting_projects_from_active(&self) -> AppResult<Vec<ProjectWithHackathon>> {
        ProjectRepository::find_presenting_from_active(&self.pool).await
    }

    async fn recent_projects(&self, limit: i64) -> AppResult<Vec<ProjectWithHackathon>> {
        ProjectRepository::recent(&self.pool, limit).await
    }

    async fn all_projects(&self) -> AppResult<Vec<Project>> {
        ProjectRepository::all(&self.pool).await
    }

    async fn list_projects(
        &self,
        filter: ProjectFilter,
        page: PageParams,
    ) -> AppResult<Paginated<ProjectWithHackathon>> {
        let (projects, total) =
            ProjectRepository::list(&self.pool, &filter, page.offset(), page.limit()).await?;
        Ok(Paginated::new(projects, page, total))
    }

    async fn user_has_project_in_hackathon(&self, hackathon_id: &str, user_id: Uuid) -> AppResult<bool> {
        ProjectRepository::exists_for_user_in_hackathon(&self.pool, hackathon_id, &user_id).await
    }

    async fn create_project_with_founder(&self, project: NewProject) -> AppResult<Project> {
        ProjectRepository::create_with_founder(&self.pool, &project).await
    }

    async fn update_project(&self, id: i64, changes: ProjectChanges) -> AppResult<Project> {
        ProjectRepository::update(&self.pool, id, &changes).await
    }

    async fn update_project_image(&self, id: i64, image: ProjectImage) -> AppResult<Project> {
        ProjectRepository::update_image(&self.pool, id, &image).await
    }

    async fn set_presenting(&self, id: i64, presenting: bool) -> AppResult<Project> {
        ProjectRepository::set_presenting(&self.pool, id, presenting).await
    }

    async fn find_membership(&self, project_id: i64, user_id: Uuid) -> AppResult<Option<ProjectMembership>> {
        ProjectMembershipRepository::find(&self.pool, project_id, &user_id).await
    }

    async fn count_members(&self, project_id: i64) -> AppResult<i64> {
        ProjectMembershipRepository::count(&self.pool, project_id).await
    }

    async fn member_counts(&self, project_ids: &[i64]) -> AppResult<HashMap<i64, i64>> {
        ProjectMembershipRepository::counts(&self.pool, project_ids).await
    }

    async fn is_member(&self, project_id: i64, user_id: Uuid) -> AppResult<bool> {
        ProjectMembershipRepository::is_member(&self.pool, project_id, &user_id).await
    }

    async fn project_members(&self, project_id: i64) -> AppResult<Vec<ProjectMember>> {
        ProjectMembershipRepository::members(&self.pool, project_id).await
    }

    async fn member_project_ids_in_hackathon(&self, hackathon_id: &str, user_id: Uuid) -> AppResult<Vec<i64>> {
        ProjectMembershipRepository::project_ids_in_hackathon(&self.pool, hackathon_id, &user_id).await
    }

    async fn count_participants(&self, hackathon_id: &str) -> AppResult<i64> {
        ProjectMembershipRepository::count_participants(&self.pool, hackathon_id).await
    }

    async fn create_membership(&self, project_id: i64, user_id: Uuid) -> AppResult<ProjectMembership> {
        ProjectMembershipRepository::create(&self.pool, project_id, &user_id).await
    }

    async fn delete_membership(&self, id: Uuid) -> AppResult<()> {
        ProjectMembershipRepository::delete(&self.pool, &id).await
    }

    async fn projects_joined_by_user(&self, user_id: Uuid) -> AppResult<Vec<Project>> {
        ProjectMembershipRepository::projects_joined_by_user(&self.pool, &user_id).await
    }

    async fn find_file(&self, id: &str) -> AppResult<Option<File>> {
        FileRepository::find_by_id(&self.pool, id).await
    }

    async fn list_files(&self) -> AppResult<Vec<FileInfo>> {
        FileRepository::list(&self.pool).await
    }

    async fn files_by_project(&self, project_id: i64) -> AppResult<Vec<FileInfo>> {
        FileRepository::find_by_project(&self.pool, project_id).await
    }

    async fn create_file(&self, file: NewFile) -> AppResult<FileInfo> {
        FileRepository::create(&self.pool, &file).await
    }

    async fn delete_file(&self, id: &str) -> AppResult<()> {
        FileRepository::delete(&self.pool, id).await
    }

    async fn is_domain_allowed(&self, domain: &str) -> AppResult<bool> {
        CompanyAllowedDomainRepository::is_allowed(&self.pool, domain).await
    }

    async fn active_domains(&self) -> AppResult<Vec<CompanyAllowedDomain>> {
        CompanyAllowedDomainRepository::active(&self.pool).await
    }

    async fn all_domains(&self) -> AppResult<Vec<CompanyAllowedDomain>> {
        CompanyAllowedDomainRepository::all(&self.pool).await
    }

    async fn find_domain(&self, id: Uuid) -> AppResult<Option<CompanyAllowedDomain>> {
        CompanyAllowedDomainRepository::find_by_id(&self.pool, &id).await
    }

    async fn create_domain(&self, attrs: DomainAttributes) -> AppResult<CompanyAllowedDomain> {
        CompanyAllowedDomainRepository::create(&self.pool, &attrs).await
    }

    async fn update_domain(&self, id: Uuid, attrs: DomainAttributes) -> AppResult<CompanyAllowedDomain> {
        CompanyAllowedDomainRepository::update(&self.pool, &id, &attrs).await
    }

    async fn delete_domain(&self, id: Uuid) -> AppResult<()> {
        CompanyAllowedDomainRepository::delete(&self.pool, &id).await
    }

    async fn canonical_configuration(&self) -> AppResult<Option<CompanyConfiguration>> {
        CompanyConfigurationRepository::canonical(&self.pool).await
    }

    async fn create_configuration(&self, settings: ConfigurationSettings) -> AppResult<CompanyConfiguration> {
        CompanyConfigurationRepository::create(&self.pool, &settings).await
    }

    async fn update_configuration(
        &self,
        id: Uuid,
        settings: ConfigurationSettings,
    ) -> AppResult<CompanyConfiguration> {
        CompanyConfigurationRepository::update(&self.pool, &id, &settings).await
    }

    async fn insert_audit_log(&self, entry: NewAuditLog) -> AppResult<()> {
        AuditLogRepository::insert(&self.pool, &entry).await
    }

    async fn list_audit_logs(&self, filter: AuditLogFilter, page: PageParams) -> AppResult<Paginated<AuditLog>> {
        let (logs, total) = AuditLogRepository::list(&self.pool, &filter, page.offset(), page.limit()).await?;
        Ok(Paginated::new(logs, page, total))
    }
}
