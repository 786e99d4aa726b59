//! Hackathon service

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    constants::{audit_actions, project_statuses, resource_types, HACKATHON_ID_BYTES},
    db::Repository,
    error::{AppError, AppResult},
    models::{
        ClientInfo, Hackathon, HackathonChanges, HackathonFilter, HackathonStatus, NewHackathon,
        PageParams, Paginated, ProjectWithFounder, User,
    },
    services::audit_service::{AuditEntry, AuditService},
    utils::generate_hex_id,
    validation::hackathon::{self as rules, HackathonInput},
};

pub const MSG_HAS_PROJECTS: &str = "Hackathons with projects can not be deleted";

/// Submitted hackathon fields
#[derive(Debug, Clone, Default)]
pub struct HackathonDraft {
    pub title: String,
    pub description: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub status: String,
    pub schedule: String,
}

impl HackathonDraft {
    pub fn from_hackathon(hackathon: &Hackathon) -> Self {
        Self {
            title: hackathon.title.clone(),
            description: hackathon.description.clone(),
            start_date: Some(hackathon.start_date),
            end_date: Some(hackathon.end_date),
            status: hackathon.status.clone(),
            schedule: hackathon.schedule.clone(),
        }
    }

    fn input(&self) -> HackathonInput<'_> {
        HackathonInput {
            title: &self.title,
            description: &self.description,
            start_date: self.start_date,
            end_date: self.end_date,
            status: &self.status,
        }
    }
}

/// Everything the hackathon page shows
#[derive(Debug, Serialize)]
pub struct HackathonOverview {
    pub hackathon: Hackathon,
    pub projects: Paginated<ProjectWithFounder>,
    pub member_counts: HashMap<i64, i64>,
    /// Projects on this page the viewer belongs to
    pub user_memberships: Vec<i64>,
    pub can_create_project: bool,
    pub total_participants: i64,
    pub total_teams: i64,
    pub duration_days: i64,
    /// Share of listed projects that are active
    pub progress_percentage: i64,
}

/// Hackathon service
pub struct HackathonService;

impl HackathonService {
    pub async fn list(repo: &dyn Repository, page: PageParams) -> AppResult<Paginated<Hackathon>> {
        repo.list_hackathons(HackathonFilter::default(), page).await
    }

    pub async fn get(repo: &dyn Repository, id: &str) -> AppResult<Hackathon> {
        repo.find_hackathon(id)
            .await?
            .ok_or_else(|| AppError::not_found("Hackathon"))
    }

    /// Upcoming and active hackathons that publish a schedule
    pub async fn schedule(repo: &dyn Repository) -> AppResult<Vec<Hackathon>> {
        repo.active_hackathons_with_schedule().await
    }

    pub async fn overview(
        repo: &dyn Repository,
        id: &str,
        viewer: &User,
        page: PageParams,
    ) -> AppResult<HackathonOverview> {
        let hackathon = Self::get(repo, id).await?;
        let projects = repo.projects_by_hackathon_page(&hackathon.id, page).await?;

        let project_ids: Vec<i64> = projects.items.iter().map(|p| p.project.id).collect();
        let member_counts = repo.member_counts(&project_ids).await?;
        let joined = repo
            .member_project_ids_in_hackathon(&hackathon.id, viewer.id)
            .await?;
        let user_memberships = project_ids
            .iter()
            .copied()
            .filter(|id| joined.contains(id))
            .collect();

        let can_create_project = !repo
            .user_has_project_in_hackathon(&hackathon.id, viewer.id)
            .await?;
        let total_participants = repo.count_participants(&hackathon.id).await?;

        let total_teams = projects
            .items
            .iter()
            .filter(|p| p.project.user_id.is_some())
            .count() as i64;
        let active = projects
            .items
            .iter()
            .filter(|p| p.project.status == project_statuses::ACTIVE)
            .count() as i64;
        let listed = projects.items.len() as i64;
        let progress_percentage = if listed > 0 { active * 100 / listed } else { 0 };

        Ok(HackathonOverview {
            duration_days: hackathon.duration_days(),
            hackathon,
            projects,
            member_counts,
            user_memberships,
            can_create_project,
            total_participants,
            total_teams,
            progress_percentage,
        })
    }

    pub async fn create(
        repo: &dyn Repository,
        draft: HackathonDraft,
        owner: &User,
        client: &ClientInfo,
    ) -> AppResult<Hackathon> {
        rules::validate_create(&draft.input()).into_result()?;
        let (start_date, end_date, status) = Self::checked(&draft)?;

        let hackathon = repo
            .create_hackathon(NewHackathon {
                id: generate_hex_id(HACKATHON_ID_BYTES),
                title: draft.title.trim().to_string(),
                description: draft.description.trim().to_string(),
                start_date,
                end_date,
                status,
                owner_id: owner.id,
                schedule: draft.schedule,
            })
            .await?;

        let entry = AuditEntry::new(
            audit_actions::CREATE,
            resource_types::HACKATHON,
            format!("Hackathon created: {}", hackathon.title),
        )
        .actor(owner.id)
        .resource(hackathon.id.as_str());
        AuditService::record(repo, entry, client).await;

        Ok(hackathon)
    }

    pub async fn update(
        repo: &dyn Repository,
        id: &str,
        draft: HackathonDraft,
        actor: &User,
        client: &ClientInfo,
    ) -> AppResult<Hackathon> {
        let hackathon = Self::get(repo, id).await?;
        rules::validate_update(&draft.input()).into_result()?;
        let (start_date, end_date, status) = Self::checked(&draft)?;

        let hackathon = repo
            .update_hackathon(
                &hackathon.id,
                HackathonChanges {
                    title: draft.title.trim().to_string(),
                    description: draft.description.trim().to_string(),
                    start_date,
                    end_date,
                    status,
                    schedule: draft.schedule,
                },
            )
            .await?;

        let entry = AuditEntry::new(
            audit_actions::UPDATE,
            resource_types::HACKATHON,
            format!("Hackathon updated: {}", hackathon.title),
        )
        .actor(actor.id)
        .resource(hackathon.id.as_str());
        AuditService::record(repo, entry, client).await;

        Ok(hackathon)
    }

    /// Delete a hackathon that has no projects
    pub async fn delete(
        repo: &dyn Repository,
        id: &str,
        actor: &User,
        client: &ClientInfo,
    ) -> AppResult<Hackathon> {
        let hackathon = Self::get(repo, id).await?;
        if repo.count_projects_in_hackathon(&hackathon.id).await? > 0 {
            return Err(AppError::Conflict(MSG_HAS_PROJECTS.to_string()));
        }

        repo.delete_hackathon(&hackathon.id).await?;

        let entry = AuditEntry::new(
            audit_actions::DELETE,
            resource_types::HACKATHON,
            format!("Hackathon deleted: {}", hackathon.title),
        )
        .actor(actor.id)
        .resource(hackathon.id.as_str());
        AuditService::record(repo, entry, client).await;

        Ok(hackathon)
    }

    /// Values the validation pass has already guaranteed
    fn checked(draft: &HackathonDraft) -> AppResult<(DateTime<Utc>, DateTime<Utc>, HackathonStatus)> {
        match (draft.start_date, draft.end_date, HackathonStatus::parse(&draft.status)) {
            (Some(start), Some(end), Some(status)) => Ok((start, end, status)),
            _ => Err(AppError::InvalidInput("Incomplete hackathon".to_string())),
        }
    }
}
