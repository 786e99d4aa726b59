//! Project membership service

use crate::{
    constants::{audit_actions, resource_types},
    db::Repository,
    error::{AppError, AppResult},
    models::{ClientInfo, Project, ProjectMembership, User},
    services::{
        audit_service::{AuditEntry, AuditService},
        ConfigurationService, ProjectService,
    },
};

pub const MSG_TEAM_FORMATION_DISABLED: &str = "Team formation is currently disabled.";
pub const MSG_TEAM_FULL: &str = "This team is already full.";

/// What happened when a user asked to join a project
#[derive(Debug)]
pub enum JoinOutcome {
    Joined(ProjectMembership),
    AlreadyMember,
}

/// What happened when a user asked to leave a project
#[derive(Debug, PartialEq, Eq)]
pub enum LeaveOutcome {
    Left,
    NotMember,
}

/// Membership service
pub struct MembershipService;

impl MembershipService {
    pub async fn join(
        repo: &dyn Repository,
        hackathon_id: &str,
        project_id: i64,
        user: &User,
        client: &ClientInfo,
    ) -> AppResult<(Project, JoinOutcome)> {
        let (_, project) = ProjectService::get(repo, hackathon_id, project_id).await?;

        if repo.is_member(project.id, user.id).await? {
            return Ok((project, JoinOutcome::AlreadyMember));
        }

        let settings = ConfigurationService::settings(repo).await?;
        if !settings.team_formation_enabled {
            return Err(AppError::Forbidden(MSG_TEAM_FORMATION_DISABLED.to_string()));
        }
        if settings.max_team_size > 0 && repo.count_members(project.id).await? >= i64::from(settings.max_team_size) {
            return Err(AppError::Conflict(MSG_TEAM_FULL.to_string()));
        }

        let membership = repo.create_membership(project.id, user.id).await?;

        let entry = AuditEntry::new(
            audit_actions::JOIN,
            resource_types::MEMBERSHIP,
            format!("User joined project: {}", project.name),
        )
        .actor(user.id)
        .resource(membership.id);
        AuditService::record(repo, entry, client).await;

        Ok((project, JoinOutcome::Joined(membership)))
    }

    /// Remove the caller's membership; founders cannot leave their own project
    pub async fn leave(
        repo: &dyn Repository,
        hackathon_id: &str,
        project_id: i64,
        user: &User,
        client: &ClientInfo,
    ) -> AppResult<(Project, LeaveOutcome)> {
        let (_, project) = ProjectService::get(repo, hackathon_id, project_id).await?;

        if project.is_founded_by(user.id) {
            return Err(AppError::Forbidden(
                "You cannot leave a project you own.".to_string(),
            ));
        }

        let Some(membership) = repo.find_membership(project.id, user.id).await? else {
            return Ok((project, LeaveOutcome::NotMember));
        };

        repo.delete_membership(membership.id).await?;

        let entry = AuditEntry::new(
            audit_actions::LEAVE,
            resource_types::MEMBERSHIP,
            format!("User left project: {}", project.name),
        )
        .actor(user.id)
        .resource(membership.id);
        AuditService::record(repo, entry, client).await;

        Ok((project, LeaveOutcome::Left))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::db::MockRepository;
    use crate::models::{CompanyConfiguration, ConfigurationSettings};
    use crate::test_utils::fixtures;

    fn membership(project_id: i64, user_id: Uuid) -> ProjectMembership {
        ProjectMembership {
            id: Uuid::new_v4(),
            project_id,
            user_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn repo_with_project(founder: Option<Uuid>) -> MockRepository {
        let hackathon = fixtures::hackathon(fixtures::owner().id);
        let project = fixtures::project(7, &hackathon.id, founder);

        let mut repo = MockRepository::new();
        repo.expect_find_hackathon().return_once(move |_| Ok(Some(hackathon)));
        repo.expect_find_project().return_once(move |_| Ok(Some(project)));
        repo
    }

    #[tokio::test]
    async fn test_join_creates_membership() {
        let user = fixtures::hacker();
        let user_id = user.id;

        let mut repo = repo_with_project(Some(fixtures::owner().id));
        repo.expect_is_member().return_once(|_, _| Ok(false));
        repo.expect_canonical_configuration().return_once(|| Ok(None));
        repo.expect_count_members().return_once(|_| Ok(1));
        repo.expect_create_membership()
            .once()
            .withf(move |project_id, user| *project_id == 7 && *user == user_id)
            .return_once(|project_id, user_id| Ok(membership(project_id, user_id)));
        repo.expect_insert_audit_log()
            .once()
            .withf(|row| {
                row.action == "join"
                    && row.resource_type == "project_membership"
                    && row.details == "User joined project: Robo"
            })
            .return_once(|_| Ok(()));

        let (_, outcome) = MembershipService::join(&repo, "a1b2c3d4e5f6", 7, &user, &ClientInfo::default())
            .await
            .unwrap();
        assert!(matches!(outcome, JoinOutcome::Joined(m) if m.user_id == user_id));
    }

    #[tokio::test]
    async fn test_join_twice_is_a_no_op() {
        let mut repo = repo_with_project(None);
        repo.expect_is_member().return_once(|_, _| Ok(true));
        repo.expect_create_membership().never();

        let (_, outcome) =
            MembershipService::join(&repo, "a1b2c3d4e5f6", 7, &fixtures::hacker(), &ClientInfo::default())
                .await
                .unwrap();
        assert!(matches!(outcome, JoinOutcome::AlreadyMember));
    }

    #[tokio::test]
    async fn test_join_refused_when_team_is_full() {
        let mut repo = repo_with_project(None);
        repo.expect_is_member().return_once(|_, _| Ok(false));
        repo.expect_canonical_configuration().return_once(|| {
            Ok(Some(CompanyConfiguration {
                id: Uuid::new_v4(),
                settings: ConfigurationSettings {
                    max_team_size: 2,
                    ..ConfigurationSettings::default()
                },
                created_at: Utc::now(),
                updated_at: Utc::now(),
            }))
        });
        repo.expect_count_members().return_once(|_| Ok(2));
        repo.expect_create_membership().never();

        let result =
            MembershipService::join(&repo, "a1b2c3d4e5f6", 7, &fixtures::hacker(), &ClientInfo::default()).await;
        assert!(matches!(result, Err(AppError::Conflict(msg)) if msg == MSG_TEAM_FULL));
    }

    #[tokio::test]
    async fn test_founder_cannot_leave() {
        let founder = fixtures::hacker();

        let mut repo = repo_with_project(Some(founder.id));
        repo.expect_find_membership().never();
        repo.expect_delete_membership().never();

        let result = MembershipService::leave(&repo, "a1b2c3d4e5f6", 7, &founder, &ClientInfo::default()).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_leave_removes_exactly_that_membership() {
        let user = fixtures::hacker();
        let existing = membership(7, user.id);
        let membership_id = existing.id;

        let mut repo = repo_with_project(Some(fixtures::owner().id));
        repo.expect_find_membership().return_once(move |_, _| Ok(Some(existing)));
        repo.expect_delete_membership()
            .once()
            .withf(move |id| *id == membership_id)
            .return_once(|_| Ok(()));
        repo.expect_insert_audit_log()
            .once()
            .withf(|row| row.action == "leave")
            .return_once(|_| Ok(()));

        let (_, outcome) = MembershipService::leave(&repo, "a1b2c3d4e5f6", 7, &user, &ClientInfo::default())
            .await
            .unwrap();
        assert_eq!(outcome, LeaveOutcome::Left);
    }

    #[tokio::test]
    async fn test_leave_without_membership() {
        let mut repo = repo_with_project(None);
        repo.expect_find_membership().return_once(|_, _| Ok(None));
        repo.expect_delete_membership().never();

        let (_, outcome) =
            MembershipService::leave(&repo, "a1b2c3d4e5f6", 7, &fixtures::hacker(), &ClientInfo::default())
                .await
                .unwrap();
        assert_eq!(outcome, LeaveOutcome::NotMember);
    }
}
