//! Project service
//!
//! Projects live under a hackathon. The founder is the only user allowed to
//! edit a project or change whether it is presenting.

use std::collections::HashMap;

use serde::Serialize;

use crate::{
    constants::{audit_actions, resource_types},
    db::Repository,
    error::{AppError, AppResult},
    models::{
        ClientInfo, FileInfo, Hackathon, NewProject, Project, ProjectChanges, ProjectImage,
        ProjectMember, ProjectStatus, ProjectWithFounder, User,
    },
    services::{
        audit_service::{AuditEntry, AuditService},
        ConfigurationService,
    },
    validation::{self, fields, FieldErrors},
};

pub const MSG_NOT_FOUNDER: &str = "You can only edit your own projects.";
pub const MSG_NO_IMAGE: &str = "No image selected";

/// Submitted project fields
#[derive(Debug, Clone, Default)]
pub struct ProjectDraft {
    pub name: String,
    pub description: String,
    pub repository_url: String,
    pub demo_url: String,
    pub status: String,
    pub image: Option<ProjectImage>,
}

impl ProjectDraft {
    pub fn from_project(project: &Project) -> Self {
        Self {
            name: project.name.clone(),
            description: project.description.clone(),
            repository_url: project.repository_url.clone(),
            demo_url: project.demo_url.clone(),
            status: project.status.clone(),
            image: None,
        }
    }
}

/// Projects of a hackathon with their team sizes
#[derive(Debug, Serialize)]
pub struct ProjectIndex {
    pub hackathon: Hackathon,
    pub projects: Vec<ProjectWithFounder>,
    pub member_counts: HashMap<i64, i64>,
}

/// Everything the project page shows
#[derive(Debug, Serialize)]
pub struct ProjectDetails {
    pub hackathon: Hackathon,
    pub project: Project,
    pub files: Vec<FileInfo>,
    pub members: Vec<ProjectMember>,
    pub is_member: bool,
    pub is_founder: bool,
}

/// Project service
pub struct ProjectService;

impl ProjectService {
    pub async fn index(repo: &dyn Repository, hackathon_id: &str) -> AppResult<ProjectIndex> {
        let hackathon = Self::hackathon(repo, hackathon_id).await?;
        let projects = repo.projects_by_hackathon(&hackathon.id).await?;
        let ids: Vec<i64> = projects.iter().map(|p| p.project.id).collect();
        let member_counts = repo.member_counts(&ids).await?;

        Ok(ProjectIndex {
            hackathon,
            projects,
            member_counts,
        })
    }

    pub async fn details(
        repo: &dyn Repository,
        hackathon_id: &str,
        project_id: i64,
        viewer: &User,
    ) -> AppResult<ProjectDetails> {
        let (hackathon, project) = Self::get(repo, hackathon_id, project_id).await?;
        let files = repo.files_by_project(project.id).await?;
        let members = repo.project_members(project.id).await?;
        let is_member = members.iter().any(|m| m.user_id == viewer.id);

        Ok(ProjectDetails {
            is_founder: project.is_founded_by(viewer.id),
            hackathon,
            project,
            files,
            members,
            is_member,
        })
    }

    /// The project, provided it belongs to the hackathon in the path
    pub async fn get(
        repo: &dyn Repository,
        hackathon_id: &str,
        project_id: i64,
    ) -> AppResult<(Hackathon, Project)> {
        let hackathon = Self::hackathon(repo, hackathon_id).await?;
        let project = repo
            .find_project(project_id)
            .await?
            .filter(|project| project.hackathon_id == hackathon.id)
            .ok_or_else(|| AppError::not_found("Project"))?;
        Ok((hackathon, project))
    }

    /// The project if `actor` founded it
    pub async fn editable(
        repo: &dyn Repository,
        hackathon_id: &str,
        project_id: i64,
        actor: &User,
    ) -> AppResult<(Hackathon, Project)> {
        let (hackathon, project) = Self::get(repo, hackathon_id, project_id).await?;
        if !project.is_founded_by(actor.id) {
            return Err(AppError::Forbidden(MSG_NOT_FOUNDER.to_string()));
        }
        Ok((hackathon, project))
    }

    pub async fn hackathon(repo: &dyn Repository, hackathon_id: &str) -> AppResult<Hackathon> {
        repo.find_hackathon(hackathon_id)
            .await?
            .ok_or_else(|| AppError::not_found("Hackathon"))
    }

    /// Create a project and enrol its founder
    pub async fn create(
        repo: &dyn Repository,
        hackathon_id: &str,
        draft: ProjectDraft,
        founder: &User,
        max_image_bytes: usize,
        client: &ClientInfo,
    ) -> AppResult<Project> {
        let hackathon = Self::hackathon(repo, hackathon_id).await?;

        let mut errors = validation::project::validate(&draft.name, &draft.description, &hackathon.id, &draft.status);
        errors.merge(validation::project::validate_create(repo, &hackathon.id, Some(founder.id)).await?);
        let image = Self::accepted_image(repo, draft.image, max_image_bytes, &mut errors).await?;
        errors.into_result()?;

        let project = repo
            .create_project_with_founder(NewProject {
                hackathon_id: hackathon.id,
                user_id: founder.id,
                name: draft.name.trim().to_string(),
                description: draft.description.trim().to_string(),
                repository_url: draft.repository_url.trim().to_string(),
                demo_url: draft.demo_url.trim().to_string(),
                status: Self::status(&draft.status)?,
                image,
            })
            .await?;

        let entry = AuditEntry::new(
            audit_actions::CREATE,
            resource_types::PROJECT,
            format!("Project created: {}", project.name),
        )
        .actor(founder.id)
        .resource(project.id);
        AuditService::record(repo, entry, client).await;

        Ok(project)
    }

    pub async fn update(
        repo: &dyn Repository,
        hackathon_id: &str,
        project_id: i64,
        draft: ProjectDraft,
        actor: &User,
        max_image_bytes: usize,
        client: &ClientInfo,
    ) -> AppResult<Project> {
        let (hackathon, project) = Self::editable(repo, hackathon_id, project_id, actor).await?;

        let mut errors = validation::project::validate(&draft.name, &draft.description, &hackathon.id, &draft.status);
        errors.merge(validation::project::validate_update());
        let image = Self::accepted_image(repo, draft.image, max_image_bytes, &mut errors).await?;
        errors.into_result()?;

        let project = repo
            .update_project(
                project.id,
                ProjectChanges {
                    name: draft.name.trim().to_string(),
                    description: draft.description.trim().to_string(),
                    repository_url: draft.repository_url.trim().to_string(),
                    demo_url: draft.demo_url.trim().to_string(),
                    status: Self::status(&draft.status)?,
                    image,
                },
            )
            .await?;

        let entry = AuditEntry::new(
            audit_actions::UPDATE,
            resource_types::PROJECT,
            format!("Project updated: {}", project.name),
        )
        .actor(actor.id)
        .resource(project.id);
        AuditService::record(repo, entry, client).await;

        Ok(project)
    }

    /// Replace the project image
    pub async fn update_image(
        repo: &dyn Repository,
        hackathon_id: &str,
        project_id: i64,
        image: Option<ProjectImage>,
        actor: &User,
        max_image_bytes: usize,
        client: &ClientInfo,
    ) -> AppResult<Project> {
        let (_, project) = Self::editable(repo, hackathon_id, project_id, actor).await?;

        let image = image
            .ok_or_else(|| AppError::Invalid(FieldErrors::single(fields::IMAGE, MSG_NO_IMAGE)))?;
        validation::file::validate_image(&image.content_type, image.data.len(), max_image_bytes)
            .into_result()?;

        let project = repo.update_project_image(project.id, image).await?;

        let entry = AuditEntry::new(
            audit_actions::UPDATE,
            resource_types::PROJECT,
            format!("Project image updated: {}", project.name),
        )
        .actor(actor.id)
        .resource(project.id);
        AuditService::record(repo, entry, client).await;

        Ok(project)
    }

    /// Stored image of a project
    pub async fn image(repo: &dyn Repository, hackathon_id: &str, project_id: i64) -> AppResult<ProjectImage> {
        let (_, project) = Self::get(repo, hackathon_id, project_id).await?;
        match (project.image_data, project.image_content_type) {
            (Some(data), Some(content_type)) if !data.is_empty() => Ok(ProjectImage { data, content_type }),
            _ => Err(AppError::not_found("Image")),
        }
    }

    /// Flip the presenting flag; presenting projects are ordered by the time they started
    pub async fn toggle_presenting(
        repo: &dyn Repository,
        hackathon_id: &str,
        project_id: i64,
        actor: &User,
        client: &ClientInfo,
    ) -> AppResult<Project> {
        let (_, project) = Self::get(repo, hackathon_id, project_id).await?;
        if !project.is_founded_by(actor.id) {
            return Err(AppError::Forbidden(
                "Only the project founder can toggle presenting status".to_string(),
            ));
        }

        let project = repo.set_presenting(project.id, !project.presenting).await?;

        let action = if project.presenting {
            audit_actions::SET_PRESENTING
        } else {
            audit_actions::UNSET_PRESENTING
        };
        let entry = AuditEntry::new(
            action,
            resource_types::PROJECT,
            format!("Project presenting status changed: {}", project.name),
        )
        .actor(actor.id)
        .resource(project.id);
        AuditService::record(repo, entry, client).await;

        Ok(project)
    }

    /// Validate an optional image; images are dropped while project images are disabled
    async fn accepted_image(
        repo: &dyn Repository,
        image: Option<ProjectImage>,
        max_image_bytes: usize,
        errors: &mut FieldErrors,
    ) -> AppResult<Option<ProjectImage>> {
        let Some(image) = image else {
            return Ok(None);
        };
        if !ConfigurationService::settings(repo).await?.project_images_enabled {
            return Ok(None);
        }

        let image_errors =
            validation::file::validate_image(&image.content_type, image.data.len(), max_image_bytes);
        if image_errors.is_empty() {
            Ok(Some(image))
        } else {
            errors.merge(image_errors);
            Ok(None)
        }
    }

    fn status(status: &str) -> AppResult<ProjectStatus> {
        ProjectStatus::parse(status)
            .ok_or_else(|| AppError::Invalid(FieldErrors::single(fields::STATUS, "Invalid status")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MockRepository;
    use crate::error::DUPLICATE_PROJECT_MESSAGE;
    use crate::models::ClientInfo;
    use crate::test_utils::fixtures;

    const MAX_IMAGE: usize = 5 * 1024 * 1024;

    fn draft() -> ProjectDraft {
        ProjectDraft {
            name: "Robo".to_string(),
            description: "Builds robots".to_string(),
            repository_url: "https://git.example.com/robo".to_string(),
            demo_url: String::new(),
            status: "active".to_string(),
            image: None,
        }
    }

    #[tokio::test]
    async fn test_create_enrols_founder() {
        let founder = fixtures::hacker();
        let founder_id = founder.id;
        let hackathon = fixtures::hackathon(fixtures::owner().id);

        let mut repo = MockRepository::new();
        repo.expect_find_hackathon().return_once(move |_| Ok(Some(hackathon)));
        repo.expect_user_has_project_in_hackathon()
            .once()
            .withf(move |hackathon_id, user| hackathon_id == "a1b2c3d4e5f6" && *user == founder_id)
            .return_once(|_, _| Ok(false));
        repo.expect_create_project_with_founder()
            .once()
            .withf(move |p| p.user_id == founder_id && p.status == ProjectStatus::Active)
            .return_once(move |p| Ok(fixtures::project(7, &p.hackathon_id, Some(p.user_id))));
        repo.expect_insert_audit_log()
            .once()
            .withf(|row| row.resource_id.as_deref() == Some("7") && row.details == "Project created: Robo")
            .return_once(|_| Ok(()));

        let project = ProjectService::create(&repo, "a1b2c3d4e5f6", draft(), &founder, MAX_IMAGE, &ClientInfo::default())
            .await
            .unwrap();
        assert!(project.is_founded_by(founder_id));
    }

    #[tokio::test]
    async fn test_second_project_in_same_hackathon_fails_on_user_id() {
        let founder = fixtures::hacker();
        let hackathon = fixtures::hackathon(fixtures::owner().id);

        let mut repo = MockRepository::new();
        repo.expect_find_hackathon().return_once(move |_| Ok(Some(hackathon)));
        repo.expect_user_has_project_in_hackathon().return_once(|_, _| Ok(true));
        repo.expect_create_project_with_founder().never();

        let result =
            ProjectService::create(&repo, "a1b2c3d4e5f6", draft(), &founder, MAX_IMAGE, &ClientInfo::default()).await;
        match result {
            Err(AppError::Invalid(errors)) => {
                assert_eq!(errors.get("user_id"), [DUPLICATE_PROJECT_MESSAGE.to_string()]);
            }
            other => panic!("expected a validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_oversized_image_is_rejected() {
        let founder = fixtures::hacker();
        let hackathon = fixtures::hackathon(fixtures::owner().id);

        let mut repo = MockRepository::new();
        repo.expect_find_hackathon().return_once(move |_| Ok(Some(hackathon)));
        repo.expect_user_has_project_in_hackathon().return_once(|_, _| Ok(false));
        repo.expect_canonical_configuration().return_once(|| Ok(None));
        repo.expect_create_project_with_founder().never();

        let mut with_image = draft();
        with_image.image = Some(ProjectImage {
            data: vec![0; MAX_IMAGE + 1],
            content_type: "image/png".to_string(),
        });

        let result =
            ProjectService::create(&repo, "a1b2c3d4e5f6", with_image, &founder, MAX_IMAGE, &ClientInfo::default())
                .await;
        assert!(matches!(result, Err(AppError::Invalid(errors)) if errors.has("image")));
    }

    #[tokio::test]
    async fn test_only_founder_may_edit() {
        let hackathon = fixtures::hackathon(fixtures::owner().id);
        let project = fixtures::project(7, &hackathon.id, Some(fixtures::owner().id));

        let mut repo = MockRepository::new();
        repo.expect_find_hackathon().return_once(move |_| Ok(Some(hackathon)));
        repo.expect_find_project().return_once(move |_| Ok(Some(project)));
        repo.expect_update_project().never();

        let result = ProjectService::update(
            &repo,
            "a1b2c3d4e5f6",
            7,
            draft(),
            &fixtures::hacker(),
            MAX_IMAGE,
            &ClientInfo::default(),
        )
        .await;
        assert!(matches!(result, Err(AppError::Forbidden(msg)) if msg == MSG_NOT_FOUNDER));
    }

    #[tokio::test]
    async fn test_project_from_other_hackathon_is_not_found() {
        let hackathon = fixtures::hackathon(fixtures::owner().id);
        let project = fixtures::project(7, "ffffffffffff", None);

        let mut repo = MockRepository::new();
        repo.expect_find_hackathon().return_once(move |_| Ok(Some(hackathon)));
        repo.expect_find_project().return_once(move |_| Ok(Some(project)));

        let result = ProjectService::get(&repo, "a1b2c3d4e5f6", 7).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_toggle_presenting_stamps_and_audits() {
        let founder = fixtures::hacker();
        let hackathon = fixtures::hackathon(fixtures::owner().id);
        let project = fixtures::project(7, &hackathon.id, Some(founder.id));

        let mut repo = MockRepository::new();
        repo.expect_find_hackathon().return_once(move |_| Ok(Some(hackathon)));
        repo.expect_find_project().return_once(move |_| Ok(Some(project)));
        repo.expect_set_presenting()
            .once()
            .withf(|id, presenting| *id == 7 && *presenting)
            .return_once(|id, presenting| {
                let mut project = fixtures::project(id, "a1b2c3d4e5f6", None);
                project.presenting = presenting;
                project.presentation_order = Some(chrono::Utc::now());
                Ok(project)
            });
        repo.expect_insert_audit_log()
            .once()
            .withf(|row| row.action == "set_presenting")
            .return_once(|_| Ok(()));

        let project = ProjectService::toggle_presenting(&repo, "a1b2c3d4e5f6", 7, &founder, &ClientInfo::default())
            .await
            .unwrap();
        assert!(project.presenting && project.presentation_order.is_some());
    }

    #[tokio::test]
    async fn test_toggle_presenting_forbidden_for_non_founder() {
        let hackathon = fixtures::hackathon(fixtures::owner().id);
        let project = fixtures::project(7, &hackathon.id, Some(fixtures::owner().id));

        let mut repo = MockRepository::new();
        repo.expect_find_hackathon().return_once(move |_| Ok(Some(hackathon)));
        repo.expect_find_project().return_once(move |_| Ok(Some(project)));
        repo.expect_set_presenting().never();

        let result =
            ProjectService::toggle_presenting(&repo, "a1b2c3d4e5f6", 7, &fixtures::hacker(), &ClientInfo::default())
                .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }
}
