//! Project form DTOs

use serde::Serialize;

use crate::{
    constants::project_statuses,
    models::{Project, ProjectImage},
    services::project_service::ProjectDraft,
    utils::MultipartForm,
};

/// Text fields of the project form, echoed back when it is re-rendered
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectForm {
    pub name: String,
    pub description: String,
    pub repository_url: String,
    pub demo_url: String,
    pub status: String,
}

impl ProjectForm {
    pub fn blank() -> Self {
        Self {
            status: project_statuses::DRAFT.to_string(),
            ..Self::default()
        }
    }

    pub fn from_project(project: &Project) -> Self {
        let draft = ProjectDraft::from_project(project);
        Self {
            name: draft.name,
            description: draft.description,
            repository_url: draft.repository_url,
            demo_url: draft.demo_url,
            status: draft.status,
        }
    }

    /// Split a multipart body into echoed fields and a service draft
    pub fn read(mut multipart: MultipartForm) -> (Self, ProjectDraft) {
        let form = Self {
            name: multipart.text("name").to_string(),
            description: multipart.text("description").to_string(),
            repository_url: multipart.text("repository_url").to_string(),
            demo_url: multipart.text("demo_url").to_string(),
            status: multipart
                .optional_text("status")
                .unwrap_or(project_statuses::DRAFT)
                .to_string(),
        };
        let image = take_image(&mut multipart);

        let draft = ProjectDraft {
            name: form.name.clone(),
            description: form.description.clone(),
            repository_url: form.repository_url.clone(),
            demo_url: form.demo_url.clone(),
            status: form.status.clone(),
            image,
        };
        (form, draft)
    }
}

/// The `image` part of a project form, if one was chosen
pub fn take_image(multipart: &mut MultipartForm) -> Option<ProjectImage> {
    multipart.take_file("image").map(|file| ProjectImage {
        data: file.data,
        content_type: file.content_type,
    })
}
