//! Project model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::constants::project_statuses;

/// Project database model
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: i64,
    pub hackathon_id: String,
    /// Founder of the project
    pub user_id: Option<Uuid>,
    pub name: String,
    pub description: String,
    pub repository_url: String,
    pub demo_url: String,
    pub status: String,
    #[serde(skip_serializing)]
    pub image_data: Option<Vec<u8>>,
    pub image_content_type: Option<String>,
    pub presenting: bool,
    pub presentation_order: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Check whether the given user founded this project
    pub fn is_founded_by(&self, user_id: Uuid) -> bool {
        self.user_id == Some(user_id)
    }

    pub fn has_image(&self) -> bool {
        self.image_content_type.is_some()
            && self.image_data.as_ref().is_some_and(|data| !data.is_empty())
    }
}

/// Project status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Draft,
    Active,
    Completed,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => project_statuses::DRAFT,
            Self::Active => project_statuses::ACTIVE,
            Self::Completed => project_statuses::COMPLETED,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            project_statuses::DRAFT => Some(Self::Draft),
            project_statuses::ACTIVE => Some(Self::Active),
            project_statuses::COMPLETED => Some(Self::Completed),
            _ => None,
        }
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Uploaded project image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectImage {
    pub data: Vec<u8>,
    pub content_type: String,
}

/// Insert payload for a project
#[derive(Debug, Clone)]
pub struct NewProject {
    pub hackathon_id: String,
    pub user_id: Uuid,
    pub name: String,
    pub description: String,
    pub repository_url: String,
    pub demo_url: String,
    pub status: ProjectStatus,
    pub image: Option<ProjectImage>,
}

/// Mutable project attributes; `image: None` leaves the stored image untouched
#[derive(Debug, Clone)]
pub struct ProjectChanges {
    pub name: String,
    pub description: String,
    pub repository_url: String,
    pub demo_url: String,
    pub status: ProjectStatus,
    pub image: Option<ProjectImage>,
}

/// Project joined with its founder's display fields
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectWithFounder {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub project: Project,
    pub founder_name: Option<String>,
    pub founder_email: Option<String>,
}

/// Project joined with its hackathon's title and status
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectWithHackathon {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub project: Project,
    pub hackathon_title: String,
    pub hackathon_status: String,
}

/// Admin project list filter
#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    pub search: Option<String>,
    pub status: Option<String>,
}
