//! Uploaded file model

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Stored file including its content
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct File {
    pub id: String,
    pub filename: String,
    #[serde(skip_serializing)]
    pub data: Vec<u8>,
    pub content_type: String,
    pub size: i64,
    pub user_id: Uuid,
    pub hackathon_id: Option<String>,
    pub project_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// File metadata without the content column
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FileInfo {
    pub id: String,
    pub filename: String,
    pub content_type: String,
    pub size: i64,
    pub user_id: Uuid,
    pub hackathon_id: Option<String>,
    pub project_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl From<&File> for FileInfo {
    fn from(file: &File) -> Self {
        Self {
            id: file.id.clone(),
            filename: file.filename.clone(),
            content_type: file.content_type.clone(),
            size: file.size,
            user_id: file.user_id,
            hackathon_id: file.hackathon_id.clone(),
            project_id: file.project_id,
            created_at: file.created_at,
        }
    }
}

/// Insert payload for a file
#[derive(Debug, Clone)]
pub struct NewFile {
    pub id: String,
    pub filename: String,
    pub data: Vec<u8>,
    pub content_type: String,
    pub user_id: Uuid,
    pub hackathon_id: Option<String>,
    pub project_id: Option<i64>,
}
