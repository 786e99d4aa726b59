//! Project membership model

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Link between a user and a project they joined
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectMembership {
    pub id: Uuid,
    pub project_id: i64,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Member listing row for a project page
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectMember {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub company_team: String,
    pub joined_at: DateTime<Utc>,
}
