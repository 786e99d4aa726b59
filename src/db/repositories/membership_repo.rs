//! Project membership repository

use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Project, ProjectMember, ProjectMembership},
};

/// Repository for project membership database operations
pub struct ProjectMembershipRepository;

impl ProjectMembershipRepository {
    /// Add a user to a project
    pub async fn create(pool: &PgPool, project_id: i64, user_id: &Uuid) -> AppResult<ProjectMembership> {
        let membership = sqlx::query_as::<_, ProjectMembership>(
            r#"
            INSERT INTO project_memberships (project_id, user_id)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(membership)
    }

    /// Find the membership of a user in a project
    pub async fn find(pool: &PgPool, project_id: i64, user_id: &Uuid) -> AppResult<Option<ProjectMembership>> {
        let membership = sqlx::query_as::<_, ProjectMembership>(
            r#"SELECT * FROM project_memberships WHERE project_id = $1 AND user_id = $2"#,
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(membership)
    }

    /// Members of a project with their display fields, earliest first
    pub async fn members(pool: &PgPool, project_id: i64) -> AppResult<Vec<ProjectMember>> {
        let members = sqlx::query_as::<_, ProjectMember>(
            r#"
            SELECT u.id AS user_id, u.name, u.email, u.company_team, m.created_at AS joined_at
            FROM project_memberships m
            JOIN users u ON u.id = m.user_id
            WHERE m.project_id = $1
            ORDER BY m.created_at ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        Ok(members)
    }

    /// Count members of a project
    pub async fn count(pool: &PgPool, project_id: i64) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"SELECT COUNT(*) FROM project_memberships WHERE project_id = $1"#,
        )
        .bind(project_id)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    /// Member counts for several projects; projects without members are absent
    pub async fn counts(pool: &PgPool, project_ids: &[i64]) -> AppResult<HashMap<i64, i64>> {
        let rows: Vec<(i64, i64)> = sqlx::query_as(
            r#"
            SELECT project_id, COUNT(*)
            FROM project_memberships
            WHERE project_id = ANY($1)
            GROUP BY project_id
            "#,
        )
        .bind(project_ids)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().collect())
    }

    /// Check whether a user belongs to a project
    pub async fn is_member(pool: &PgPool, project_id: i64, user_id: &Uuid) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"SELECT EXISTS(SELECT 1 FROM project_memberships WHERE project_id = $1 AND user_id = $2)"#,
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    /// IDs of the projects in a hackathon that a user belongs to
    pub async fn project_ids_in_hackathon(
        pool: &PgPool,
        hackathon_id: &str,
        user_id: &Uuid,
    ) -> AppResult<Vec<i64>> {
        let ids: Vec<i64> = sqlx::query_scalar(
            r#"
            SELECT m.project_id
            FROM project_memberships m
            JOIN projects p ON p.id = m.project_id
            WHERE p.hackathon_id = $1 AND m.user_id = $2
            "#,
        )
        .bind(hackathon_id)
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(ids)
    }

    /// Distinct users taking part in any project of a hackathon
    pub async fn count_participants(pool: &PgPool, hackathon_id: &str) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(DISTINCT m.user_id)
            FROM project_memberships m
            JOIN projects p ON p.id = m.project_id
            WHERE p.hackathon_id = $1
            "#,
        )
        .bind(hackathon_id)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    /// Projects a user has joined, including the ones they founded
    pub async fn projects_joined_by_user(pool: &PgPool, user_id: &Uuid) -> AppResult<Vec<Project>> {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT p.*
            FROM projects p
            JOIN project_memberships m ON m.project_id = p.id
            WHERE m.user_id = $1
            ORDER BY m.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(projects)
    }

    /// Delete a membership
    pub async fn delete(pool: &PgPool, id: &Uuid) -> AppResult<()> {
        sqlx::query(r#"DELETE FROM project_memberships WHERE id = $1"#)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(())
    }
}
