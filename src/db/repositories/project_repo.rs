//! Project repository

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    constants::{hackathon_statuses, project_statuses},
    error::AppResult,
    models::{
        NewProject, Project, ProjectChanges, ProjectFilter, ProjectImage, ProjectWithFounder,
        ProjectWithHackathon,
    },
};

const WITH_FOUNDER: &str = r#"
    SELECT p.*, u.name AS founder_name, u.email AS founder_email
    FROM projects p
    LEFT JOIN users u ON u.id = p.user_id
"#;

const WITH_HACKATHON: &str = r#"
    SELECT p.*, h.title AS hackathon_title, h.status AS hackathon_status
    FROM projects p
    JOIN hackathons h ON h.id = p.hackathon_id
"#;

/// Repository for project database operations
pub struct ProjectRepository;

impl ProjectRepository {
    /// Create a project and enrol its founder as the first member, atomically
    pub async fn create_with_founder(pool: &PgPool, project: &NewProject) -> AppResult<Project> {
        let mut tx = pool.begin().await?;

        let (image_data, image_content_type) = match &project.image {
            Some(image) => (Some(image.data.as_slice()), Some(image.content_type.as_str())),
            None => (None, None),
        };

        let created = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (
                hackathon_id, user_id, name, description, repository_url, demo_url,
                status, image_data, image_content_type
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(&project.hackathon_id)
        .bind(project.user_id)
        .bind(&project.name)
        .bind(&project.description)
        .bind(&project.repository_url)
        .bind(&project.demo_url)
        .bind(project.status.as_str())
        .bind(image_data)
        .bind(image_content_type)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(r#"INSERT INTO project_memberships (project_id, user_id) VALUES ($1, $2)"#)
            .bind(created.id)
            .bind(project.user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    /// Find project by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> AppResult<Option<Project>> {
        let project = sqlx::query_as::<_, Project>(r#"SELECT * FROM projects WHERE id = $1"#)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(project)
    }

    /// All projects in a hackathon with their founders, newest first
    pub async fn find_by_hackathon(pool: &PgPool, hackathon_id: &str) -> AppResult<Vec<ProjectWithFounder>> {
        let sql = format!("{WITH_FOUNDER} WHERE p.hackathon_id = $1 ORDER BY p.created_at DESC");
        let projects = sqlx::query_as::<_, ProjectWithFounder>(&sql)
            .bind(hackathon_id)
            .fetch_all(pool)
            .await?;

        Ok(projects)
    }

    /// One page of a hackathon's projects, newest first
    pub async fn find_by_hackathon_paginated(
        pool: &PgPool,
        hackathon_id: &str,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<ProjectWithFounder>, i64)> {
        let sql = format!(
            "{WITH_FOUNDER} WHERE p.hackathon_id = $1 ORDER BY p.created_at DESC OFFSET $2 LIMIT $3"
        );
        let projects = sqlx::query_as::<_, ProjectWithFounder>(&sql)
            .bind(hackathon_id)
            .bind(offset)
            .bind(limit)
            .fetch_all(pool)
            .await?;

        let count = Self::count_in_hackathon(pool, hackathon_id).await?;

        Ok((projects, count))
    }

    /// Projects founded by a user
    pub async fn find_by_user(pool: &PgPool, user_id: &Uuid) -> AppResult<Vec<Project>> {
        let projects = sqlx::query_as::<_, Project>(
            r#"SELECT * FROM projects WHERE user_id = $1 ORDER BY created_at DESC"#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(projects)
    }

    /// Projects founded by a user along with their hackathon
    pub async fn find_by_user_with_hackathon(
        pool: &PgPool,
        user_id: &Uuid,
    ) -> AppResult<Vec<ProjectWithHackathon>> {
        let sql = format!("{WITH_HACKATHON} WHERE p.user_id = $1 ORDER BY p.created_at DESC");
        let projects = sqlx::query_as::<_, ProjectWithHackathon>(&sql)
            .bind(user_id)
            .fetch_all(pool)
            .await?;

        Ok(projects)
    }

    /// Presenting projects of a hackathon in presentation order
    pub async fn find_presenting_by_hackathon(
        pool: &PgPool,
        hackathon_id: &str,
    ) -> AppResult<Vec<ProjectWithFounder>> {
        let sql = format!(
            "{WITH_FOUNDER} WHERE p.hackathon_id = $1 AND p.presenting = true \
             ORDER BY p.presentation_order ASC"
        );
        let projects = sqlx::query_as::<_, ProjectWithFounder>(&sql)
            .bind(hackathon_id)
            .fetch_all(pool)
            .await?;

        Ok(projects)
    }

    /// Presenting projects across upcoming and active hackathons
    pub async fn find_presenting_from_active(pool: &PgPool) -> AppResult<Vec<ProjectWithHackathon>> {
        let sql = format!(
            "{WITH_HACKATHON} WHERE p.presenting = true AND h.status IN ($1, $2) \
             ORDER BY p.presentation_order ASC"
        );
        let projects = sqlx::query_as::<_, ProjectWithHackathon>(&sql)
            .bind(hackathon_statuses::ACTIVE)
            .bind(hackathon_statuses::UPCOMING)
            .fetch_all(pool)
            .await?;

        Ok(projects)
    }

    /// Most recently created projects
    pub async fn recent(pool: &PgPool, limit: i64) -> AppResult<Vec<ProjectWithHackathon>> {
        let sql = format!("{WITH_HACKATHON} ORDER BY p.created_at DESC LIMIT $1");
        let projects = sqlx::query_as::<_, ProjectWithHackathon>(&sql)
            .bind(limit)
            .fetch_all(pool)
            .await?;

        Ok(projects)
    }

    /// Every project, newest first
    pub async fn all(pool: &PgPool) -> AppResult<Vec<Project>> {
        let projects = sqlx::query_as::<_, Project>(r#"SELECT * FROM projects ORDER BY created_at DESC"#)
            .fetch_all(pool)
            .await?;

        Ok(projects)
    }

    /// List projects with pagination and optional filters
    pub async fn list(
        pool: &PgPool,
        filter: &ProjectFilter,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<ProjectWithHackathon>, i64)> {
        let search_pattern = filter.search.as_ref().map(|s| format!("%{}%", s));

        let sql = format!(
            r#"{WITH_HACKATHON}
            WHERE
                ($1::text IS NULL OR p.name ILIKE $1 OR p.description ILIKE $1)
                AND ($2::text IS NULL OR p.status = $2)
            ORDER BY p.created_at DESC
            OFFSET $3 LIMIT $4"#
        );
        let projects = sqlx::query_as::<_, ProjectWithHackathon>(&sql)
            .bind(&search_pattern)
            .bind(&filter.status)
            .bind(offset)
            .bind(limit)
            .fetch_all(pool)
            .await?;

        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM projects
            WHERE
                ($1::text IS NULL OR name ILIKE $1 OR description ILIKE $1)
                AND ($2::text IS NULL OR status = $2)
            "#,
        )
        .bind(&search_pattern)
        .bind(&filter.status)
        .fetch_one(pool)
        .await?;

        Ok((projects, count))
    }

    /// Check whether a user already founded a project in a hackathon
    pub async fn exists_for_user_in_hackathon(
        pool: &PgPool,
        hackathon_id: &str,
        user_id: &Uuid,
    ) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"SELECT EXISTS(SELECT 1 FROM projects WHERE hackathon_id = $1 AND user_id = $2)"#,
        )
        .bind(hackathon_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    /// Update project details; the stored image is replaced only when a new one is given
    pub async fn update(pool: &PgPool, id: i64, changes: &ProjectChanges) -> AppResult<Project> {
        let (image_data, image_content_type) = match &changes.image {
            Some(image) => (Some(image.data.as_slice()), Some(image.content_type.as_str())),
            None => (None, None),
        };

        let project = sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects
            SET
                name = $2,
                description = $3,
                repository_url = $4,
                demo_url = $5,
                status = $6,
                image_data = COALESCE($7, image_data),
                image_content_type = COALESCE($8, image_content_type),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.description)
        .bind(&changes.repository_url)
        .bind(&changes.demo_url)
        .bind(changes.status.as_str())
        .bind(image_data)
        .bind(image_content_type)
        .fetch_one(pool)
        .await?;

        Ok(project)
    }

    /// Replace only the project image
    pub async fn update_image(pool: &PgPool, id: i64, image: &ProjectImage) -> AppResult<Project> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects
            SET image_data = $2, image_content_type = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&image.data)
        .bind(&image.content_type)
        .fetch_one(pool)
        .await?;

        Ok(project)
    }

    /// Set the presenting flag, stamping or clearing the presentation order
    pub async fn set_presenting(pool: &PgPool, id: i64, presenting: bool) -> AppResult<Project> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects
            SET
                presenting = $2,
                presentation_order = CASE WHEN $2 THEN NOW() ELSE NULL END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(presenting)
        .fetch_one(pool)
        .await?;

        Ok(project)
    }

    /// Count total projects
    pub async fn count(pool: &PgPool) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM projects"#)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Count projects whose status is active
    pub async fn count_active(pool: &PgPool) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM projects WHERE status = $1"#)
            .bind(project_statuses::ACTIVE)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Count presenting projects in upcoming or active hackathons
    pub async fn count_presenting(pool: &PgPool) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM projects
            WHERE presenting = true
                AND hackathon_id IN (SELECT id FROM hackathons WHERE status IN ($1, $2))
            "#,
        )
        .bind(hackathon_statuses::ACTIVE)
        .bind(hackathon_statuses::UPCOMING)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    /// Count projects in a hackathon
    pub async fn count_in_hackathon(pool: &PgPool, hackathon_id: &str) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM projects WHERE hackathon_id = $1"#)
            .bind(hackathon_id)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Count active projects in a hackathon
    pub async fn count_active_in_hackathon(pool: &PgPool, hackathon_id: &str) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"SELECT COUNT(*) FROM projects WHERE hackathon_id = $1 AND status = $2"#,
        )
        .bind(hackathon_id)
        .bind(project_statuses::ACTIVE)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }
}
