//! Hackathon repository

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    constants::hackathon_statuses,
    error::AppResult,
    models::{Hackathon, HackathonChanges, HackathonFilter, NewHackathon},
};

/// Repository for hackathon database operations
pub struct HackathonRepository;

impl HackathonRepository {
    /// Create a new hackathon
    pub async fn create(pool: &PgPool, hackathon: &NewHackathon) -> AppResult<Hackathon> {
        let hackathon = sqlx::query_as::<_, Hackathon>(
            r#"
            INSERT INTO hackathons (id, title, description, start_date, end_date, status, owner_id, schedule)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(&hackathon.id)
        .bind(&hackathon.title)
        .bind(&hackathon.description)
        .bind(hackathon.start_date)
        .bind(hackathon.end_date)
        .bind(hackathon.status.as_str())
        .bind(hackathon.owner_id)
        .bind(&hackathon.schedule)
        .fetch_one(pool)
        .await?;

        Ok(hackathon)
    }

    /// Find hackathon by ID
    pub async fn find_by_id(pool: &PgPool, id: &str) -> AppResult<Option<Hackathon>> {
        let hackathon = sqlx::query_as::<_, Hackathon>(r#"SELECT * FROM hackathons WHERE id = $1"#)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(hackathon)
    }

    /// Hackathons owned by a user
    pub async fn find_by_owner(pool: &PgPool, owner_id: &Uuid) -> AppResult<Vec<Hackathon>> {
        let hackathons = sqlx::query_as::<_, Hackathon>(
            r#"SELECT * FROM hackathons WHERE owner_id = $1 ORDER BY start_date DESC"#,
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await?;

        Ok(hackathons)
    }

    /// Most recently created hackathons
    pub async fn recent(pool: &PgPool, limit: i64) -> AppResult<Vec<Hackathon>> {
        let hackathons = sqlx::query_as::<_, Hackathon>(
            r#"SELECT * FROM hackathons ORDER BY created_at DESC LIMIT $1"#,
        )
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(hackathons)
    }

    /// Upcoming or active hackathons that publish a schedule, soonest first
    pub async fn active_with_schedule(pool: &PgPool) -> AppResult<Vec<Hackathon>> {
        let hackathons = sqlx::query_as::<_, Hackathon>(
            r#"
            SELECT * FROM hackathons
            WHERE status IN ($1, $2) AND schedule IS NOT NULL AND schedule <> ''
            ORDER BY start_date ASC
            "#,
        )
        .bind(hackathon_statuses::UPCOMING)
        .bind(hackathon_statuses::ACTIVE)
        .fetch_all(pool)
        .await?;

        Ok(hackathons)
    }

    /// IDs of upcoming or active hackathons
    pub async fn active_ids(pool: &PgPool) -> AppResult<Vec<String>> {
        let ids: Vec<String> = sqlx::query_scalar(
            r#"SELECT id FROM hackathons WHERE status IN ($1, $2)"#,
        )
        .bind(hackathon_statuses::ACTIVE)
        .bind(hackathon_statuses::UPCOMING)
        .fetch_all(pool)
        .await?;

        Ok(ids)
    }

    /// List hackathons with pagination and optional filters, latest start first
    pub async fn list(
        pool: &PgPool,
        filter: &HackathonFilter,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Hackathon>, i64)> {
        let search_pattern = filter.search.as_ref().map(|s| format!("%{}%", s));

        let hackathons = sqlx::query_as::<_, Hackathon>(
            r#"
            SELECT * FROM hackathons
            WHERE
                ($1::text IS NULL OR title ILIKE $1 OR description ILIKE $1)
                AND ($2::text IS NULL OR status = $2)
            ORDER BY start_date DESC
            OFFSET $3 LIMIT $4
            "#,
        )
        .bind(&search_pattern)
        .bind(&filter.status)
        .bind(offset)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM hackathons
            WHERE
                ($1::text IS NULL OR title ILIKE $1 OR description ILIKE $1)
                AND ($2::text IS NULL OR status = $2)
            "#,
        )
        .bind(&search_pattern)
        .bind(&filter.status)
        .fetch_one(pool)
        .await?;

        Ok((hackathons, count))
    }

    /// Every hackathon that is not hidden
    pub async fn visible(pool: &PgPool) -> AppResult<Vec<Hackathon>> {
        let hackathons = sqlx::query_as::<_, Hackathon>(
            r#"SELECT * FROM hackathons WHERE status <> $1 ORDER BY start_date DESC"#,
        )
        .bind(hackathon_statuses::HIDDEN)
        .fetch_all(pool)
        .await?;

        Ok(hackathons)
    }

    /// Update hackathon
    pub async fn update(pool: &PgPool, id: &str, changes: &HackathonChanges) -> AppResult<Hackathon> {
        let hackathon = sqlx::query_as::<_, Hackathon>(
            r#"
            UPDATE hackathons
            SET
                title = $2,
                description = $3,
                start_date = $4,
                end_date = $5,
                status = $6,
                schedule = $7,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.title)
        .bind(&changes.description)
        .bind(changes.start_date)
        .bind(changes.end_date)
        .bind(changes.status.as_str())
        .bind(&changes.schedule)
        .fetch_one(pool)
        .await?;

        Ok(hackathon)
    }

    /// Delete hackathon
    pub async fn delete(pool: &PgPool, id: &str) -> AppResult<()> {
        sqlx::query(r#"DELETE FROM hackathons WHERE id = $1"#)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Count total hackathons
    pub async fn count(pool: &PgPool) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM hackathons"#)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}
