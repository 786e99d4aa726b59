//! Audit log repository

use sqlx::PgPool;

use crate::{
    error::AppResult,
    models::{AuditLog, AuditLogFilter, NewAuditLog},
};

/// Repository for the append-only audit log
pub struct AuditLogRepository;

impl AuditLogRepository {
    /// Append an entry
    pub async fn insert(pool: &PgPool, entry: &NewAuditLog) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO audit_logs (user_id, action, resource_type, resource_id, details, ip_address, user_agent)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(entry.user_id)
        .bind(&entry.action)
        .bind(&entry.resource_type)
        .bind(&entry.resource_id)
        .bind(&entry.details)
        .bind(&entry.ip_address)
        .bind(&entry.user_agent)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// List entries with pagination and optional filters, newest first
    pub async fn list(
        pool: &PgPool,
        filter: &AuditLogFilter,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<AuditLog>, i64)> {
        let search_pattern = filter.search.as_ref().map(|s| format!("%{}%", s));

        let logs = sqlx::query_as::<_, AuditLog>(
            r#"
            SELECT * FROM audit_logs
            WHERE
                ($1::text IS NULL OR action ILIKE $1 OR resource_type ILIKE $1 OR details ILIKE $1)
                AND ($2::text IS NULL OR action = $2)
                AND ($3::text IS NULL OR resource_type = $3)
            ORDER BY created_at DESC
            OFFSET $4 LIMIT $5
            "#,
        )
        .bind(&search_pattern)
        .bind(&filter.action)
        .bind(&filter.resource_type)
        .bind(offset)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM audit_logs
            WHERE
                ($1::text IS NULL OR action ILIKE $1 OR resource_type ILIKE $1 OR details ILIKE $1)
                AND ($2::text IS NULL OR action = $2)
                AND ($3::text IS NULL OR resource_type = $3)
            "#,
        )
        .bind(&search_pattern)
        .bind(&filter.action)
        .bind(&filter.resource_type)
        .fetch_one(pool)
        .await?;

        Ok((logs, count))
    }
}
