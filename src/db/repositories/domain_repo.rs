//! Allowed email domain repository

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{CompanyAllowedDomain, DomainAttributes},
};

/// Repository for the registration domain allow-list
pub struct CompanyAllowedDomainRepository;

impl CompanyAllowedDomainRepository {
    /// Check a domain against the allow-list; an empty active list allows everything
    pub async fn is_allowed(pool: &PgPool, domain: &str) -> AppResult<bool> {
        let allowed: bool = sqlx::query_scalar(
            r#"
            SELECT
                NOT EXISTS(SELECT 1 FROM company_allowed_domains WHERE is_active = true)
                OR EXISTS(
                    SELECT 1 FROM company_allowed_domains
                    WHERE is_active = true AND LOWER(domain) = LOWER($1)
                )
            "#,
        )
        .bind(domain)
        .fetch_one(pool)
        .await?;

        Ok(allowed)
    }

    /// Active domains in alphabetical order
    pub async fn active(pool: &PgPool) -> AppResult<Vec<CompanyAllowedDomain>> {
        let domains = sqlx::query_as::<_, CompanyAllowedDomain>(
            r#"SELECT * FROM company_allowed_domains WHERE is_active = true ORDER BY domain ASC"#,
        )
        .fetch_all(pool)
        .await?;

        Ok(domains)
    }

    /// Every domain in alphabetical order
    pub async fn all(pool: &PgPool) -> AppResult<Vec<CompanyAllowedDomain>> {
        let domains = sqlx::query_as::<_, CompanyAllowedDomain>(
            r#"SELECT * FROM company_allowed_domains ORDER BY domain ASC"#,
        )
        .fetch_all(pool)
        .await?;

        Ok(domains)
    }

    /// Find domain by ID
    pub async fn find_by_id(pool: &PgPool, id: &Uuid) -> AppResult<Option<CompanyAllowedDomain>> {
        let domain = sqlx::query_as::<_, CompanyAllowedDomain>(
            r#"SELECT * FROM company_allowed_domains WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(domain)
    }

    /// Add a domain
    pub async fn create(pool: &PgPool, attrs: &DomainAttributes) -> AppResult<CompanyAllowedDomain> {
        let domain = sqlx::query_as::<_, CompanyAllowedDomain>(
            r#"
            INSERT INTO company_allowed_domains (domain, is_active, description)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&attrs.domain)
        .bind(attrs.is_active)
        .bind(&attrs.description)
        .fetch_one(pool)
        .await?;

        Ok(domain)
    }

    /// Update a domain
    pub async fn update(pool: &PgPool, id: &Uuid, attrs: &DomainAttributes) -> AppResult<CompanyAllowedDomain> {
        let domain = sqlx::query_as::<_, CompanyAllowedDomain>(
            r#"
            UPDATE company_allowed_domains
            SET domain = $2, is_active = $3, description = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&attrs.domain)
        .bind(attrs.is_active)
        .bind(&attrs.description)
        .fetch_one(pool)
        .await?;

        Ok(domain)
    }

    /// Delete a domain
    pub async fn delete(pool: &PgPool, id: &Uuid) -> AppResult<()> {
        sqlx::query(r#"DELETE FROM company_allowed_domains WHERE id = $1"#)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(())
    }
}
