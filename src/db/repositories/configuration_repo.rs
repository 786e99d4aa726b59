//! Company configuration repository

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{CompanyConfiguration, ConfigurationSettings},
};

/// Repository for the company configuration row
pub struct CompanyConfigurationRepository;

impl CompanyConfigurationRepository {
    /// The canonical configuration: the oldest row
    pub async fn canonical(pool: &PgPool) -> AppResult<Option<CompanyConfiguration>> {
        let config = sqlx::query_as::<_, CompanyConfiguration>(
            r#"SELECT * FROM company_configurations ORDER BY created_at ASC, id ASC LIMIT 1"#,
        )
        .fetch_optional(pool)
        .await?;

        Ok(config)
    }

    /// Insert a configuration row
    pub async fn create(pool: &PgPool, settings: &ConfigurationSettings) -> AppResult<CompanyConfiguration> {
        let config = sqlx::query_as::<_, CompanyConfiguration>(
            r#"
            INSERT INTO company_configurations (
                company_name, company_logo_url, company_description, contact_email,
                website_url, support_email,
                allow_public_registration, require_email_verification, default_user_role,
                allow_guest_access,
                max_projects_per_user, max_team_size, max_active_hackathons,
                default_hackathon_duration_hours, require_project_approval,
                password_min_length, password_require_uppercase, password_require_numbers,
                password_require_special_chars, session_timeout_minutes, two_factor_required,
                terms_of_service_url, privacy_policy_url, data_retention_days,
                file_uploads_enabled, project_images_enabled, team_formation_enabled,
                public_profiles_enabled, analytics_enabled
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28, $29
            )
            RETURNING *
            "#,
        );
        let config = bind_settings(config, settings).fetch_one(pool).await?;

        Ok(config)
    }

    /// Overwrite the settings of a configuration row
    pub async fn update(
        pool: &PgPool,
        id: &Uuid,
        settings: &ConfigurationSettings,
    ) -> AppResult<CompanyConfiguration> {
        let config = sqlx::query_as::<_, CompanyConfiguration>(
            r#"
            UPDATE company_configurations
            SET
                company_name = $1, company_logo_url = $2, company_description = $3,
                contact_email = $4, website_url = $5, support_email = $6,
                allow_public_registration = $7, require_email_verification = $8,
                default_user_role = $9, allow_guest_access = $10,
                max_projects_per_user = $11, max_team_size = $12, max_active_hackathons = $13,
                default_hackathon_duration_hours = $14, require_project_approval = $15,
                password_min_length = $16, password_require_uppercase = $17,
                password_require_numbers = $18, password_require_special_chars = $19,
                session_timeout_minutes = $20, two_factor_required = $21,
                terms_of_service_url = $22, privacy_policy_url = $23, data_retention_days = $24,
                file_uploads_enabled = $25, project_images_enabled = $26,
                team_formation_enabled = $27, public_profiles_enabled = $28,
                analytics_enabled = $29,
                updated_at = NOW()
            WHERE id = $30
            RETURNING *
            "#,
        );
        let config = bind_settings(config, settings)
            .bind(id)
            .fetch_one(pool)
            .await?;

        Ok(config)
    }
}

type ConfigQuery<'q> =
    sqlx::query::QueryAs<'q, sqlx::Postgres, CompanyConfiguration, sqlx::postgres::PgArguments>;

/// Bind every setting in column order as `$1..$29`
fn bind_settings<'q>(query: ConfigQuery<'q>, s: &'q ConfigurationSettings) -> ConfigQuery<'q> {
    query
        .bind(&s.company_name)
        .bind(&s.company_logo_url)
        .bind(&s.company_description)
        .bind(&s.contact_email)
        .bind(&s.website_url)
        .bind(&s.support_email)
        .bind(s.allow_public_registration)
        .bind(s.require_email_verification)
        .bind(&s.default_user_role)
        .bind(s.allow_guest_access)
        .bind(s.max_projects_per_user)
        .bind(s.max_team_size)
        .bind(s.max_active_hackathons)
        .bind(s.default_hackathon_duration_hours)
        .bind(s.require_project_approval)
        .bind(s.password_min_length)
        .bind(s.password_require_uppercase)
        .bind(s.password_require_numbers)
        .bind(s.password_require_special_chars)
        .bind(s.session_timeout_minutes)
        .bind(s.two_factor_required)
        .bind(&s.terms_of_service_url)
        .bind(&s.privacy_policy_url)
        .bind(s.data_retention_days)
        .bind(s.file_uploads_enabled)
        .bind(s.project_images_enabled)
        .bind(s.team_formation_enabled)
        .bind(s.public_profiles_enabled)
        .bind(s.analytics_enabled)
}
