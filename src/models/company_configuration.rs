//! Company-wide configuration (single canonical row)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::constants::{company_defaults, roles};

/// Persisted configuration row
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CompanyConfiguration {
    pub id: Uuid,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub settings: ConfigurationSettings,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Editable configuration values
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct ConfigurationSettings {
    // Branding
    pub company_name: String,
    pub company_logo_url: String,
    pub company_description: String,
    pub contact_email: String,
    pub website_url: String,
    pub support_email: String,

    // Registration and access
    pub allow_public_registration: bool,
    pub require_email_verification: bool,
    pub default_user_role: String,
    pub allow_guest_access: bool,

    // Hackathons
    pub max_projects_per_user: i32,
    pub max_team_size: i32,
    pub max_active_hackathons: i32,
    pub default_hackathon_duration_hours: i32,
    pub require_project_approval: bool,

    // Security
    pub password_min_length: i32,
    pub password_require_uppercase: bool,
    pub password_require_numbers: bool,
    pub password_require_special_chars: bool,
    pub session_timeout_minutes: i32,
    pub two_factor_required: bool,

    // Legal
    pub terms_of_service_url: String,
    pub privacy_policy_url: String,
    pub data_retention_days: i32,

    // Feature toggles
    pub file_uploads_enabled: bool,
    pub project_images_enabled: bool,
    pub team_formation_enabled: bool,
    pub public_profiles_enabled: bool,
    pub analytics_enabled: bool,
}

impl Default for ConfigurationSettings {
    fn default() -> Self {
        Self {
            company_name: company_defaults::COMPANY_NAME.to_string(),
            company_logo_url: String::new(),
            company_description: company_defaults::COMPANY_DESCRIPTION.to_string(),
            contact_email: company_defaults::CONTACT_EMAIL.to_string(),
            website_url: String::new(),
            support_email: String::new(),
            allow_public_registration: true,
            require_email_verification: true,
            default_user_role: roles::HACKER.to_string(),
            allow_guest_access: false,
            max_projects_per_user: 5,
            max_team_size: 4,
            max_active_hackathons: 10,
            default_hackathon_duration_hours: 48,
            require_project_approval: false,
            password_min_length: 8,
            password_require_uppercase: true,
            password_require_numbers: true,
            password_require_special_chars: false,
            session_timeout_minutes: 480,
            two_factor_required: false,
            terms_of_service_url: String::new(),
            privacy_policy_url: String::new(),
            data_retention_days: 2555,
            file_uploads_enabled: true,
            project_images_enabled: true,
            team_formation_enabled: true,
            public_profiles_enabled: true,
            analytics_enabled: false,
        }
    }
}

macro_rules! apply_changed {
    ($current:expr, $incoming:expr, $changed:expr, [$($field:ident),* $(,)?]) => {
        $(
            if $current.$field != $incoming.$field {
                $current.$field = $incoming.$field.clone();
                $changed.push(stringify!($field));
            }
        )*
    };
}

impl ConfigurationSettings {
    /// Copy every differing field from `incoming`, returning the names of the fields that changed
    pub fn update_changed_fields(&mut self, incoming: &ConfigurationSettings) -> Vec<&'static str> {
        let mut changed = Vec::new();
        apply_changed!(self, incoming, changed, [
            company_name,
            company_logo_url,
            company_description,
            contact_email,
            website_url,
            support_email,
            allow_public_registration,
            require_email_verification,
            default_user_role,
            allow_guest_access,
            max_projects_per_user,
            max_team_size,
            max_active_hackathons,
            default_hackathon_duration_hours,
            require_project_approval,
            password_min_length,
            password_require_uppercase,
            password_require_numbers,
            password_require_special_chars,
            session_timeout_minutes,
            two_factor_required,
            terms_of_service_url,
            privacy_policy_url,
            data_retention_days,
            file_uploads_enabled,
            project_images_enabled,
            team_formation_enabled,
            public_profiles_enabled,
            analytics_enabled,
        ]);
        changed
    }
}
