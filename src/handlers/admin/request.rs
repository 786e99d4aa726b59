//! Admin request DTOs

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    models::{AuditLogFilter, ConfigurationSettings, HackathonFilter, PageParams, ProjectFilter, User, UserFilter},
    services::{domain_service::DomainDraft, user_service::AccountChanges},
    validation::FieldErrors,
};

/// A checked HTML checkbox
fn checked(value: Option<&str>) -> bool {
    matches!(value, Some("true" | "1" | "on"))
}

fn page_params(page: Option<i64>, per_page: Option<i64>) -> PageParams {
    let defaults = PageParams::default();
    PageParams::new(page.unwrap_or(defaults.page), per_page.unwrap_or(defaults.per_page))
}

/// Users list query: search, role filter and page
#[derive(Debug, Default, Deserialize)]
pub struct UsersQuery {
    pub search: Option<String>,
    pub role: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl UsersQuery {
    pub fn split(self) -> (UserFilter, PageParams) {
        (
            UserFilter {
                search: self.search,
                role: self.role,
            },
            page_params(self.page, self.per_page),
        )
    }
}

/// Hackathon and project list query: search, status filter and page
#[derive(Debug, Default, Deserialize)]
pub struct StatusQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl StatusQuery {
    pub fn hackathons(self) -> (HackathonFilter, PageParams) {
        (
            HackathonFilter {
                search: self.search,
                status: self.status,
            },
            page_params(self.page, self.per_page),
        )
    }

    pub fn projects(self) -> (ProjectFilter, PageParams) {
        (
            ProjectFilter {
                search: self.search,
                status: self.status,
            },
            page_params(self.page, self.per_page),
        )
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AuditLogQuery {
    pub search: Option<String>,
    pub action: Option<String>,
    pub resource_type: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl AuditLogQuery {
    /// Blank filter values are dropped
    pub fn split(self) -> (AuditLogFilter, PageParams) {
        let non_blank = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
        (
            AuditLogFilter {
                search: non_blank(self.search),
                action: non_blank(self.action),
                resource_type: non_blank(self.resource_type),
            },
            page_params(self.page, self.per_page),
        )
    }
}

/// Owner edit of another account
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AdminUserForm {
    #[serde(default)]
    #[validate(length(max = 255))]
    pub name: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    #[validate(length(max = 255))]
    pub company_team: String,

    #[serde(default)]
    pub role: String,

    #[serde(default)]
    pub force_password_reset: Option<String>,
}

impl AdminUserForm {
    pub fn into_changes(self) -> AccountChanges {
        AccountChanges {
            force_password_reset: checked(self.force_password_reset.as_deref()),
            email: self.email,
            name: self.name,
            company_team: self.company_team,
            role: self.role,
        }
    }
}

impl From<&User> for AdminUserForm {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            company_team: user.company_team.clone(),
            role: user.role.clone(),
            force_password_reset: user.force_password_reset.then(|| "true".to_string()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DomainForm {
    #[serde(default)]
    pub domain: String,
    /// Absent means active
    pub is_active: Option<String>,
    #[serde(default)]
    pub description: String,
}

impl From<DomainForm> for DomainDraft {
    fn from(form: DomainForm) -> Self {
        Self {
            domain: form.domain,
            is_active: form.is_active.map(|value| checked(Some(&value))),
            description: form.description,
        }
    }
}

/// Submitted configuration fields
///
/// Text and number fields left out of the body keep their stored value.
/// Boolean fields are checkboxes: anything but `true` switches them off.
#[derive(Debug, Default)]
pub struct ConfigForm(pub HashMap<String, String>);

macro_rules! take_text {
    ($form:expr, $settings:ident, [$($field:ident),* $(,)?]) => {
        $(
            if let Some(value) = $form.get(stringify!($field)) {
                $settings.$field = value.trim().to_string();
            }
        )*
    };
}

macro_rules! take_number {
    ($form:expr, $settings:ident, $errors:ident, [$($field:ident),* $(,)?]) => {
        $(
            if let Some(value) = $form.get(stringify!($field)) {
                match value.trim().parse() {
                    Ok(number) => $settings.$field = number,
                    Err(_) => $errors.add(stringify!($field), "is not a number"),
                }
            }
        )*
    };
}

macro_rules! take_flag {
    ($form:expr, $settings:ident, [$($field:ident),* $(,)?]) => {
        $(
            $settings.$field = $form.get(stringify!($field)).map(String::as_str) == Some("true");
        )*
    };
}

impl ConfigForm {
    /// Overlay the submitted fields on `current`
    pub fn apply_to(&self, current: &ConfigurationSettings) -> Result<ConfigurationSettings, FieldErrors> {
        let form = &self.0;
        let mut settings = current.clone();
        let mut errors = FieldErrors::new();

        take_text!(form, settings, [
            company_name,
            company_logo_url,
            company_description,
            contact_email,
            website_url,
            support_email,
            default_user_role,
            terms_of_service_url,
            privacy_policy_url,
        ]);
        take_number!(form, settings, errors, [
            max_projects_per_user,
            max_team_size,
            max_active_hackathons,
            default_hackathon_duration_hours,
            password_min_length,
            session_timeout_minutes,
            data_retention_days,
        ]);
        take_flag!(form, settings, [
            allow_public_registration,
            require_email_verification,
            allow_guest_access,
            require_project_approval,
            password_require_uppercase,
            password_require_numbers,
            password_require_special_chars,
            two_factor_required,
            file_uploads_enabled,
            project_images_enabled,
            team_formation_enabled,
            public_profiles_enabled,
            analytics_enabled,
        ]);

        if errors.is_empty() {
            Ok(settings)
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> ConfigForm {
        ConfigForm(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect())
    }

    #[test]
    fn test_config_form_overlays_submitted_fields() {
        let current = ConfigurationSettings::default();
        let settings = form(&[
            ("company_name", " Acme Hack "),
            ("max_team_size", "6"),
            ("file_uploads_enabled", "true"),
        ])
        .apply_to(&current)
        .unwrap();

        assert_eq!(settings.company_name, "Acme Hack");
        assert_eq!(settings.max_team_size, 6);
        assert_eq!(settings.contact_email, current.contact_email);
        assert!(settings.file_uploads_enabled);
        // Unchecked boxes are absent from the body
        assert!(!settings.team_formation_enabled);
    }

    #[test]
    fn test_config_form_rejects_bad_numbers() {
        let errors = form(&[("max_team_size", "four")])
            .apply_to(&ConfigurationSettings::default())
            .unwrap_err();
        assert!(errors.has("max_team_size"));
    }

    #[test]
    fn test_domain_form_defaults_to_active() {
        let draft = DomainDraft::from(DomainForm {
            domain: "example.com".to_string(),
            ..DomainForm::default()
        });
        assert_eq!(draft.is_active, None);

        let draft = DomainDraft::from(DomainForm {
            is_active: Some("0".to_string()),
            ..DomainForm::default()
        });
        assert_eq!(draft.is_active, Some(false));
    }
}
