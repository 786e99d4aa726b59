//! Company configuration validation

use crate::constants::roles;
use crate::models::ConfigurationSettings;

use super::{fields, FieldErrors};

pub fn validate(settings: &ConfigurationSettings) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.require(fields::COMPANY_NAME, &settings.company_name, "CompanyName");
    errors.require(fields::CONTACT_EMAIL, &settings.contact_email, "ContactEmail");
    errors.require(fields::DEFAULT_USER_ROLE, &settings.default_user_role, "DefaultUserRole");
    if !settings.default_user_role.trim().is_empty()
        && !roles::ALL.contains(&settings.default_user_role.as_str())
    {
        errors.add(fields::DEFAULT_USER_ROLE, "Invalid role specified");
    }

    let numbers = [
        ("max_projects_per_user", settings.max_projects_per_user),
        ("max_team_size", settings.max_team_size),
        ("max_active_hackathons", settings.max_active_hackathons),
        ("default_hackathon_duration_hours", settings.default_hackathon_duration_hours),
        ("password_min_length", settings.password_min_length),
        ("session_timeout_minutes", settings.session_timeout_minutes),
        ("data_retention_days", settings.data_retention_days),
    ];
    for (field, value) in numbers {
        if value < 0 {
            errors.add(field, "must not be negative");
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate(&ConfigurationSettings::default()).is_empty());
    }

    #[test]
    fn test_required_fields() {
        let settings = ConfigurationSettings {
            company_name: String::new(),
            default_user_role: "admin".to_string(),
            max_team_size: -1,
            ..ConfigurationSettings::default()
        };
        let errors = validate(&settings);
        assert!(errors.has(fields::COMPANY_NAME));
        assert!(errors.has(fields::DEFAULT_USER_ROLE));
        assert!(errors.has("max_team_size"));
    }
}
