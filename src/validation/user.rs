//! User validation

use uuid::Uuid;

use crate::constants::roles;
use crate::db::Repository;
use crate::error::AppResult;
use crate::models::ConfigurationSettings;

use super::{fields, FieldErrors, PasswordPolicy};

/// Trim and lower-case an email address
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Deserialize a form email already normalized
pub fn deserialize_email<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let email = <String as serde::Deserialize>::deserialize(deserializer)?;
    Ok(normalize_email(&email))
}

/// Load the password policy from the canonical configuration
///
/// A missing row means the defaults apply; a failing lookup falls back to
/// the six character minimum.
pub async fn password_policy(repo: &dyn Repository) -> PasswordPolicy {
    match repo.canonical_configuration().await {
        Ok(Some(config)) => PasswordPolicy::from_settings(&config.settings),
        Ok(None) => PasswordPolicy::from_settings(&ConfigurationSettings::default()),
        Err(e) => {
            tracing::warn!(error = %e, "Could not load password policy, using fallback");
            PasswordPolicy::fallback()
        }
    }
}

/// General rules: email present and not used by another account
pub async fn validate(
    repo: &dyn Repository,
    email: &str,
    exclude: Option<Uuid>,
) -> AppResult<FieldErrors> {
    let mut errors = FieldErrors::new();
    let email = normalize_email(email);

    errors.require(fields::EMAIL, &email, "Email");
    if !email.is_empty() && repo.email_taken(&email, exclude).await? {
        errors.add(fields::EMAIL, format!("{email} is already taken"));
    }

    Ok(errors)
}

/// Create-only rules: password presence, confirmation and policy
pub async fn validate_create(
    repo: &dyn Repository,
    password: &str,
    confirmation: &str,
) -> FieldErrors {
    password_policy(repo).await.check(password, confirmation)
}

/// Update-only rules
pub fn validate_update(role: &str) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if !roles::ALL.contains(&role) {
        errors.add(fields::ROLE, "Invalid role specified");
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MockRepository;
    use crate::error::AppError;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ada@Example.COM "), "ada@example.com");
    }

    #[tokio::test]
    async fn test_taken_email_is_reported_case_insensitively() {
        let mut repo = MockRepository::new();
        repo.expect_email_taken()
            .once()
            .withf(|email, exclude| email == "ada@example.com" && exclude.is_none())
            .return_once(|_, _| Ok(true));

        let errors = validate(&repo, "ADA@example.com", None).await.unwrap();
        assert_eq!(errors.get(fields::EMAIL), ["ada@example.com is already taken".to_string()]);
    }

    #[tokio::test]
    async fn test_blank_email_skips_lookup() {
        let mut repo = MockRepository::new();
        repo.expect_email_taken().never();

        let errors = validate(&repo, "   ", None).await.unwrap();
        assert!(errors.has(fields::EMAIL));
    }

    #[tokio::test]
    async fn test_policy_falls_back_when_configuration_fails() {
        let mut repo = MockRepository::new();
        repo.expect_canonical_configuration()
            .return_once(|| Err(AppError::Database("connection refused".into())));

        let policy = password_policy(&repo).await;
        assert_eq!(policy, PasswordPolicy::fallback());
    }

    #[tokio::test]
    async fn test_missing_configuration_uses_defaults() {
        let mut repo = MockRepository::new();
        repo.expect_canonical_configuration().return_once(|| Ok(None));

        let errors = validate_create(&repo, "lowercase1", "lowercase1").await;
        assert_eq!(
            errors.get(fields::PASSWORD),
            [super::super::password::MSG_UPPERCASE.to_string()]
        );
    }

    #[test]
    fn test_validate_update_rejects_unknown_role() {
        assert!(validate_update("owner").is_empty());
        assert!(validate_update("root").has(fields::ROLE));
    }
}
