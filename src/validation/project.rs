//! Project validation

use uuid::Uuid;

use crate::db::Repository;
use crate::error::{AppResult, DUPLICATE_PROJECT_MESSAGE};
use crate::models::ProjectStatus;

use super::{fields, FieldErrors};

/// General rules shared by create and update
pub fn validate(name: &str, description: &str, hackathon_id: &str, status: &str) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.require(fields::NAME, name, "Name");
    errors.require(fields::DESCRIPTION, description, "Description");
    errors.require(fields::HACKATHON_ID, hackathon_id, "HackathonID");
    if ProjectStatus::parse(status).is_none() {
        errors.add(fields::STATUS, "Status must be one of draft, active, completed");
    }
    errors
}

/// Create-only rules: a founder is set and has no other project in the hackathon
pub async fn validate_create(
    repo: &dyn Repository,
    hackathon_id: &str,
    user_id: Option<Uuid>,
) -> AppResult<FieldErrors> {
    let mut errors = FieldErrors::new();
    let Some(user_id) = user_id else {
        errors.add(fields::USER_ID, "must be present");
        return Ok(errors);
    };
    if repo.user_has_project_in_hackathon(hackathon_id, user_id).await? {
        errors.add(fields::USER_ID, DUPLICATE_PROJECT_MESSAGE);
    }
    Ok(errors)
}

pub fn validate_update() -> FieldErrors {
    FieldErrors::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MockRepository;

    #[test]
    fn test_general_rules() {
        assert!(validate("Robo", "Builds robots", "abcdef012345", "active").is_empty());
        let errors = validate("", "", "", "shipped");
        assert!(errors.has(fields::NAME));
        assert!(errors.has(fields::DESCRIPTION));
        assert!(errors.has(fields::HACKATHON_ID));
        assert!(errors.has(fields::STATUS));
    }

    #[tokio::test]
    async fn test_missing_founder() {
        let mut repo = MockRepository::new();
        repo.expect_user_has_project_in_hackathon().never();
        let errors = validate_create(&repo, "abcdef012345", None).await.unwrap();
        assert_eq!(errors.get(fields::USER_ID), ["must be present".to_string()]);
    }

    #[tokio::test]
    async fn test_second_project_in_same_hackathon() {
        let user_id = Uuid::new_v4();
        let mut repo = MockRepository::new();
        repo.expect_user_has_project_in_hackathon()
            .once()
            .withf(move |hackathon_id, uid| hackathon_id == "abcdef012345" && *uid == user_id)
            .return_once(|_, _| Ok(true));

        let errors = validate_create(&repo, "abcdef012345", Some(user_id)).await.unwrap();
        assert_eq!(errors.get(fields::USER_ID), [DUPLICATE_PROJECT_MESSAGE.to_string()]);
    }
}
