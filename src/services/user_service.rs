//! User service

use uuid::Uuid;

use crate::{
    constants::{audit_actions, resource_types},
    db::Repository,
    error::{AppError, AppResult},
    models::{email_domain, ClientInfo, NewUser, User, UserChanges, UserRole},
    services::{
        audit_service::{AuditEntry, AuditService},
        AuthService, ConfigurationService,
    },
    validation::{self, fields, user::normalize_email, FieldErrors},
};

pub const MSG_DOMAIN_NOT_ALLOWED: &str = "Email domain is not allowed for registration";
pub const MSG_REGISTRATION_CLOSED: &str = "Public registration is currently disabled";
pub const MSG_OWNER_NOT_DELETABLE: &str = "Cannot delete owner accounts";
pub const MSG_OWNS_HACKATHONS: &str = "Cannot delete a user who owns hackathons";

/// Account details submitted on a sign-up or admin create form
#[derive(Debug, Clone, Default)]
pub struct NewAccount {
    pub email: String,
    pub name: String,
    pub company_team: String,
    pub password: String,
    pub password_confirmation: String,
    /// Explicit role; `None` lets the first account become owner
    pub role: Option<String>,
}

/// Fields an owner may change on another account
#[derive(Debug, Clone)]
pub struct AccountChanges {
    pub email: String,
    pub name: String,
    pub company_team: String,
    pub role: String,
    pub force_password_reset: bool,
}

/// User service for business logic
pub struct UserService;

impl UserService {
    /// Get user by ID
    pub async fn get_user_by_id(repo: &dyn Repository, id: Uuid) -> AppResult<User> {
        repo.find_user(id)
            .await?
            .ok_or_else(|| AppError::not_found("User"))
    }

    /// Self registration
    ///
    /// The email domain must be allowed and, once any account exists, public
    /// registration must be switched on.
    pub async fn register(
        repo: &dyn Repository,
        account: NewAccount,
        client: &ClientInfo,
    ) -> AppResult<User> {
        if let Some(domain) = email_domain(&account.email) {
            if !repo.is_domain_allowed(&domain).await? {
                return Err(AppError::Forbidden(MSG_DOMAIN_NOT_ALLOWED.to_string()));
            }
        }

        if repo.count_users().await? > 0 {
            let settings = ConfigurationService::settings(repo).await?;
            if !settings.allow_public_registration {
                return Err(AppError::Forbidden(MSG_REGISTRATION_CLOSED.to_string()));
            }
        }

        let user = Self::create(repo, account).await?;

        let entry = AuditEntry::new(
            audit_actions::REGISTER,
            resource_types::USER,
            format!("User registered: {} ({})", user.name, user.email),
        )
        .actor(user.id)
        .resource(user.id);
        AuditService::record(repo, entry, client).await;

        Ok(user)
    }

    /// Account creation by an owner; no domain restriction applies
    pub async fn admin_create(
        repo: &dyn Repository,
        mut account: NewAccount,
        actor: &User,
        client: &ClientInfo,
    ) -> AppResult<User> {
        if account.role.as_deref().is_none_or(str::is_empty) {
            account.role = Some(UserRole::Hacker.as_str().to_string());
        }

        let user = Self::create(repo, account).await?;

        let entry = AuditEntry::new(
            audit_actions::CREATE,
            resource_types::USER,
            format!("Created user {} ({}) with role {}", user.name, user.email, user.role),
        )
        .actor(actor.id)
        .resource(user.id);
        AuditService::record(repo, entry, client).await;

        Ok(user)
    }

    /// Validate and insert an account
    ///
    /// Without an explicit role the very first account becomes owner and
    /// every later one a hacker.
    async fn create(repo: &dyn Repository, account: NewAccount) -> AppResult<User> {
        let email = normalize_email(&account.email);

        let mut errors = FieldErrors::new();
        errors.require(fields::NAME, &account.name, "Name");
        errors.merge(validation::user::validate(repo, &email, None).await?);
        errors.merge(
            validation::user::validate_create(repo, &account.password, &account.password_confirmation)
                .await,
        );

        let role = match account.role.as_deref() {
            Some(role) => match UserRole::parse(role) {
                Some(role) => Some(role),
                None => {
                    errors.add(fields::ROLE, "Invalid role specified");
                    None
                }
            },
            None => None,
        };
        errors.into_result()?;

        let role = match role {
            Some(role) => role,
            None if repo.count_users().await? == 0 => UserRole::Owner,
            None => UserRole::Hacker,
        };

        let password_hash = AuthService::hash_password(&account.password)?;

        repo.create_user(NewUser {
            email,
            name: account.name.trim().to_string(),
            company_team: account.company_team.trim().to_string(),
            role,
            password_hash,
            force_password_reset: false,
        })
        .await
    }

    /// Change only the role of an account
    pub async fn update_role(
        repo: &dyn Repository,
        id: Uuid,
        role: &str,
        actor: &User,
        client: &ClientInfo,
    ) -> AppResult<User> {
        let user = Self::get_user_by_id(repo, id).await?;
        let changes = UserChanges {
            role: Self::parse_role(role)?,
            ..UserChanges::from_user(&user)
        };

        Self::apply(repo, &user, changes, actor, client).await
    }

    /// Owner edit of name, email, team, role and the forced reset flag
    pub async fn admin_update(
        repo: &dyn Repository,
        id: Uuid,
        changes: AccountChanges,
        actor: &User,
        client: &ClientInfo,
    ) -> AppResult<User> {
        let user = Self::get_user_by_id(repo, id).await?;
        let role = Self::parse_role(&changes.role)?;

        let email = normalize_email(&changes.email);
        let mut errors = FieldErrors::new();
        errors.require(fields::NAME, &changes.name, "Name");
        errors.merge(validation::user::validate(repo, &email, Some(user.id)).await?);
        errors.into_result()?;

        let changes = UserChanges {
            email,
            name: changes.name.trim().to_string(),
            company_team: changes.company_team.trim().to_string(),
            role,
            force_password_reset: changes.force_password_reset,
        };

        Self::apply(repo, &user, changes, actor, client).await
    }

    async fn apply(
        repo: &dyn Repository,
        user: &User,
        changes: UserChanges,
        actor: &User,
        client: &ClientInfo,
    ) -> AppResult<User> {
        let updated = repo.update_user(user.id, changes).await?;

        let entry = AuditEntry::new(
            audit_actions::UPDATE,
            resource_types::USER,
            format!("Updated user {} ({})", updated.name, updated.email),
        )
        .actor(actor.id)
        .resource(updated.id);
        AuditService::record(repo, entry, client).await;

        Ok(updated)
    }

    fn parse_role(role: &str) -> AppResult<UserRole> {
        validation::user::validate_update(role).into_result()?;
        UserRole::parse(role)
            .ok_or_else(|| AppError::Invalid(FieldErrors::single(fields::ROLE, "Invalid role specified")))
    }

    /// Delete an account; owners and hackathon owners are kept
    pub async fn delete(
        repo: &dyn Repository,
        id: Uuid,
        actor: &User,
        client: &ClientInfo,
    ) -> AppResult<User> {
        let user = Self::get_user_by_id(repo, id).await?;
        if user.is_owner() {
            return Err(AppError::Conflict(MSG_OWNER_NOT_DELETABLE.to_string()));
        }
        if !repo.hackathons_by_owner(user.id).await?.is_empty() {
            return Err(AppError::Conflict(MSG_OWNS_HACKATHONS.to_string()));
        }

        repo.delete_user(user.id).await?;

        let entry = AuditEntry::new(
            audit_actions::DELETE,
            resource_types::USER,
            format!("Deleted user {} ({})", user.name, user.email),
        )
        .actor(actor.id)
        .resource(user.id);
        AuditService::record(repo, entry, client).await;

        Ok(user)
    }

    /// Require a user to choose a new password at their next request
    pub async fn flag_for_password_reset(
        repo: &dyn Repository,
        id: Uuid,
        actor: &User,
        client: &ClientInfo,
    ) -> AppResult<User> {
        let user = Self::get_user_by_id(repo, id).await?;
        let updated = repo.set_force_password_reset(user.id, true).await?;

        let entry = AuditEntry::new(
            audit_actions::FORCE_PASSWORD_RESET,
            resource_types::USER,
            format!("Password reset required for {} ({})", updated.name, updated.email),
        )
        .actor(actor.id)
        .resource(updated.id);
        AuditService::record(repo, entry, client).await;

        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use chrono::Utc;

    use super::*;
    use crate::db::MockRepository;
    use crate::models::{CompanyConfiguration, ConfigurationSettings};
    use crate::test_utils::fixtures;

    fn account(email: &str) -> NewAccount {
        NewAccount {
            email: email.to_string(),
            name: "Ada Lovelace".to_string(),
            company_team: "Research".to_string(),
            password: "Secret123".to_string(),
            password_confirmation: "Secret123".to_string(),
            role: None,
        }
    }

    fn created(user: NewUser) -> User {
        User {
            id: Uuid::new_v4(),
            email: user.email,
            name: user.name,
            company_team: user.company_team,
            role: user.role.as_str().to_string(),
            password_hash: user.password_hash,
            force_password_reset: user.force_password_reset,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn closed_registration() -> CompanyConfiguration {
        CompanyConfiguration {
            id: Uuid::new_v4(),
            settings: ConfigurationSettings {
                allow_public_registration: false,
                ..ConfigurationSettings::default()
            },
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_first_user_becomes_owner() {
        let mut repo = MockRepository::new();
        repo.expect_is_domain_allowed().return_once(|_| Ok(true));
        repo.expect_count_users().times(2).returning(|| Ok(0));
        repo.expect_email_taken().return_once(|_, _| Ok(false));
        repo.expect_canonical_configuration().return_once(|| Ok(None));
        repo.expect_create_user()
            .once()
            .withf(|user| user.role == UserRole::Owner && user.email == "ada@example.com")
            .return_once(|user| Ok(created(user)));
        repo.expect_insert_audit_log().return_once(|_| Ok(()));

        let user = UserService::register(&repo, account("Ada@Example.com"), &ClientInfo::default())
            .await
            .unwrap();
        assert!(user.is_owner());
    }

    #[tokio::test]
    async fn test_later_users_default_to_hacker() {
        let mut repo = MockRepository::new();
        repo.expect_is_domain_allowed().return_once(|_| Ok(true));
        repo.expect_count_users().returning(|| Ok(3));
        repo.expect_email_taken().return_once(|_, _| Ok(false));
        repo.expect_canonical_configuration().returning(|| Ok(None));
        repo.expect_create_user()
            .once()
            .withf(|user| user.role == UserRole::Hacker)
            .return_once(|user| Ok(created(user)));
        repo.expect_insert_audit_log().return_once(|_| Ok(()));

        let user = UserService::register(&repo, account("grace@example.com"), &ClientInfo::default())
            .await
            .unwrap();
        assert!(user.is_hacker());
    }

    #[tokio::test]
    async fn test_email_uniqueness_is_case_insensitive() {
        // In-memory store standing in for the users table
        let emails: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

        let mut repo = MockRepository::new();
        repo.expect_is_domain_allowed().returning(|_| Ok(true));
        let count_emails = emails.clone();
        repo.expect_count_users()
            .returning(move || Ok(count_emails.lock().unwrap().len() as i64));
        let taken_emails = emails.clone();
        repo.expect_email_taken().returning(move |email, _| {
            Ok(taken_emails
                .lock()
                .unwrap()
                .iter()
                .any(|existing| existing.eq_ignore_ascii_case(email)))
        });
        repo.expect_canonical_configuration().returning(|| Ok(None));
        let stored_emails = emails.clone();
        repo.expect_create_user().once().returning(move |user| {
            stored_emails.lock().unwrap().push(user.email.clone());
            Ok(created(user))
        });
        repo.expect_insert_audit_log().returning(|_| Ok(()));

        UserService::register(&repo, account("A@x.com"), &ClientInfo::default())
            .await
            .unwrap();
        let second = UserService::register(&repo, account("a@x.com"), &ClientInfo::default()).await;

        match second {
            Err(AppError::Invalid(errors)) => {
                assert_eq!(errors.get("email"), ["a@x.com is already taken".to_string()]);
            }
            other => panic!("expected a validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_disallowed_domain_is_refused() {
        let mut repo = MockRepository::new();
        repo.expect_is_domain_allowed()
            .once()
            .withf(|domain| domain == "evil.test")
            .return_once(|_| Ok(false));
        repo.expect_create_user().never();

        let result = UserService::register(&repo, account("mallory@Evil.test"), &ClientInfo::default()).await;
        assert!(matches!(result, Err(AppError::Forbidden(msg)) if msg == MSG_DOMAIN_NOT_ALLOWED));
    }

    #[tokio::test]
    async fn test_closed_registration_is_refused_once_users_exist() {
        let mut repo = MockRepository::new();
        repo.expect_is_domain_allowed().return_once(|_| Ok(true));
        repo.expect_count_users().return_once(|| Ok(1));
        repo.expect_canonical_configuration()
            .return_once(|| Ok(Some(closed_registration())));
        repo.expect_create_user().never();

        let result = UserService::register(&repo, account("late@example.com"), &ClientInfo::default()).await;
        assert!(matches!(result, Err(AppError::Forbidden(msg)) if msg == MSG_REGISTRATION_CLOSED));
    }

    #[tokio::test]
    async fn test_admin_create_defaults_to_hacker_and_skips_domain_check() {
        let mut repo = MockRepository::new();
        repo.expect_is_domain_allowed().never();
        repo.expect_email_taken().return_once(|_, _| Ok(false));
        repo.expect_canonical_configuration().return_once(|| Ok(None));
        repo.expect_create_user()
            .once()
            .withf(|user| user.role == UserRole::Hacker)
            .return_once(|user| Ok(created(user)));
        repo.expect_insert_audit_log()
            .once()
            .withf(|row| row.action == "create" && row.resource_type == "user")
            .return_once(|_| Ok(()));

        let owner = fixtures::owner();
        let user = UserService::admin_create(&repo, account("new@elsewhere.org"), &owner, &ClientInfo::default())
            .await
            .unwrap();
        assert!(user.is_hacker());
    }

    #[tokio::test]
    async fn test_owner_accounts_cannot_be_deleted() {
        let target = fixtures::owner();
        let target_id = target.id;

        let mut repo = MockRepository::new();
        repo.expect_find_user().return_once(move |_| Ok(Some(target)));
        repo.expect_delete_user().never();

        let result = UserService::delete(&repo, target_id, &fixtures::owner(), &ClientInfo::default()).await;
        assert!(matches!(result, Err(AppError::Conflict(msg)) if msg == MSG_OWNER_NOT_DELETABLE));
    }

    #[tokio::test]
    async fn test_update_role_rejects_unknown_role() {
        let target = fixtures::hacker();
        let target_id = target.id;

        let mut repo = MockRepository::new();
        repo.expect_find_user().return_once(move |_| Ok(Some(target)));
        repo.expect_update_user().never();

        let result =
            UserService::update_role(&repo, target_id, "admin", &fixtures::owner(), &ClientInfo::default()).await;
        assert!(matches!(result, Err(AppError::Invalid(errors)) if errors.has("role")));
    }
}
