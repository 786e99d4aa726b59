//! Authentication service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    config::SessionConfig,
    constants::{audit_actions, resource_types},
    db::Repository,
    error::{AppError, AppResult},
    models::{ClientInfo, User},
    services::audit_service::{AuditEntry, AuditService},
    validation::user::{normalize_email, password_policy},
};

/// Session token claims
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user_id
    pub exp: i64,
    pub iat: i64,
}

/// Authentication service
pub struct AuthService;

impl AuthService {
    /// Sign in with email and password
    ///
    /// Unknown emails and wrong passwords both yield `InvalidCredentials`.
    pub async fn sign_in(
        repo: &dyn Repository,
        email: &str,
        password: &str,
        client: &ClientInfo,
    ) -> AppResult<User> {
        let email = normalize_email(email);

        let user = match repo.find_user_by_email(&email).await? {
            Some(user) if Self::verify_password(password, &user.password_hash)? => user,
            _ => {
                let entry = AuditEntry::new(
                    audit_actions::LOGIN_FAILED,
                    resource_types::USER,
                    format!("Failed login attempt for email: {email}"),
                );
                AuditService::record(repo, entry, client).await;
                return Err(AppError::InvalidCredentials);
            }
        };

        let entry = AuditEntry::new(
            audit_actions::LOGIN,
            resource_types::USER,
            format!("User logged in: {} ({})", user.name, user.email),
        )
        .actor(user.id)
        .resource(user.id);
        AuditService::record(repo, entry, client).await;

        Ok(user)
    }

    /// Record a sign-out
    pub async fn sign_out(repo: &dyn Repository, user: &User, client: &ClientInfo) {
        let entry = AuditEntry::new(
            audit_actions::LOGOUT,
            resource_types::USER,
            format!("User logged out: {} ({})", user.name, user.email),
        )
        .actor(user.id)
        .resource(user.id);
        AuditService::record(repo, entry, client).await;
    }

    /// Replace the password of a user flagged for a forced reset and clear the flag
    pub async fn reset_forced_password(
        repo: &dyn Repository,
        user: &User,
        password: &str,
        confirmation: &str,
        client: &ClientInfo,
    ) -> AppResult<User> {
        password_policy(repo)
            .await
            .check(password, confirmation)
            .into_result()?;

        let password_hash = Self::hash_password(password)?;
        let updated = repo.update_password(user.id, &password_hash, false).await?;

        let entry = AuditEntry::new(
            audit_actions::PASSWORD_RESET,
            resource_types::USER,
            format!("Password reset completed: {}", updated.email),
        )
        .actor(updated.id)
        .resource(updated.id);
        AuditService::record(repo, entry, client).await;

        Ok(updated)
    }

    /// Issue the signed session token stored in the session cookie
    pub fn issue_session_token(user_id: Uuid, session: &SessionConfig) -> AppResult<String> {
        let now = Utc::now();
        let expires_at = now + Duration::hours(session.expiry_hours);

        let claims = Claims {
            sub: user_id.to_string(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(session.secret.as_bytes()),
        )?;

        Ok(token)
    }

    /// Verify a session token and return the user id it carries
    pub fn verify_session_token(token: &str, secret: &str) -> AppResult<Uuid> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;

        Uuid::parse_str(&token_data.claims.sub).map_err(|_| AppError::InvalidToken)
    }

    /// Hash password using Argon2
    pub fn hash_password(password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))?
            .to_string();

        Ok(hash)
    }

    /// Verify password against hash
    pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid password hash: {}", e)))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MockRepository;
    use crate::test_utils::fixtures::user_with_password;

    fn session() -> SessionConfig {
        SessionConfig {
            secret: "test-secret".to_string(),
            expiry_hours: 1,
            cookie_secure: false,
        }
    }

    #[test]
    fn test_password_round_trip() {
        let hash = AuthService::hash_password("Secret123").unwrap();
        assert!(AuthService::verify_password("Secret123", &hash).unwrap());
        assert!(!AuthService::verify_password("secret123", &hash).unwrap());
    }

    #[test]
    fn test_session_token_round_trip() {
        let user_id = Uuid::new_v4();
        let token = AuthService::issue_session_token(user_id, &session()).unwrap();

        assert_eq!(AuthService::verify_session_token(&token, "test-secret").unwrap(), user_id);
        assert!(matches!(
            AuthService::verify_session_token(&token, "other-secret"),
            Err(AppError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn test_sign_in_normalizes_email() {
        let user = user_with_password("ada@example.com", "Secret123");
        let expected_id = user.id;

        let mut repo = MockRepository::new();
        repo.expect_find_user_by_email()
            .once()
            .withf(|email| email == "ada@example.com")
            .return_once(move |_| Ok(Some(user)));
        repo.expect_insert_audit_log()
            .once()
            .withf(|row| row.action == "login")
            .return_once(|_| Ok(()));

        let signed_in = AuthService::sign_in(&repo, "  Ada@Example.com ", "Secret123", &ClientInfo::default())
            .await
            .unwrap();
        assert_eq!(signed_in.id, expected_id);
    }

    #[tokio::test]
    async fn test_wrong_password_is_audited_and_rejected() {
        let user = user_with_password("ada@example.com", "Secret123");

        let mut repo = MockRepository::new();
        repo.expect_find_user_by_email()
            .once()
            .return_once(move |_| Ok(Some(user)));
        repo.expect_insert_audit_log()
            .once()
            .withf(|row| row.action == "login_failed" && row.user_id.is_none())
            .return_once(|_| Ok(()));

        let result = AuthService::sign_in(&repo, "ada@example.com", "nope", &ClientInfo::default()).await;
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_unknown_email_is_rejected() {
        let mut repo = MockRepository::new();
        repo.expect_find_user_by_email().once().return_once(|_| Ok(None));
        repo.expect_insert_audit_log().once().return_once(|_| Ok(()));

        let result = AuthService::sign_in(&repo, "ghost@example.com", "whatever", &ClientInfo::default()).await;
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_forced_reset_clears_flag() {
        let mut user = user_with_password("ada@example.com", "Secret123");
        user.force_password_reset = true;
        let user_id = user.id;
        let mut updated = user.clone();
        updated.force_password_reset = false;

        let mut repo = MockRepository::new();
        repo.expect_canonical_configuration().once().return_once(|| Ok(None));
        repo.expect_update_password()
            .once()
            .withf(move |id, hash, force| *id == user_id && hash.starts_with("$argon2") && !force)
            .return_once(move |_, _, _| Ok(updated));
        repo.expect_insert_audit_log().once().return_once(|_| Ok(()));

        let result = AuthService::reset_forced_password(
            &repo,
            &user,
            "Newpass123",
            "Newpass123",
            &ClientInfo::default(),
        )
        .await
        .unwrap();
        assert!(!result.force_password_reset);
    }

    #[tokio::test]
    async fn test_forced_reset_rejects_weak_password() {
        let user = user_with_password("ada@example.com", "Secret123");

        let mut repo = MockRepository::new();
        repo.expect_canonical_configuration().once().return_once(|| Ok(None));
        repo.expect_update_password().never();

        let result =
            AuthService::reset_forced_password(&repo, &user, "short", "short", &ClientInfo::default()).await;
        assert!(matches!(result, Err(AppError::Invalid(errors)) if errors.has("password")));
    }
}
