//! User model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::constants::roles;

/// User database model
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub company_team: String,
    pub role: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub force_password_reset: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check if the user has the platform-wide owner role
    pub fn is_owner(&self) -> bool {
        self.role == roles::OWNER
    }

    /// Check if the user is a participant
    pub fn is_hacker(&self) -> bool {
        self.role == roles::HACKER
    }
}

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Administrative user with management rights
    Owner,
    /// Hackathon participant
    Hacker,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => roles::OWNER,
            Self::Hacker => roles::HACKER,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            roles::OWNER => Some(Self::Owner),
            roles::HACKER => Some(Self::Hacker),
            _ => None,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Insert payload for a user whose password has already been hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub company_team: String,
    pub role: UserRole,
    pub password_hash: String,
    pub force_password_reset: bool,
}

/// Full set of mutable user attributes (password excluded)
#[derive(Debug, Clone)]
pub struct UserChanges {
    pub email: String,
    pub name: String,
    pub company_team: String,
    pub role: UserRole,
    pub force_password_reset: bool,
}

impl UserChanges {
    /// Start from the user's current attributes
    pub fn from_user(user: &User) -> Self {
        Self {
            email: user.email.clone(),
            name: user.name.clone(),
            company_team: user.company_team.clone(),
            role: UserRole::parse(&user.role).unwrap_or(UserRole::Hacker),
            force_password_reset: user.force_password_reset,
        }
    }
}

/// Admin user list filter
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub search: Option<String>,
    pub role: Option<String>,
}

/// Public view of a user, safe to embed in pages
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!(UserRole::parse("owner"), Some(UserRole::Owner));
        assert_eq!(UserRole::parse("hacker"), Some(UserRole::Hacker));
        assert_eq!(UserRole::parse("admin"), None);
        assert_eq!(UserRole::Owner.to_string(), "owner");
    }
}
