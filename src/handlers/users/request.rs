//! User form DTOs

use serde::Deserialize;
use validator::Validate;

use crate::services::user_service::NewAccount;
use crate::validation::user::deserialize_email;

/// Sign-up form, also used by owners creating accounts
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterForm {
    #[serde(default, deserialize_with = "deserialize_email")]
    #[validate(email(message = "Email is not a valid email address"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(max = 255))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 255))]
    pub company_team: String,

    #[serde(default)]
    pub password: String,

    #[serde(default)]
    pub password_confirmation: String,

    /// Only honoured for owners
    #[serde(default)]
    pub role: Option<String>,
}

impl RegisterForm {
    pub fn into_account(self, allow_role: bool) -> NewAccount {
        NewAccount {
            email: self.email,
            name: self.name,
            company_team: self.company_team,
            password: self.password,
            password_confirmation: self.password_confirmation,
            role: if allow_role { self.role.filter(|r| !r.is_empty()) } else { None },
        }
    }
}

/// Role change form
#[derive(Debug, Deserialize)]
pub struct RoleForm {
    #[serde(default)]
    pub role: String,
}

