//! Profile form DTOs

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    models::User,
    services::profile_service::{PasswordChange, ProfileChanges},
};

#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct ProfileForm {
    #[serde(default)]
    #[validate(length(max = 255))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 255))]
    pub company_team: String,

    #[serde(default)]
    pub email: String,
}

impl ProfileForm {
    pub fn from_user(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            company_team: user.company_team.clone(),
            email: user.email.clone(),
        }
    }

    pub fn to_changes(&self) -> ProfileChanges {
        ProfileChanges {
            name: self.name.clone(),
            company_team: self.company_team.clone(),
            email: self.email.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PasswordForm {
    #[serde(default)]
    pub current_password: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password_confirmation: String,
}

impl From<PasswordForm> for PasswordChange {
    fn from(form: PasswordForm) -> Self {
        Self {
            current_password: form.current_password,
            new_password: form.password,
            confirmation: form.password_confirmation,
        }
    }
}
