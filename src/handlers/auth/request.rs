//! Authentication form DTOs

use serde::Deserialize;
use validator::Validate;

/// Sign-in form
#[derive(Debug, Deserialize, Validate)]
pub struct SignInForm {
    #[serde(default)]
    #[validate(length(min = 1, max = 255))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// Forced password reset form
#[derive(Debug, Deserialize)]
pub struct ResetPasswordForm {
    #[serde(default)]
    pub password: String,

    #[serde(default)]
    pub password_confirmation: String,
}
