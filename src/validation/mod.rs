//! Explicit validation phases
//!
//! Every entity exposes `validate` (general rules), `validate_create` and
//! `validate_update`. Services call them before touching the database and
//! turn a non-empty [`FieldErrors`] into [`AppError::Invalid`].

pub mod config;
pub mod domain;
pub mod file;
pub mod hackathon;
pub mod password;
pub mod project;
pub mod user;

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::{AppError, AppResult};

pub use password::PasswordPolicy;

/// Field keys used in validation results
pub mod fields {
    pub const EMAIL: &str = "email";
    pub const NAME: &str = "name";
    pub const PASSWORD: &str = "password";
    pub const CURRENT_PASSWORD: &str = "current_password";
    pub const ROLE: &str = "role";
    pub const USER_ID: &str = "user_id";
    pub const TITLE: &str = "title";
    pub const DESCRIPTION: &str = "description";
    pub const START_DATE: &str = "start_date";
    pub const END_DATE: &str = "end_date";
    pub const STATUS: &str = "status";
    pub const HACKATHON_ID: &str = "hackathon_id";
    pub const PROJECT_ID: &str = "project_id";
    pub const FILENAME: &str = "filename";
    pub const CONTENT_TYPE: &str = "content_type";
    pub const FILE: &str = "file";
    pub const IMAGE: &str = "image";
    pub const DOMAIN: &str = "domain";
    pub const COMPANY_NAME: &str = "company_name";
    pub const CONTACT_EMAIL: &str = "contact_email";
    pub const DEFAULT_USER_ROLE: &str = "default_user_role";
}

/// Field-keyed, human readable validation messages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    /// Record `message` when `value` is blank
    pub fn require(&mut self, field: &str, value: &str, label: &str) {
        if value.trim().is_empty() {
            self.add(field, format!("{label} can not be blank."));
        }
    }

    pub fn merge(&mut self, other: FieldErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    /// All messages in field order
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.0.values().flatten().map(String::as_str)
    }

    /// `Ok(())` when empty, otherwise [`AppError::Invalid`]
    pub fn into_result(self) -> AppResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::Invalid(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<String> = self
            .0
            .iter()
            .map(|(field, messages)| format!("{field}: {}", messages.join(", ")))
            .collect();
        f.write_str(&joined.join("; "))
    }
}

impl From<validator::ValidationErrors> for FieldErrors {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut errors = FieldErrors::new();
        for (field, failures) in err.field_errors() {
            let field = field.to_string();
            for failure in failures {
                let message = match &failure.message {
                    Some(message) => message.to_string(),
                    None => match failure.code.as_ref() {
                        "email" => "is not a valid email address".to_string(),
                        "length" => "has an invalid length".to_string(),
                        "range" => "is out of range".to_string(),
                        "url" => "is not a valid URL".to_string(),
                        code => format!("is invalid ({code})"),
                    },
                };
                errors.add(&field, message);
            }
        }
        errors
    }
}
