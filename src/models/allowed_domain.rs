//! Registration domain allow-list model

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CompanyAllowedDomain {
    pub id: Uuid,
    pub domain: String,
    pub is_active: bool,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Attributes of an allowed domain, used for both create and update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainAttributes {
    pub domain: String,
    pub is_active: bool,
    pub description: String,
}

/// Extract the domain part of an email address, lower-cased
pub fn email_domain(email: &str) -> Option<String> {
    let (local, domain) = email.trim().rsplit_once('@')?;
    if local.is_empty() || domain.is_empty() {
        return None;
    }
    Some(domain.to_lowercase())
}
