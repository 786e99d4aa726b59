//! Hackathon model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::constants::hackathon_statuses;

/// Hackathon database model
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Hackathon {
    pub id: String,
    pub title: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: String,
    pub owner_id: Uuid,
    pub schedule: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Hackathon {
    /// Length of the event in whole days, never less than one
    pub fn duration_days(&self) -> i64 {
        if self.end_date > self.start_date {
            (self.end_date - self.start_date).num_days().max(1)
        } else {
            1
        }
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id
    }
}

/// Hackathon lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HackathonStatus {
    Upcoming,
    Active,
    Completed,
    Hidden,
}

impl HackathonStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upcoming => hackathon_statuses::UPCOMING,
            Self::Active => hackathon_statuses::ACTIVE,
            Self::Completed => hackathon_statuses::COMPLETED,
            Self::Hidden => hackathon_statuses::HIDDEN,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            hackathon_statuses::UPCOMING => Some(Self::Upcoming),
            hackathon_statuses::ACTIVE => Some(Self::Active),
            hackathon_statuses::COMPLETED => Some(Self::Completed),
            hackathon_statuses::HIDDEN => Some(Self::Hidden),
            _ => None,
        }
    }
}

impl std::fmt::Display for HackathonStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Insert payload for a hackathon
#[derive(Debug, Clone)]
pub struct NewHackathon {
    pub id: String,
    pub title: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: HackathonStatus,
    pub owner_id: Uuid,
    pub schedule: String,
}

/// Mutable hackathon attributes
#[derive(Debug, Clone)]
pub struct HackathonChanges {
    pub title: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: HackathonStatus,
    pub schedule: String,
}

/// Admin hackathon list filter
#[derive(Debug, Clone, Default)]
pub struct HackathonFilter {
    pub search: Option<String>,
    pub status: Option<String>,
}
