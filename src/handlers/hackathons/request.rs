//! Hackathon form DTOs

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    models::Hackathon,
    services::hackathon_service::HackathonDraft,
    utils::parse_datetime,
    validation::{fields, FieldErrors},
};

/// Hackathon form; dates arrive as `datetime-local` strings
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct HackathonForm {
    #[serde(default)]
    #[validate(length(max = 255))]
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub start_date: String,

    #[serde(default)]
    pub end_date: String,

    #[serde(default)]
    pub status: String,

    #[serde(default)]
    pub schedule: String,
}

impl HackathonForm {
    pub fn from_hackathon(hackathon: &Hackathon) -> Self {
        Self {
            title: hackathon.title.clone(),
            description: hackathon.description.clone(),
            start_date: hackathon.start_date.format("%Y-%m-%dT%H:%M").to_string(),
            end_date: hackathon.end_date.format("%Y-%m-%dT%H:%M").to_string(),
            status: hackathon.status.clone(),
            schedule: hackathon.schedule.clone(),
        }
    }

    /// Convert to a service draft, reporting dates that do not parse
    pub fn to_draft(&self) -> Result<HackathonDraft, FieldErrors> {
        let mut errors = self.validate().err().map(FieldErrors::from).unwrap_or_default();

        let start_date = parse_datetime(&self.start_date);
        if start_date.is_none() && !self.start_date.trim().is_empty() {
            errors.add(fields::START_DATE, "Start date is not a valid date");
        }
        let end_date = parse_datetime(&self.end_date);
        if end_date.is_none() && !self.end_date.trim().is_empty() {
            errors.add(fields::END_DATE, "End date is not a valid date");
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(HackathonDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            start_date,
            end_date,
            status: self.status.clone(),
            schedule: self.schedule.clone(),
        })
    }
}
