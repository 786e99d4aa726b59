//! Hackathon validation

use chrono::{DateTime, Utc};

use crate::models::HackathonStatus;

use super::{fields, FieldErrors};

/// Values submitted through the hackathon forms
#[derive(Debug, Clone)]
pub struct HackathonInput<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub status: &'a str,
}

/// General rules shared by create and update
pub fn validate(input: &HackathonInput<'_>) -> FieldErrors {
    let mut errors = FieldErrors::new();

    errors.require(fields::TITLE, input.title, "Title");
    errors.require(fields::DESCRIPTION, input.description, "Description");

    if input.start_date.is_none() {
        errors.add(fields::START_DATE, "StartDate can not be blank.");
    }
    if input.end_date.is_none() {
        errors.add(fields::END_DATE, "EndDate can not be blank.");
    }
    if let (Some(start), Some(end)) = (input.start_date, input.end_date) {
        if end < start {
            errors.add(fields::END_DATE, "End date must not be before the start date");
        }
    }
    if HackathonStatus::parse(input.status).is_none() {
        errors.add(fields::STATUS, "Status must be one of upcoming, active, completed, hidden");
    }

    errors
}

pub fn validate_create(input: &HackathonInput<'_>) -> FieldErrors {
    validate(input)
}

pub fn validate_update(input: &HackathonInput<'_>) -> FieldErrors {
    validate(input)
}
