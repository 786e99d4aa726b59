//! Profile service: the signed-in user's own account

use std::collections::HashSet;

use serde::Serialize;

use crate::{
    constants::{audit_actions, resource_types},
    db::Repository,
    error::AppResult,
    models::{ClientInfo, Hackathon, Project, User, UserChanges, UserRole},
    services::{
        audit_service::{AuditEntry, AuditService},
        AuthService,
    },
    validation::{self, fields, user::normalize_email, FieldErrors},
};

pub const MSG_WRONG_CURRENT_PASSWORD: &str = "Current password is incorrect";
pub const MSG_NEW_PASSWORD_REQUIRED: &str = "New password is required";
pub const MSG_CONFIRMATION_MISMATCH: &str = "Password confirmation does not match";
pub const MSG_PASSWORD_UNCHANGED: &str = "New password must be different from your current password";

/// What the profile page shows
#[derive(Debug, Serialize)]
pub struct ProfileOverview {
    pub hackathons: Vec<Hackathon>,
    /// Founded and joined projects, each listed once
    pub projects: Vec<Project>,
}

#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub name: String,
    pub company_team: String,
    pub email: String,
}

#[derive(Debug, Clone, Default)]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
    pub confirmation: String,
}

/// Profile service
pub struct ProfileService;

impl ProfileService {
    pub async fn overview(repo: &dyn Repository, user: &User) -> AppResult<ProfileOverview> {
        let hackathons = repo.hackathons_by_owner(user.id).await?;

        let mut projects = repo.projects_by_user(user.id).await?;
        let mut seen: HashSet<i64> = projects.iter().map(|p| p.id).collect();
        for project in repo.projects_joined_by_user(user.id).await? {
            if seen.insert(project.id) {
                projects.push(project);
            }
        }

        Ok(ProfileOverview {
            hackathons,
            projects,
        })
    }

    pub async fn update(
        repo: &dyn Repository,
        user: &User,
        changes: ProfileChanges,
        client: &ClientInfo,
    ) -> AppResult<User> {
        let email = normalize_email(&changes.email);

        let mut errors = validation::user::validate(repo, &email, Some(user.id)).await?;
        errors.require(fields::NAME, &changes.name, "Name");
        errors.into_result()?;

        let role = UserRole::parse(&user.role).unwrap_or(UserRole::Hacker);
        let updated = repo
            .update_user(
                user.id,
                UserChanges {
                    email,
                    name: changes.name.trim().to_string(),
                    company_team: changes.company_team.trim().to_string(),
                    role,
                    force_password_reset: user.force_password_reset,
                },
            )
            .await?;

        let entry = AuditEntry::new(
            audit_actions::UPDATE,
            resource_types::USER,
            format!("Profile updated: {} ({})", updated.name, updated.email),
        )
        .actor(user.id)
        .resource(user.id);
        AuditService::record(repo, entry, client).await;

        Ok(updated)
    }

    /// Change the password after checking the current one
    ///
    /// Checks run in order and stop at the first failure.
    pub async fn change_password(
        repo: &dyn Repository,
        user: &User,
        change: PasswordChange,
        client: &ClientInfo,
    ) -> AppResult<User> {
        if !AuthService::verify_password(&change.current_password, &user.password_hash)? {
            return Err(FieldErrors::single(fields::CURRENT_PASSWORD, MSG_WRONG_CURRENT_PASSWORD).into());
        }
        if change.new_password.is_empty() {
            return Err(FieldErrors::single(fields::PASSWORD, MSG_NEW_PASSWORD_REQUIRED).into());
        }
        if change.new_password != change.confirmation {
            return Err(FieldErrors::single(fields::PASSWORD, MSG_CONFIRMATION_MISMATCH).into());
        }
        if change.new_password == change.current_password {
            return Err(FieldErrors::single(fields::PASSWORD, MSG_PASSWORD_UNCHANGED).into());
        }

        validation::user::validate_create(repo, &change.new_password, &change.confirmation)
            .await
            .into_result()?;

        let password_hash = AuthService::hash_password(&change.new_password)?;
        let updated = repo.update_password(user.id, &password_hash, false).await?;

        let entry = AuditEntry::new(
            audit_actions::PASSWORD_CHANGE,
            resource_types::USER,
            format!("Password changed: {}", updated.email),
        )
        .actor(user.id)
        .resource(user.id);
        AuditService::record(repo, entry, client).await;

        Ok(updated)
    }
}
