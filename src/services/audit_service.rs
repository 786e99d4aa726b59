//! Audit trail service
//!
//! Writes are best effort: a failed insert is logged and never reaches the
//! caller, so the action being audited always keeps its outcome.

use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use crate::{
    db::Repository,
    error::AppResult,
    models::{AuditLog, AuditLogFilter, ClientInfo, Identifier, NewAuditLog, PageParams, Paginated},
};

/// One auditable event
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub actor: Option<Uuid>,
    pub action: &'static str,
    pub resource_type: &'static str,
    pub resource_id: Option<Identifier>,
    pub details: String,
}

impl AuditEntry {
    pub fn new(action: &'static str, resource_type: &'static str, details: impl Into<String>) -> Self {
        Self {
            actor: None,
            action,
            resource_type,
            resource_id: None,
            details: details.into(),
        }
    }

    pub fn actor(mut self, user_id: Uuid) -> Self {
        self.actor = Some(user_id);
        self
    }

    pub fn resource(mut self, id: impl Into<Identifier>) -> Self {
        self.resource_id = Some(id.into());
        self
    }
}

/// A page of audit logs with the names of the users they mention
#[derive(Debug, Serialize)]
pub struct AuditLogPage {
    pub logs: Paginated<AuditLog>,
    pub user_names: HashMap<Uuid, String>,
}

/// Audit service
pub struct AuditService;

impl AuditService {
    /// Append an entry, logging and swallowing any failure
    pub async fn record(repo: &dyn Repository, entry: AuditEntry, client: &ClientInfo) {
        let action = entry.action;
        let resource_type = entry.resource_type;

        let row = NewAuditLog {
            user_id: entry.actor,
            action: entry.action.to_string(),
            resource_type: entry.resource_type.to_string(),
            resource_id: entry.resource_id.map(|id| id.to_string()),
            details: entry.details,
            ip_address: client.ip_address.clone(),
            user_agent: client.user_agent.clone(),
        };

        if let Err(e) = repo.insert_audit_log(row).await {
            tracing::error!(error = %e, action, resource_type, "Failed to create audit log");
        }
    }

    /// Paginated audit logs, newest first
    pub async fn list(
        repo: &dyn Repository,
        filter: AuditLogFilter,
        page: PageParams,
    ) -> AppResult<AuditLogPage> {
        let logs = repo.list_audit_logs(filter, page).await?;

        let mut user_ids: Vec<Uuid> = logs.items.iter().filter_map(|log| log.user_id).collect();
        user_ids.sort_unstable();
        user_ids.dedup();

        let user_names = if user_ids.is_empty() {
            HashMap::new()
        } else {
            repo.find_users_by_ids(&user_ids)
                .await?
                .into_iter()
                .map(|user| (user.id, user.name))
                .collect()
        };

        Ok(AuditLogPage { logs, user_names })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{audit_actions, resource_types};
    use crate::db::MockRepository;
    use crate::error::AppError;

    fn client() -> ClientInfo {
        ClientInfo {
            ip_address: "10.0.0.7".to_string(),
            user_agent: "curl/8.0".to_string(),
        }
    }

    #[tokio::test]
    async fn test_record_stringifies_identifier() {
        let actor = Uuid::new_v4();
        let mut repo = MockRepository::new();
        repo.expect_insert_audit_log()
            .once()
            .withf(move |row| {
                row.user_id == Some(actor)
                    && row.action == "create"
                    && row.resource_type == "project"
                    && row.resource_id.as_deref() == Some("42")
                    && row.details == "Project created: Robo"
                    && row.ip_address == "10.0.0.7"
            })
            .return_once(|_| Ok(()));

        let entry = AuditEntry::new(audit_actions::CREATE, resource_types::PROJECT, "Project created: Robo")
            .actor(actor)
            .resource(42_i64);
        AuditService::record(&repo, entry, &client()).await;
    }

    #[tokio::test]
    async fn test_record_swallows_failures() {
        let mut repo = MockRepository::new();
        repo.expect_insert_audit_log()
            .once()
            .return_once(|_| Err(AppError::Database("connection reset".to_string())));

        let entry = AuditEntry::new(audit_actions::LOGOUT, resource_types::USER, "bye");
        AuditService::record(&repo, entry, &client()).await;
    }
}
