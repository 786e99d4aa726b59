//! Allowed email domain service

use uuid::Uuid;

use crate::{
    constants::{audit_actions, resource_types},
    db::Repository,
    error::{AppError, AppResult},
    models::{ClientInfo, CompanyAllowedDomain, DomainAttributes, User},
    services::audit_service::{AuditEntry, AuditService},
    validation::domain::{normalize_domain, validate},
};

/// Submitted domain fields; `is_active` defaults to on when absent
#[derive(Debug, Clone, Default)]
pub struct DomainDraft {
    pub domain: String,
    pub is_active: Option<bool>,
    pub description: String,
}

impl DomainDraft {
    fn attributes(self) -> AppResult<DomainAttributes> {
        validate(&self.domain).into_result()?;
        Ok(DomainAttributes {
            domain: normalize_domain(&self.domain),
            is_active: self.is_active.unwrap_or(true),
            description: self.description.trim().to_string(),
        })
    }
}

/// Domain service
pub struct DomainService;

impl DomainService {
    pub async fn list(repo: &dyn Repository) -> AppResult<Vec<CompanyAllowedDomain>> {
        repo.all_domains().await
    }

    pub async fn get(repo: &dyn Repository, id: Uuid) -> AppResult<CompanyAllowedDomain> {
        repo.find_domain(id)
            .await?
            .ok_or_else(|| AppError::not_found("Domain"))
    }

    pub async fn create(
        repo: &dyn Repository,
        draft: DomainDraft,
        actor: &User,
        client: &ClientInfo,
    ) -> AppResult<CompanyAllowedDomain> {
        let domain = repo.create_domain(draft.attributes()?).await?;

        let entry = AuditEntry::new(
            audit_actions::CREATE,
            resource_types::DOMAIN,
            format!("Added allowed domain: {}", domain.domain),
        )
        .actor(actor.id)
        .resource(domain.id);
        AuditService::record(repo, entry, client).await;

        Ok(domain)
    }

    pub async fn update(
        repo: &dyn Repository,
        id: Uuid,
        draft: DomainDraft,
        actor: &User,
        client: &ClientInfo,
    ) -> AppResult<CompanyAllowedDomain> {
        let existing = Self::get(repo, id).await?;
        let domain = repo.update_domain(existing.id, draft.attributes()?).await?;

        let entry = AuditEntry::new(
            audit_actions::UPDATE,
            resource_types::DOMAIN,
            format!("Updated allowed domain: {}", domain.domain),
        )
        .actor(actor.id)
        .resource(domain.id);
        AuditService::record(repo, entry, client).await;

        Ok(domain)
    }

    pub async fn delete(
        repo: &dyn Repository,
        id: Uuid,
        actor: &User,
        client: &ClientInfo,
    ) -> AppResult<CompanyAllowedDomain> {
        let domain = Self::get(repo, id).await?;
        repo.delete_domain(domain.id).await?;

        let entry = AuditEntry::new(
            audit_actions::DELETE,
            resource_types::DOMAIN,
            format!("Deleted allowed domain: {}", domain.domain),
        )
        .actor(actor.id)
        .resource(domain.id);
        AuditService::record(repo, entry, client).await;

        Ok(domain)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::db::MockRepository;
    use crate::test_utils::fixtures;

    fn stored(attrs: DomainAttributes) -> CompanyAllowedDomain {
        CompanyAllowedDomain {
            id: Uuid::new_v4(),
            domain: attrs.domain,
            is_active: attrs.is_active,
            description: attrs.description,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_normalizes_and_defaults_to_active() {
        let mut repo = MockRepository::new();
        repo.expect_create_domain()
            .once()
            .withf(|attrs| attrs.domain == "example.com" && attrs.is_active)
            .return_once(|attrs| Ok(stored(attrs)));
        repo.expect_insert_audit_log()
            .once()
            .withf(|row| row.resource_type == "company_allowed_domain" && row.action == "create")
            .return_once(|_| Ok(()));

        let draft = DomainDraft {
            domain: " @Example.COM".to_string(),
            is_active: None,
            description: "Staff".to_string(),
        };
        let domain = DomainService::create(&repo, draft, &fixtures::owner(), &ClientInfo::default())
            .await
            .unwrap();
        assert_eq!(domain.domain, "example.com");
    }

    #[tokio::test]
    async fn test_invalid_domain_is_rejected() {
        let mut repo = MockRepository::new();
        repo.expect_create_domain().never();

        let draft = DomainDraft {
            domain: "localhost".to_string(),
            ..DomainDraft::default()
        };
        let result = DomainService::create(&repo, draft, &fixtures::owner(), &ClientInfo::default()).await;
        assert!(matches!(result, Err(AppError::Invalid(errors)) if errors.has("domain")));
    }

    #[tokio::test]
    async fn test_delete_unknown_domain() {
        let mut repo = MockRepository::new();
        repo.expect_find_domain().return_once(|_| Ok(None));
        repo.expect_delete_domain().never();

        let result = DomainService::delete(&repo, Uuid::new_v4(), &fixtures::owner(), &ClientInfo::default()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
