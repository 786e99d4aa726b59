//! Company configuration service

use crate::{
    constants::{audit_actions, resource_types},
    db::Repository,
    error::AppResult,
    models::{ClientInfo, CompanyConfiguration, ConfigurationSettings, User},
    services::audit_service::{AuditEntry, AuditService},
    validation,
};

/// Result of applying submitted settings
#[derive(Debug)]
pub struct ConfigurationUpdate {
    pub configuration: CompanyConfiguration,
    /// Names of the fields that differed, empty when nothing was written
    pub changed: Vec<&'static str>,
}

/// Company configuration service
pub struct ConfigurationService;

impl ConfigurationService {
    /// Canonical configuration row, created with defaults on first access
    pub async fn load(repo: &dyn Repository) -> AppResult<CompanyConfiguration> {
        match repo.canonical_configuration().await? {
            Some(configuration) => Ok(configuration),
            None => {
                tracing::info!("No company configuration found, creating defaults");
                repo.create_configuration(ConfigurationSettings::default()).await
            }
        }
    }

    /// Current settings without creating a row
    pub async fn settings(repo: &dyn Repository) -> AppResult<ConfigurationSettings> {
        Ok(repo
            .canonical_configuration()
            .await?
            .map(|configuration| configuration.settings)
            .unwrap_or_default())
    }

    /// Apply only the fields that differ from the stored configuration
    pub async fn update(
        repo: &dyn Repository,
        incoming: ConfigurationSettings,
        actor: &User,
        client: &ClientInfo,
    ) -> AppResult<ConfigurationUpdate> {
        validation::config::validate(&incoming).into_result()?;

        let mut configuration = Self::load(repo).await?;
        let changed = configuration.settings.update_changed_fields(&incoming);
        if changed.is_empty() {
            return Ok(ConfigurationUpdate {
                configuration,
                changed,
            });
        }

        let configuration = repo
            .update_configuration(configuration.id, configuration.settings)
            .await?;

        let entry = AuditEntry::new(
            audit_actions::UPDATE,
            resource_types::CONFIGURATION,
            format!("Updated company configuration: {}", changed.join(", ")),
        )
        .actor(actor.id)
        .resource(configuration.id);
        AuditService::record(repo, entry, client).await;

        Ok(ConfigurationUpdate {
            configuration,
            changed,
        })
    }
}
