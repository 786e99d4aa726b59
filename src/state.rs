//! Application state management
//!
//! This module contains the shared application state that is passed
//! to all request handlers via Axum's State extractor.

use std::sync::Arc;

use sqlx::PgPool;

use crate::{
    config::Config,
    db::{Repository, RepositoryManager},
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

/// Inner state (wrapped in Arc for cheap cloning)
struct AppStateInner {
    /// Data access for every service
    repo: Arc<dyn Repository>,

    /// Application configuration
    config: Config,
}

impl AppState {
    /// Create application state backed by PostgreSQL
    pub fn new(pool: PgPool, config: Config) -> Self {
        Self::with_repository(Arc::new(RepositoryManager::new(pool)), config)
    }

    /// Create application state over any repository implementation
    pub fn with_repository(repo: Arc<dyn Repository>, config: Config) -> Self {
        Self {
            inner: Arc::new(AppStateInner { repo, config }),
        }
    }

    /// Get a reference to the repository
    pub fn repo(&self) -> &dyn Repository {
        self.inner.repo.as_ref()
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }
}
