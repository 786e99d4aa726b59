//! Database module
//!
//! This module handles database connections, migrations, and repositories.

pub mod connection;
pub mod manager;
pub mod repositories;
pub mod repository;

use sqlx::PgPool;

pub use connection::*;
pub use manager::RepositoryManager;
#[cfg(test)]
pub use repository::MockRepository;
pub use repository::Repository;

/// Run database migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
