//! Domain models
//!
//! This module contains all domain models used throughout the application.

pub mod allowed_domain;
pub mod audit_log;
pub mod company_configuration;
pub mod file;
pub mod hackathon;
pub mod identifier;
pub mod membership;
pub mod pagination;
pub mod project;
pub mod user;

pub use allowed_domain::*;
pub use audit_log::*;
pub use company_configuration::*;
pub use file::*;
pub use hackathon::*;
pub use identifier::*;
pub use membership::*;
pub use pagination::*;
pub use project::*;
pub use user::*;
