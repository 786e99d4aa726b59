//! Business logic services

pub mod admin_service;
pub mod audit_service;
pub mod auth_service;
pub mod configuration_service;
pub mod domain_service;
pub mod file_service;
pub mod hackathon_service;
pub mod membership_service;
pub mod profile_service;
pub mod project_service;
pub mod user_service;

pub use admin_service::AdminService;
pub use audit_service::AuditService;
pub use auth_service::AuthService;
pub use configuration_service::ConfigurationService;
pub use domain_service::DomainService;
pub use file_service::FileService;
pub use hackathon_service::HackathonService;
pub use membership_service::MembershipService;
pub use profile_service::ProfileService;
pub use project_service::ProjectService;
pub use user_service::UserService;
