//! Database repositories
//!
//! Repositories handle all direct database interactions.

pub mod audit_repo;
pub mod configuration_repo;
pub mod domain_repo;
pub mod file_repo;
pub mod hackathon_repo;
pub mod membership_repo;
pub mod project_repo;
pub mod user_repo;

pub use audit_repo::AuditLogRepository;
pub use configuration_repo::CompanyConfigurationRepository;
pub use domain_repo::CompanyAllowedDomainRepository;
pub use file_repo::FileRepository;
pub use hackathon_repo::HackathonRepository;
pub use membership_repo::ProjectMembershipRepository;
pub use project_repo::ProjectRepository;
pub use user_repo::UserRepository;
