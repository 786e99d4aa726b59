//! Application-wide constants
//!
//! This module contains all constant values used throughout the application.
//! Constants are grouped by their purpose for better organization.

// =============================================================================
// SERVER DEFAULTS
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 3000;

// =============================================================================
// DATABASE DEFAULTS
// =============================================================================

/// Default maximum database connections in the pool
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 20;

// =============================================================================
// SESSION DEFAULTS
// =============================================================================

/// Default session lifetime in hours
pub const DEFAULT_SESSION_EXPIRY_HOURS: i64 = 8;

/// Cookie names
pub mod cookies {
    pub const SESSION: &str = "_hackathon_session";
    pub const FLASH: &str = "_hackathon_flash";
}

// =============================================================================
// PASSWORD POLICY
// =============================================================================

/// Lowest minimum length any configuration may ask for
pub const PASSWORD_LENGTH_FLOOR: usize = 6;

/// Characters accepted as "special" by the password policy
pub const PASSWORD_SPECIAL_CHARS: &str = "!@#$%^&*()_+-=[]{}|;':\",./<>?";

// =============================================================================
// UPLOAD LIMITS
// =============================================================================

/// Default maximum file upload size (10 MiB)
pub const DEFAULT_MAX_FILE_SIZE_BYTES: usize = 10 * 1024 * 1024;

/// Default maximum project image size (5 MiB)
pub const DEFAULT_MAX_IMAGE_SIZE_BYTES: usize = 5 * 1024 * 1024;

/// Extra room on top of the largest upload for multipart framing and form fields
pub const REQUEST_BODY_OVERHEAD_BYTES: usize = 2 * 1024 * 1024;

/// Length in bytes of generated file identifiers (hex encoded)
pub const FILE_ID_BYTES: usize = 16;

/// Length in bytes of generated hackathon identifiers (12 hex characters)
pub const HACKATHON_ID_BYTES: usize = 6;

// =============================================================================
// PAGINATION
// =============================================================================

pub const DEFAULT_PAGE_SIZE: i64 = 20;

pub const MAX_PAGE_SIZE: i64 = 100;

/// Number of projects shown on a hackathon page
pub const HACKATHON_PROJECTS_PAGE_SIZE: i64 = 20;

/// Number of recent records on the admin overview
pub const ADMIN_RECENT_LIMIT: i64 = 5;

// =============================================================================
// USER ROLES
// =============================================================================

/// User role identifiers
pub mod roles {
    pub const OWNER: &str = "owner";
    pub const HACKER: &str = "hacker";

    /// All user roles
    pub const ALL: &[&str] = &[OWNER, HACKER];
}

// =============================================================================
// HACKATHONS AND PROJECTS
// =============================================================================

/// Hackathon lifecycle statuses
pub mod hackathon_statuses {
    pub const UPCOMING: &str = "upcoming";
    pub const ACTIVE: &str = "active";
    pub const COMPLETED: &str = "completed";
    pub const HIDDEN: &str = "hidden";

    pub const ALL: &[&str] = &[UPCOMING, ACTIVE, COMPLETED, HIDDEN];
}

/// Project statuses
pub mod project_statuses {
    pub const DRAFT: &str = "draft";
    pub const ACTIVE: &str = "active";
    pub const COMPLETED: &str = "completed";

    pub const ALL: &[&str] = &[DRAFT, ACTIVE, COMPLETED];
}

// =============================================================================
// COMPANY CONFIGURATION DEFAULTS
// =============================================================================

pub mod company_defaults {
    pub const COMPANY_NAME: &str = "Hackathon Platform";
    pub const COMPANY_DESCRIPTION: &str = "A comprehensive hackathon management platform";
    pub const CONTACT_EMAIL: &str = "admin@hackathon.com";
}

// =============================================================================
// FLASH MESSAGES
// =============================================================================

/// Flash message kinds
pub mod flash_kinds {
    pub const SUCCESS: &str = "success";
    pub const INFO: &str = "info";
    pub const WARNING: &str = "warning";
    pub const DANGER: &str = "danger";
}

// =============================================================================
// AUDIT LOG VOCABULARY
// =============================================================================

pub mod audit_actions {
    pub const CREATE: &str = "create";
    pub const UPDATE: &str = "update";
    pub const DELETE: &str = "delete";
    pub const LOGIN: &str = "login";
    pub const LOGIN_FAILED: &str = "login_failed";
    pub const LOGOUT: &str = "logout";
    pub const REGISTER: &str = "register";
    pub const JOIN: &str = "join";
    pub const LEAVE: &str = "leave";
    pub const SET_PRESENTING: &str = "set_presenting";
    pub const UNSET_PRESENTING: &str = "unset_presenting";
    pub const PASSWORD_CHANGE: &str = "password_change";
    pub const PASSWORD_RESET: &str = "password_reset";
    pub const FORCE_PASSWORD_RESET: &str = "force_password_reset";
    pub const UPLOAD: &str = "upload";

    /// Action filter choices on the audit page
    pub const ALL: &[&str] = &[
        CREATE,
        UPDATE,
        DELETE,
        LOGIN,
        LOGIN_FAILED,
        LOGOUT,
        REGISTER,
        JOIN,
        LEAVE,
        SET_PRESENTING,
        UNSET_PRESENTING,
        PASSWORD_CHANGE,
        PASSWORD_RESET,
        FORCE_PASSWORD_RESET,
        UPLOAD,
    ];
}

pub mod resource_types {
    pub const USER: &str = "user";
    pub const HACKATHON: &str = "hackathon";
    pub const PROJECT: &str = "project";
    pub const MEMBERSHIP: &str = "project_membership";
    pub const FILE: &str = "file";
    pub const DOMAIN: &str = "company_allowed_domain";
    pub const CONFIGURATION: &str = "company_configuration";

    pub const ALL: &[&str] = &[USER, HACKATHON, PROJECT, MEMBERSHIP, FILE, DOMAIN, CONFIGURATION];
}
