//! HTTP middleware

pub mod auth;
pub mod force_ssl;
pub mod logging;
pub mod session;

pub use auth::{authorize, password_reset_gate, require_hackathon_owner, require_owner};
pub use force_ssl::force_ssl;
pub use logging::logging_middleware;
pub use session::{session_loader, Flash, RequestContext};
