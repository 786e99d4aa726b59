//! HackHub - Hackathon Management Platform
//!
//! This library provides the core functionality for HackHub, a web
//! application for running company hackathons.
//!
//! # Features
//!
//! - Registration with an allowed email domain list and a configurable password policy
//! - Hackathons with schedules, projects, teams and presenting order
//! - File uploads attached to hackathons and projects
//! - An owner back-office with company configuration and an audit trail
//!
//! # Architecture
//!
//! The application follows a layered architecture:
//! - **Handlers**: HTTP request handlers (thin layer)
//! - **Services**: Business logic
//! - **Repositories**: Database access
//! - **Models**: Domain models and DTOs

pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;
pub mod validation;

#[cfg(test)]
mod test_utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::AppState;
