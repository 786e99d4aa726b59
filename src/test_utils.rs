//! Test utilities: entity fixtures and an in-memory application
//!
//! The application is wired to a `MockRepository`, so HTTP scenarios run
//! without a database.

#[cfg(test)]
pub mod fixtures {
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use crate::constants::{hackathon_statuses, project_statuses, roles};
    use crate::models::{Hackathon, Project, User};
    use crate::services::AuthService;

    /// A hacker with the given email and password
    pub fn user_with_password(email: &str, password: &str) -> User {
        User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            name: "Ada Lovelace".to_string(),
            company_team: "Research".to_string(),
            role: roles::HACKER.to_string(),
            password_hash: AuthService::hash_password(password).unwrap(),
            force_password_reset: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    pub fn hacker() -> User {
        User {
            id: Uuid::new_v4(),
            email: "hacker@example.com".to_string(),
            name: "Grace Hopper".to_string(),
            company_team: "Compilers".to_string(),
            role: roles::HACKER.to_string(),
            // Hashing is slow and most tests never check passwords
            password_hash: String::new(),
            force_password_reset: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    pub fn owner() -> User {
        User {
            email: "owner@example.com".to_string(),
            name: "Margaret Hamilton".to_string(),
            role: roles::OWNER.to_string(),
            ..hacker()
        }
    }

    pub fn hackathon(owner_id: Uuid) -> Hackathon {
        let start = Utc::now();
        Hackathon {
            id: "a1b2c3d4e5f6".to_string(),
            title: "Spring Hack".to_string(),
            description: "Build something".to_string(),
            start_date: start,
            end_date: start + Duration::days(2),
            status: hackathon_statuses::ACTIVE.to_string(),
            owner_id,
            schedule: String::new(),
            created_at: start,
            updated_at: start,
        }
    }

    pub fn project(id: i64, hackathon_id: &str, founder: Option<Uuid>) -> Project {
        Project {
            id,
            hackathon_id: hackathon_id.to_string(),
            user_id: founder,
            name: "Robo".to_string(),
            description: "Builds robots".to_string(),
            repository_url: String::new(),
            demo_url: String::new(),
            status: project_statuses::ACTIVE.to_string(),
            image_data: None,
            image_content_type: None,
            presenting: false,
            presentation_order: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
pub mod test_app {
    use std::sync::Arc;

    use axum::{http::header::SET_COOKIE, response::Response, Router};

    use crate::config::{
        Config, DatabaseConfig, Environment, ServerConfig, SessionConfig, UploadConfig,
    };
    use crate::db::MockRepository;
    use crate::handlers;
    use crate::middleware::session::decode_flash;
    use crate::models::User;
    use crate::services::AuthService;
    use crate::state::AppState;

    pub const SESSION_SECRET: &str = "test-session-secret";

    pub fn test_config() -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                rust_log: "warn".to_string(),
                environment: Environment::Test,
                force_ssl: false,
            },
            database: DatabaseConfig {
                url: "postgres://unused".to_string(),
                max_connections: 1,
            },
            session: SessionConfig {
                secret: SESSION_SECRET.to_string(),
                expiry_hours: 1,
                cookie_secure: false,
            },
            uploads: UploadConfig::default(),
        }
    }

    /// Create the full application over a mocked repository
    pub fn create_test_app(repo: MockRepository) -> Router {
        create_test_app_with_config(repo, test_config())
    }

    pub fn create_test_app_with_config(repo: MockRepository, config: Config) -> Router {
        let state = AppState::with_repository(Arc::new(repo), config);
        handlers::app(state)
    }

    /// `Cookie` header value carrying a session for `user`
    pub fn session_cookie(user: &User) -> String {
        let token = AuthService::issue_session_token(user.id, &test_config().session).unwrap();
        format!("{}={}", crate::constants::cookies::SESSION, token)
    }

    /// Messages carried by the flash cookie a response sets
    pub fn flash_messages(response: &Response) -> Vec<String> {
        let prefix = format!("{}=", crate::constants::cookies::FLASH);
        response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .filter_map(|cookie| cookie.strip_prefix(prefix.as_str()))
            .flat_map(|cookie| decode_flash(cookie.split(';').next().unwrap_or_default()))
            .map(|flash| flash.message)
            .collect()
    }
}
