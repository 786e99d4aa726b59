//! Session and flash cookies
//!
//! The session loader resolves the signed-in user from the session cookie,
//! decodes pending flash messages and hands both to the rest of the chain as
//! a [`RequestContext`]. Once the handler has run it writes back whatever the
//! handler changed: a new or cleared session and any flash not yet shown.

use std::{
    net::SocketAddr,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use axum::{
    body::Body,
    extract::{ConnectInfo, FromRequestParts, Request, State},
    http::{header::USER_AGENT, request::Parts, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::{
    constants::{cookies, flash_kinds},
    error::{AppError, AppResult},
    models::{ClientInfo, User},
    services::AuthService,
    state::AppState,
};

/// A one-shot message shown on the next rendered page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionChange {
    Unchanged,
    SignIn(Uuid),
    SignOut,
}

#[derive(Debug)]
struct Pending {
    flash: Vec<Flash>,
    session: SessionChange,
}

/// Per-request state shared between middleware and handlers
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub current_user: Option<User>,
    pub client: ClientInfo,
    pending: Arc<Mutex<Pending>>,
}

impl RequestContext {
    pub fn new(current_user: Option<User>, client: ClientInfo, flash: Vec<Flash>) -> Self {
        Self {
            current_user,
            client,
            pending: Arc::new(Mutex::new(Pending {
                flash,
                session: SessionChange::Unchanged,
            })),
        }
    }

    fn pending(&self) -> MutexGuard<'_, Pending> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn flash(&self, kind: &str, message: impl Into<String>) {
        self.pending().flash.push(Flash {
            kind: kind.to_string(),
            message: message.into(),
        });
    }

    pub fn success(&self, message: impl Into<String>) {
        self.flash(flash_kinds::SUCCESS, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.flash(flash_kinds::INFO, message);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.flash(flash_kinds::WARNING, message);
    }

    pub fn danger(&self, message: impl Into<String>) {
        self.flash(flash_kinds::DANGER, message);
    }

    /// Remove and return every pending flash; called when a page renders
    pub fn take_flash(&self) -> Vec<Flash> {
        std::mem::take(&mut self.pending().flash)
    }

    pub fn sign_in(&self, user_id: Uuid) {
        self.pending().session = SessionChange::SignIn(user_id);
    }

    pub fn sign_out(&self) {
        self.pending().session = SessionChange::SignOut;
    }

    /// The signed-in user; routes behind `authorize` always have one
    pub fn user(&self) -> AppResult<&User> {
        self.current_user
            .as_ref()
            .ok_or_else(|| AppError::Forbidden("Not signed in".to_string()))
    }

    pub fn is_owner(&self) -> bool {
        self.current_user.as_ref().is_some_and(User::is_owner)
    }
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("session loader not installed")))
    }
}

/// Session loader middleware
pub async fn session_loader(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let jar = CookieJar::from_headers(request.headers());

    let mut stale_session = false;
    let current_user = match jar.get(cookies::SESSION) {
        Some(cookie) => {
            let user = load_user(&state, cookie.value()).await;
            stale_session = user.is_none();
            user
        }
        None => None,
    };

    let had_flash = jar.get(cookies::FLASH).is_some();
    let flash = jar
        .get(cookies::FLASH)
        .map(|cookie| decode_flash(cookie.value()))
        .unwrap_or_default();

    let client = client_info(&request);
    let ctx = RequestContext::new(current_user, client, flash);
    request.extensions_mut().insert(ctx.clone());

    let response = next.run(request).await;

    let (remaining, change) = {
        let mut pending = ctx.pending();
        (std::mem::take(&mut pending.flash), pending.session)
    };

    let session = &state.config().session;
    let mut jar = jar;
    match change {
        SessionChange::SignIn(user_id) => match AuthService::issue_session_token(user_id, session) {
            Ok(token) => jar = jar.add(cookie(cookies::SESSION, token, session.cookie_secure)),
            Err(e) => tracing::error!(error = %e, "Failed to issue session token"),
        },
        SessionChange::SignOut => jar = jar.remove(removal(cookies::SESSION)),
        SessionChange::Unchanged if stale_session => jar = jar.remove(removal(cookies::SESSION)),
        SessionChange::Unchanged => {}
    }

    if !remaining.is_empty() {
        jar = jar.add(cookie(cookies::FLASH, encode_flash(&remaining), session.cookie_secure));
    } else if had_flash {
        jar = jar.remove(removal(cookies::FLASH));
    }

    (jar, response).into_response()
}

async fn load_user(state: &AppState, token: &str) -> Option<User> {
    let user_id = match AuthService::verify_session_token(token, &state.config().session.secret) {
        Ok(id) => id,
        Err(e) => {
            debug!(error = ?e, "Ignoring invalid session cookie");
            return None;
        }
    };

    match state.repo().find_user(user_id).await {
        Ok(user) => user,
        Err(e) => {
            tracing::error!(error = %e, %user_id, "Failed to load session user");
            None
        }
    }
}

fn cookie(name: &'static str, value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

fn removal(name: &'static str) -> Cookie<'static> {
    Cookie::build(name).path("/").build()
}

pub fn encode_flash(flash: &[Flash]) -> String {
    serde_json::to_vec(flash)
        .map(|json| URL_SAFE_NO_PAD.encode(json))
        .unwrap_or_default()
}

/// Malformed cookies decode to no messages
pub fn decode_flash(value: &str) -> Vec<Flash> {
    URL_SAFE_NO_PAD
        .decode(value)
        .ok()
        .and_then(|json| serde_json::from_slice(&json).ok())
        .unwrap_or_default()
}

/// Peer address and user agent recorded in audit entries
fn client_info(request: &Request<Body>) -> ClientInfo {
    let ip_address = forwarded_for(request.headers())
        .or_else(|| {
            request
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        })
        .unwrap_or_default();

    let user_agent = request
        .headers()
        .get(USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();

    ClientInfo {
        ip_address,
        user_agent,
    }
}

fn forwarded_for(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flash_cookie_round_trip() {
        let flash = vec![Flash {
            kind: "danger".to_string(),
            message: "You must be signed in to access that page".to_string(),
        }];
        let encoded = encode_flash(&flash);
        assert!(!encoded.contains(['=', ';', ',', ' ']));
        assert_eq!(decode_flash(&encoded), flash);
    }

    #[test]
    fn test_garbage_flash_cookie_is_ignored() {
        assert!(decode_flash("not base64 !").is_empty());
    }

    #[test]
    fn test_take_flash_drains() {
        let ctx = RequestContext::new(None, ClientInfo::default(), Vec::new());
        ctx.success("Saved");
        ctx.warning("Careful");
        assert_eq!(ctx.take_flash().len(), 2);
        assert!(ctx.take_flash().is_empty());
    }

    #[test]
    fn test_forwarded_for_takes_first_hop() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "203.0.113.7, 10.0.0.1".parse().unwrap());
        assert_eq!(forwarded_for(&headers).as_deref(), Some("203.0.113.7"));
    }
}
