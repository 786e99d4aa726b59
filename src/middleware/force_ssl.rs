//! HTTPS redirect for deployments behind a TLS-terminating proxy

use axum::{
    body::Body,
    extract::{Request, State},
    http::header::HOST,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::state::AppState;

const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Redirect plain HTTP requests to HTTPS when `FORCE_SSL` is on
///
/// The proxy reports the original scheme in `X-Forwarded-Proto`.
pub async fn force_ssl(State(state): State<AppState>, request: Request<Body>, next: Next) -> Response {
    if !state.config().server.force_ssl {
        return next.run(request).await;
    }

    let secure = request
        .headers()
        .get(FORWARDED_PROTO)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|proto| proto.eq_ignore_ascii_case("https"));
    if secure {
        return next.run(request).await;
    }

    let host = request
        .headers()
        .get(HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    let path_and_query = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    Redirect::permanent(&format!("https://{host}{path_and_query}")).into_response()
}
