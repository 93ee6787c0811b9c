use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;

use crate::api::{AppState, AUTH_USER_HEADER};
use crate::service::AuthError;

pub fn routes() -> Router<AppState> {
    Router::new().route("/gwfa", get(forward_auth))
}

/// GET /gwfa — forward-auth hook for the edge gateway.
///
/// The gateway calls this once per proxied request; on 200 it copies the
/// `X-Auth-User` response header onto the upstream request. Token codec
/// only — this path never touches the session store.
async fn forward_auth(
    State(svc): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AuthError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(AuthError::Unauthorized)?;

    let user_id = svc.forward_auth(token)?;
    Ok(([(AUTH_USER_HEADER, user_id.to_string())], StatusCode::OK))
}
