use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::{AppState, AUTH_USER_HEADER};
use crate::model::{LoginRequest, RefreshRequest, TokenPair};
use crate::service::AuthError;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/logout", get(logout))
}

/// POST /login — authenticate with phone and password.
async fn login(
    State(svc): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<TokenPair>, AuthError> {
    let Json(req) = body.map_err(|e| AuthError::BadRequest(e.body_text()))?;
    if req.phone.trim().is_empty() || req.password.is_empty() {
        return Err(AuthError::BadRequest("phone and password are required".into()));
    }

    let pair = svc.login(&req.phone, &req.password)?;
    Ok(Json(pair))
}

/// POST /refresh — exchange a refresh token for a new pair.
async fn refresh(
    State(svc): State<AppState>,
    body: Result<Json<RefreshRequest>, JsonRejection>,
) -> Result<Json<TokenPair>, AuthError> {
    let Json(req) = body.map_err(|e| AuthError::BadRequest(e.body_text()))?;

    // Refresh tokens are UUIDs; reject anything else before touching the
    // store.
    if uuid::Uuid::try_parse(&req.token).is_err() {
        return Err(AuthError::BadRequest("token must be a UUID".into()));
    }

    let pair = svc.refresh(&req.token)?;
    Ok(Json(pair))
}

/// GET /logout — drop all sessions of the calling user.
///
/// The user id arrives in the gateway-injected header; only the gateway
/// can reach this service, so the header is trusted as-is.
async fn logout(
    State(svc): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, AuthError> {
    let user_id = headers
        .get(AUTH_USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<i64>().ok())
        .ok_or(AuthError::Unauthorized)?;

    svc.logout(user_id)?;
    Ok(StatusCode::OK)
}
