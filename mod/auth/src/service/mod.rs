pub mod session;
pub mod token;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::lookup::UserLookup;
use crate::store::SessionStore;

pub use token::TokenCodec;

// ── Error codes ─────────────────────────────────────────────────────
//
// Stable, machine-readable identifiers. Clients match on these —
// never on the human-readable message string.

/// Stable numeric error codes.
///
/// Clients should match on `code` from `{"code": 1001, "message": "..."}`.
/// Codes never change; messages may be reworded.
pub mod error_code {
    pub const INTERNAL: u16 = 1000;
    pub const INVALID_CREDENTIALS: u16 = 1001;
    pub const USER_IS_INACTIVE: u16 = 1002;
    pub const NO_SESSION_TO_REFRESH: u16 = 1003;
    pub const TOKEN_EXPIRED: u16 = 1004;
    pub const FAILED_PARSING_TOKEN: u16 = 1005;
    pub const FAILED_PARSING_TOKEN_CLAIMS: u16 = 1006;
    pub const UNAUTHORIZED: u16 = 1007;
    pub const BAD_REQUEST: u16 = 1008;
}

// ── AuthError ───────────────────────────────────────────────────────

/// Auth service error type.
///
/// Each variant maps to a stable numeric code (see [`error_code`]) and an
/// HTTP status code. The JSON response always includes both:
///
/// ```json
/// {"code": 1001, "message": "invalid credentials"}
/// ```
///
/// Storage and internal failures are logged with context and surface as a
/// generic 500 body, never leaking backend details.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown phone or wrong password. Deliberately one error. HTTP 401.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The account exists but is deactivated. HTTP 403.
    #[error("user is inactive")]
    UserIsInactive,

    /// The refresh token matches no live session: unknown, already
    /// consumed, or logged out. HTTP 401.
    #[error("no session to refresh")]
    NoSessionToRefresh,

    /// The session outlived its refresh lifetime. HTTP 401.
    #[error("token expired")]
    TokenExpired,

    /// Access token failed structural or signature verification. HTTP 401.
    #[error("failed parsing token")]
    FailedParsingToken,

    /// Access token verified, but the claims payload does not
    /// deserialize. HTTP 401.
    #[error("failed parsing token claims")]
    FailedParsingTokenClaims,

    /// Missing or garbled credential material in the request. HTTP 401.
    #[error("unauthorized")]
    Unauthorized,

    /// Malformed request input. HTTP 400.
    #[error("{0}")]
    BadRequest(String),

    /// Storage backend failure. HTTP 500.
    #[error("storage: {0}")]
    Storage(String),

    /// Unexpected internal error. HTTP 500.
    #[error("internal: {0}")]
    Internal(String),
}

impl AuthError {
    /// Stable, machine-readable error code.
    pub fn code(&self) -> u16 {
        match self {
            AuthError::InvalidCredentials => error_code::INVALID_CREDENTIALS,
            AuthError::UserIsInactive => error_code::USER_IS_INACTIVE,
            AuthError::NoSessionToRefresh => error_code::NO_SESSION_TO_REFRESH,
            AuthError::TokenExpired => error_code::TOKEN_EXPIRED,
            AuthError::FailedParsingToken => error_code::FAILED_PARSING_TOKEN,
            AuthError::FailedParsingTokenClaims => error_code::FAILED_PARSING_TOKEN_CLAIMS,
            AuthError::Unauthorized => error_code::UNAUTHORIZED,
            AuthError::BadRequest(_) => error_code::BAD_REQUEST,
            AuthError::Storage(_) | AuthError::Internal(_) => error_code::INTERNAL,
        }
    }

    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidCredentials
            | AuthError::NoSessionToRefresh
            | AuthError::TokenExpired
            | AuthError::FailedParsingToken
            | AuthError::FailedParsingTokenClaims
            | AuthError::Unauthorized => StatusCode::UNAUTHORIZED,
            AuthError::UserIsInactive => StatusCode::FORBIDDEN,
            AuthError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AuthError::Storage(_) | AuthError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "auth request failed");
            "internal error".to_string()
        } else {
            self.to_string()
        };
        let body = serde_json::json!({
            "code": self.code(),
            "message": message,
        });
        (status, axum::Json(body)).into_response()
    }
}

// ── AuthConfig ──────────────────────────────────────────────────────

/// Configuration for the auth service.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Symmetric signing secret (HS256).
    pub jwt_secret: String,
    /// Access token lifetime in seconds (default: 24h).
    pub access_ttl_secs: i64,
    /// Refresh session lifetime in seconds (default: 30 days).
    pub refresh_ttl_secs: i64,
    /// `aud` claim stamped into and required from access tokens.
    pub audience: String,
    /// `iss` claim stamped into and required from access tokens.
    pub issuer: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "domus-dev-secret-change-me".to_string(),
            access_ttl_secs: 86_400,       // 24h
            refresh_ttl_secs: 2_592_000,   // 30 days
            audience: "domus".to_string(),
            issuer: "domusd".to_string(),
        }
    }
}

// ── AuthService ─────────────────────────────────────────────────────

/// The Auth service: login, refresh rotation, logout, gateway
/// forward-auth.
///
/// Stateless between calls; all persistent state lives in the session
/// store. Every operation is a short synchronous call with no background
/// tasks or internal retries.
pub struct AuthService {
    pub(crate) sessions: Arc<dyn SessionStore>,
    pub(crate) users: Arc<dyn UserLookup>,
    pub(crate) codec: TokenCodec,
}

impl AuthService {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        users: Arc<dyn UserLookup>,
        config: AuthConfig,
    ) -> Self {
        let codec = TokenCodec::new(&config);
        Self {
            sessions,
            users,
            codec,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_code_mapping() {
        assert_eq!(AuthError::InvalidCredentials.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::UserIsInactive.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AuthError::NoSessionToRefresh.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::TokenExpired.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::FailedParsingToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::FailedParsingTokenClaims.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::BadRequest("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AuthError::Storage("x".into()).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(AuthError::Internal("x".into()).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn error_code_mapping() {
        assert_eq!(AuthError::InvalidCredentials.code(), 1001);
        assert_eq!(AuthError::UserIsInactive.code(), 1002);
        assert_eq!(AuthError::NoSessionToRefresh.code(), 1003);
        assert_eq!(AuthError::TokenExpired.code(), 1004);
        assert_eq!(AuthError::FailedParsingToken.code(), 1005);
        assert_eq!(AuthError::FailedParsingTokenClaims.code(), 1006);
        assert_eq!(AuthError::Unauthorized.code(), 1007);
        assert_eq!(AuthError::BadRequest("x".into()).code(), 1008);
        assert_eq!(AuthError::Storage("x".into()).code(), 1000);
        assert_eq!(AuthError::Internal("x".into()).code(), 1000);
    }

    #[test]
    fn internal_errors_do_not_leak_details() {
        let resp = AuthError::Storage("password column overflow".into()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
