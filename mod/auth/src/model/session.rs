use serde::{Deserialize, Serialize};

/// A refresh session record. One row per outstanding refresh token.
///
/// Rows are create/delete only: created on login or refresh, deleted when
/// the token is consumed or the user logs out. There is no mutation path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Session id (UUIDv4, no dashes), assigned by the store.
    pub id: String,

    /// User id that owns this session. A foreign reference; not validated
    /// against the user directory at this layer.
    pub user_id: i64,

    /// Single-use opaque refresh token (UUIDv4).
    pub refresh_token: String,

    /// Absolute expiry (unix timestamp, seconds).
    pub expires_at: i64,

    /// Creation time (unix timestamp, seconds).
    pub created_at: i64,

    /// Last update time (unix timestamp, seconds).
    pub updated_at: i64,
}

/// Claims carried by an access token. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// User id.
    pub id: i64,

    /// User display name at issue time.
    pub name: String,

    /// Role identifier at issue time.
    pub role: i64,

    /// Audience.
    pub aud: String,

    /// Issuer.
    pub iss: String,

    /// Issued at (unix timestamp).
    pub iat: i64,

    /// Expiration (unix timestamp).
    pub exp: i64,
}

/// Request body for login.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub phone: String,
    pub password: String,
}

/// Request body for token refresh. The token is the opaque refresh token
/// from a previous login or refresh response.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshRequest {
    pub token: String,
}

/// Token pair returned after login or refresh.
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}
