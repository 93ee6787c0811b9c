use tracing::{info, warn};

use domus_core::{now_unix, ServiceError};

use crate::model::TokenPair;
use crate::service::{AuthError, AuthService};

fn storage(e: ServiceError) -> AuthError {
    AuthError::Storage(e.to_string())
}

impl AuthService {
    /// Authenticate by phone and password, open a session, mint tokens.
    ///
    /// Unknown phone and wrong password are the same failure, so callers
    /// cannot probe which phones have accounts.
    pub fn login(&self, phone: &str, password: &str) -> Result<TokenPair, AuthError> {
        let user = self
            .users
            .by_phone_and_password(phone, password)
            .map_err(|e| match e {
                ServiceError::NotFound(_) => AuthError::InvalidCredentials,
                other => AuthError::Storage(other.to_string()),
            })?;

        if !user.active {
            warn!(user_id = user.id, "login rejected: inactive account");
            return Err(AuthError::UserIsInactive);
        }

        let session = self.sessions.create(user.id).map_err(storage)?;
        let access_token = self.codec.encode(&user)?;

        info!(user_id = user.id, "login");
        Ok(TokenPair {
            access_token,
            refresh_token: session.refresh_token,
        })
    }

    /// Exchange a refresh token for a new pair, consuming it.
    ///
    /// The session row is deleted before anything else can fail, so a
    /// refresh token is spent exactly once: two concurrent calls race on
    /// the delete and the loser fails with `NoSessionToRefresh`. A failed
    /// refresh never re-creates the old session.
    pub fn refresh(&self, token: &str) -> Result<TokenPair, AuthError> {
        let session = self
            .sessions
            .find_by_refresh_token(token)
            .map_err(|e| match e {
                ServiceError::NotFound(_) => AuthError::NoSessionToRefresh,
                other => AuthError::Storage(other.to_string()),
            })?;

        let consumed = self.sessions.delete_by_id(&session.id).map_err(storage)?;
        if !consumed {
            warn!(user_id = session.user_id, "refresh token consumed concurrently");
            return Err(AuthError::NoSessionToRefresh);
        }

        if session.expires_at <= now_unix() {
            return Err(AuthError::TokenExpired);
        }

        // Re-resolve the owner: the name or role may have changed since
        // the previous token was minted.
        let user = self
            .users
            .by_id(session.user_id)
            .map_err(|e| AuthError::Internal(format!("refresh user lookup: {e}")))?;

        let next = self.sessions.create(user.id).map_err(storage)?;
        let access_token = self.codec.encode(&user)?;

        Ok(TokenPair {
            access_token,
            refresh_token: next.refresh_token,
        })
    }

    /// Drop every session the user owns. Idempotent.
    pub fn logout(&self, user_id: i64) -> Result<(), AuthError> {
        let deleted = self.sessions.delete_by_user_id(user_id).map_err(storage)?;
        info!(user_id, sessions = deleted, "logout");
        Ok(())
    }

    /// Verify an access token on behalf of the gateway and return the
    /// embedded user id.
    ///
    /// Called on the hot path of every proxied request: token codec only,
    /// never the session store.
    pub fn forward_auth(&self, token: &str) -> Result<i64, AuthError> {
        let claims = self.codec.decode(token)?;
        Ok(claims.id)
    }
}
