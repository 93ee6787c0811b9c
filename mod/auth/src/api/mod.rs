mod gwfa;
mod tokens;

use std::sync::Arc;

use axum::Router;

use crate::service::AuthService;

/// Shared application state.
pub type AppState = Arc<AuthService>;

/// Header carrying the verified user id: set on gwfa responses, read back
/// from requests the gateway forwards after a successful gwfa.
pub const AUTH_USER_HEADER: &str = "x-auth-user";

/// Build the complete auth API router.
///
/// All routes are relative; the daemon nests them under `/v1`.
pub fn build_router(svc: Arc<AuthService>) -> Router {
    Router::new()
        .merge(tokens::routes())
        .merge(gwfa::routes())
        .with_state(svc)
}
