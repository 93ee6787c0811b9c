//! Session-backed authentication module.
//!
//! Surface (mounted under `/v1` by the daemon):
//! - `POST /login` — phone + password, returns an access/refresh token pair
//! - `POST /refresh` — exchanges a single-use refresh token for a new pair
//! - `GET /logout` — drops every session of the calling user
//! - `GET /gwfa` — forward-auth hook called by the edge gateway per request
//!
//! Access tokens are signed JWTs verified statelessly; refresh tokens are
//! opaque single-use rows in the session store. The user directory is an
//! external collaborator reached through [`lookup::UserLookup`].

pub mod api;
pub mod lookup;
pub mod model;
pub mod service;
pub mod store;

use std::sync::Arc;

use axum::Router;

use domus_core::Module;

use crate::service::AuthService;

/// Auth module: owns the service and contributes its routes.
pub struct AuthModule {
    service: Arc<AuthService>,
}

impl AuthModule {
    pub fn new(service: Arc<AuthService>) -> Self {
        Self { service }
    }
}

impl Module for AuthModule {
    fn name(&self) -> &str {
        "auth"
    }

    fn routes(&self) -> Router {
        api::build_router(self.service.clone())
    }
}
