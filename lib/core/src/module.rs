use axum::Router;

/// A service module that contributes HTTP routes.
///
/// Each business module (auth, requests, dictionaries, ...) implements
/// this trait to register its API endpoints. The binary entry point
/// collects the modules and mounts their routes into a single Router.
pub trait Module: Send + Sync {
    /// Module name, used for logging.
    fn name(&self) -> &str;

    /// Return the module's routes; the daemon decides where to mount them.
    fn routes(&self) -> Router;
}
