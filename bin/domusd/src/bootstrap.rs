//! Bootstrap — first-start checks and admin account seeding.
//!
//! When domusd starts:
//! 1. Verify the config carries a usable secret and admin credentials —
//!    if not, refuse to start.
//! 2. Ensure the admin user exists in the database.

use tracing::info;

use crate::config::ServerConfig;
use crate::directory::{NewUser, SqlUserDirectory};

/// Verify server configuration is ready for production use.
pub fn verify_config(config: &ServerConfig) -> anyhow::Result<()> {
    if config.jwt.secret.trim().is_empty() {
        anyhow::bail!("JWT secret is empty in configuration.");
    }
    if config.jwt.secret == auth::service::AuthConfig::default().jwt_secret {
        anyhow::bail!("JWT secret is still the development default; set a real secret.");
    }
    if config.storage.data_dir.trim().is_empty() {
        anyhow::bail!("Storage data_dir is empty in configuration.");
    }
    if config.admin.phone.trim().is_empty() {
        anyhow::bail!("Admin phone is empty in configuration.");
    }
    if !config.admin.password_hash.starts_with("$argon2") {
        anyhow::bail!(
            "No admin password hash found in configuration.\n\
             Set admin.password_hash to an argon2id PHC string."
        );
    }
    Ok(())
}

/// Ensure the admin user exists. Creates it on first start.
pub fn ensure_admin_user(
    directory: &SqlUserDirectory,
    config: &ServerConfig,
) -> anyhow::Result<()> {
    if directory.phone_exists(&config.admin.phone)? {
        info!("admin user already exists");
        return Ok(());
    }

    let id = directory.create_user(&NewUser {
        phone: config.admin.phone.clone(),
        password_hash: config.admin.password_hash.clone(),
        first_name: config.admin.first_name.clone(),
        last_name: config.admin.last_name.clone(),
        role: config.admin.role,
    })?;
    info!("Created admin user (id {})", id);
    Ok(())
}
