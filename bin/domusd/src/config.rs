//! Server configuration, loaded from a TOML context file.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use auth::service::AuthConfig;

/// Top-level daemon configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Listen address for the HTTP server.
    #[serde(default = "default_listen")]
    pub listen: String,

    pub storage: StorageConfig,
    pub jwt: JwtConfig,
    pub admin: AdminConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the SQLite database.
    pub data_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// Symmetric JWT signing secret.
    pub secret: String,

    /// Access token lifetime in seconds.
    #[serde(default = "default_access_ttl")]
    pub access_ttl_secs: i64,

    /// Refresh session lifetime in seconds.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_secs: i64,

    /// Token audience claim.
    #[serde(default = "default_audience")]
    pub audience: String,

    /// Token issuer claim.
    #[serde(default = "default_issuer")]
    pub issuer: String,
}

/// The admin account seeded on first start.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    pub phone: String,

    /// Argon2id PHC hash of the admin password, never plaintext.
    pub password_hash: String,

    #[serde(default = "default_admin_first_name")]
    pub first_name: String,

    #[serde(default = "default_admin_last_name")]
    pub last_name: String,

    #[serde(default)]
    pub role: i64,
}

fn default_listen() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_access_ttl() -> i64 {
    AuthConfig::default().access_ttl_secs
}

fn default_refresh_ttl() -> i64 {
    AuthConfig::default().refresh_ttl_secs
}

fn default_audience() -> String {
    AuthConfig::default().audience
}

fn default_issuer() -> String {
    AuthConfig::default().issuer
}

fn default_admin_first_name() -> String {
    "Admin".to_string()
}

fn default_admin_last_name() -> String {
    "User".to_string()
}

impl ServerConfig {
    /// Resolve a context argument into a config path. A bare name maps to
    /// `/etc/domus/<name>.toml`; anything with `/` or `.` is a path.
    pub fn resolve_path(arg: &str) -> PathBuf {
        if arg.contains('/') || arg.contains('.') {
            PathBuf::from(arg)
        } else {
            PathBuf::from(format!("/etc/domus/{arg}.toml"))
        }
    }

    /// Load and parse the config file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let config: ServerConfig =
            toml::from_str(&raw).with_context(|| format!("parse config {}", path.display()))?;
        Ok(config)
    }

    /// Project the token-issuing slice of the config.
    pub fn auth_config(&self) -> AuthConfig {
        AuthConfig {
            jwt_secret: self.jwt.secret.clone(),
            access_ttl_secs: self.jwt.access_ttl_secs,
            refresh_ttl_secs: self.jwt.refresh_ttl_secs,
            audience: self.jwt.audience.clone(),
            issuer: self.jwt.issuer.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn resolve_bare_name_and_paths() {
        assert_eq!(
            ServerConfig::resolve_path("prod"),
            PathBuf::from("/etc/domus/prod.toml")
        );
        assert_eq!(
            ServerConfig::resolve_path("./local.toml"),
            PathBuf::from("./local.toml")
        );
        assert_eq!(
            ServerConfig::resolve_path("/opt/domus/a.toml"),
            PathBuf::from("/opt/domus/a.toml")
        );
    }

    #[test]
    fn load_applies_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[storage]
data_dir = "/var/lib/domus"

[jwt]
secret = "unit-test-secret"

[admin]
phone = "380671234567"
password_hash = "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$AAAA"
"#
        )
        .unwrap();

        let config = ServerConfig::load(file.path()).unwrap();
        assert_eq!(config.listen, "0.0.0.0:8080");
        assert_eq!(config.jwt.access_ttl_secs, 86_400);
        assert_eq!(config.jwt.refresh_ttl_secs, 2_592_000);
        assert_eq!(config.jwt.audience, "domus");
        assert_eq!(config.jwt.issuer, "domusd");
        assert_eq!(config.admin.first_name, "Admin");
        assert_eq!(config.admin.role, 0);

        let auth = config.auth_config();
        assert_eq!(auth.jwt_secret, "unit-test-secret");
    }

    #[test]
    fn load_rejects_missing_sections() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "listen = \"0.0.0.0:1234\"").unwrap();
        assert!(ServerConfig::load(file.path()).is_err());
    }

    #[test]
    fn load_missing_file_is_error() {
        assert!(ServerConfig::load(Path::new("/nonexistent/domus.toml")).is_err());
    }
}
