use serde::{Deserialize, Serialize};

/// A user as seen by the authentication subsystem.
///
/// The user directory lives elsewhere in the platform; this is the
/// projection needed to gate login and mint access claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    /// User id.
    pub id: i64,

    pub first_name: String,

    pub last_name: String,

    /// Role identifier, embedded into access claims as-is.
    #[serde(default)]
    pub role: i64,

    /// Inactive accounts cannot log in.
    #[serde(default = "default_true")]
    pub active: bool,
}

impl UserRecord {
    /// Display name embedded into access claims.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

fn default_true() -> bool {
    true
}
