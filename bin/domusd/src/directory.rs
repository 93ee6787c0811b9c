//! SQL-backed user directory.
//!
//! User management proper (registration, profiles, roles) belongs to the
//! rest of the platform; the daemon only seeds the admin account and
//! serves the lookups the auth module needs.

use std::sync::Arc;

use auth::lookup::UserLookup;
use auth::model::UserRecord;
use domus_core::{now_unix, ServiceError};
use domus_sql::{Row, SQLStore, Value};

/// SQL schema for the users table.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    phone         TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    first_name    TEXT NOT NULL,
    last_name     TEXT NOT NULL,
    role          INTEGER NOT NULL DEFAULT 0,
    active        INTEGER NOT NULL DEFAULT 1,
    created_at    INTEGER NOT NULL,
    updated_at    INTEGER NOT NULL
);
";

/// Input for creating a user row.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub phone: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: i64,
}

/// User directory backed by SQLStore (SQLite).
pub struct SqlUserDirectory {
    db: Arc<dyn SQLStore>,
}

impl SqlUserDirectory {
    /// Create the directory and initialise the schema.
    pub fn new(db: Arc<dyn SQLStore>) -> Result<Self, ServiceError> {
        db.exec_batch(SCHEMA)
            .map_err(|e| ServiceError::Storage(format!("users schema init: {e}")))?;
        Ok(Self { db })
    }

    /// Whether a user with this phone exists.
    pub fn phone_exists(&self, phone: &str) -> Result<bool, ServiceError> {
        let rows = self
            .db
            .query(
                "SELECT 1 AS present FROM users WHERE phone = ?1",
                &[Value::Text(phone.to_string())],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        Ok(!rows.is_empty())
    }

    /// Insert a user row and return its id.
    pub fn create_user(&self, user: &NewUser) -> Result<i64, ServiceError> {
        let now = now_unix();
        self.db
            .exec(
                "INSERT INTO users (phone, password_hash, first_name, last_name, role, active, created_at, updated_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6, ?7)",
                &[
                    Value::Text(user.phone.clone()),
                    Value::Text(user.password_hash.clone()),
                    Value::Text(user.first_name.clone()),
                    Value::Text(user.last_name.clone()),
                    Value::Integer(user.role),
                    Value::Integer(now),
                    Value::Integer(now),
                ],
            )
            .map_err(|e| {
                let msg = e.to_string();
                if msg.contains("UNIQUE constraint") {
                    ServiceError::Conflict(msg)
                } else {
                    ServiceError::Storage(msg)
                }
            })?;

        let rows = self
            .db
            .query(
                "SELECT id FROM users WHERE phone = ?1",
                &[Value::Text(user.phone.clone())],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        rows.first()
            .and_then(|r| r.get_i64("id"))
            .ok_or_else(|| ServiceError::Storage("inserted user has no id".into()))
    }
}

impl UserLookup for SqlUserDirectory {
    fn by_phone_and_password(
        &self,
        phone: &str,
        password: &str,
    ) -> Result<UserRecord, ServiceError> {
        let rows = self
            .db
            .query(
                "SELECT id, password_hash, first_name, last_name, role, active \
                 FROM users WHERE phone = ?1",
                &[Value::Text(phone.to_string())],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;

        let row = rows.first().ok_or_else(user_not_found)?;
        let hash = row
            .get_str("password_hash")
            .ok_or_else(|| ServiceError::Storage("user row missing password_hash".into()))?;

        // A wrong password reads exactly like an unknown phone.
        if !verify_password(password, hash) {
            return Err(user_not_found());
        }

        row_to_user(row)
    }

    fn by_id(&self, id: i64) -> Result<UserRecord, ServiceError> {
        let rows = self
            .db
            .query(
                "SELECT id, first_name, last_name, role, active FROM users WHERE id = ?1",
                &[Value::Integer(id)],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;

        let row = rows.first().ok_or_else(user_not_found)?;
        row_to_user(row)
    }
}

fn user_not_found() -> ServiceError {
    ServiceError::NotFound("user".into())
}

fn row_to_user(row: &Row) -> Result<UserRecord, ServiceError> {
    let text = |name: &str| {
        row.get_str(name)
            .map(str::to_string)
            .ok_or_else(|| ServiceError::Storage(format!("user row missing {name}")))
    };

    Ok(UserRecord {
        id: row
            .get_i64("id")
            .ok_or_else(|| ServiceError::Storage("user row missing id".into()))?,
        first_name: text("first_name")?,
        last_name: text("last_name")?,
        role: row.get_i64("role").unwrap_or(0),
        active: row.get_bool("active").unwrap_or(false),
    })
}

/// Verify a password against an argon2id hash.
pub fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::Argon2;
    use password_hash::{PasswordHash, PasswordVerifier};

    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
