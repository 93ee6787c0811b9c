use std::sync::Arc;

use domus_core::{new_id, now_unix, ServiceError};
use domus_sql::{Row, SQLStore, Value};
use uuid::Uuid;

use crate::model::Session;

/// SQL schema for the sessions table.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS sessions (
    id            TEXT PRIMARY KEY,
    user_id       INTEGER NOT NULL,
    refresh_token TEXT NOT NULL UNIQUE,
    expires_at    INTEGER NOT NULL,
    created_at    INTEGER NOT NULL,
    updated_at    INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_session_user ON sessions(user_id);
";

/// Persistence contract for refresh sessions.
///
/// Sessions are create/delete only. `delete_by_id` doubles as the
/// single-use consume: it reports whether this call removed the row, so
/// of two concurrent consumers of the same token exactly one sees `true`.
pub trait SessionStore: Send + Sync {
    /// Create and persist a session with a fresh refresh token.
    fn create(&self, user_id: i64) -> Result<Session, ServiceError>;

    /// Look up a session by its refresh token. `NotFound` if absent.
    fn find_by_refresh_token(&self, token: &str) -> Result<Session, ServiceError>;

    /// Delete one session. Idempotent; returns whether a row was deleted
    /// by this call.
    fn delete_by_id(&self, id: &str) -> Result<bool, ServiceError>;

    /// Delete all sessions owned by a user. Returns the deleted count;
    /// zero is not an error.
    fn delete_by_user_id(&self, user_id: i64) -> Result<u64, ServiceError>;
}

/// SessionStore backed by SQLStore (SQLite).
pub struct SqlSessionStore {
    db: Arc<dyn SQLStore>,
    refresh_ttl_secs: i64,
}

impl SqlSessionStore {
    /// Create the store and initialise the schema.
    pub fn new(db: Arc<dyn SQLStore>, refresh_ttl_secs: i64) -> Result<Self, ServiceError> {
        db.exec_batch(SCHEMA)
            .map_err(|e| ServiceError::Storage(format!("session schema init: {e}")))?;
        Ok(Self {
            db,
            refresh_ttl_secs,
        })
    }
}

impl SessionStore for SqlSessionStore {
    fn create(&self, user_id: i64) -> Result<Session, ServiceError> {
        let now = now_unix();
        let session = Session {
            id: new_id(),
            user_id,
            refresh_token: Uuid::new_v4().to_string(),
            expires_at: now + self.refresh_ttl_secs,
            created_at: now,
            updated_at: now,
        };

        self.db
            .exec(
                "INSERT INTO sessions (id, user_id, refresh_token, expires_at, created_at, updated_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                &[
                    Value::Text(session.id.clone()),
                    Value::Integer(session.user_id),
                    Value::Text(session.refresh_token.clone()),
                    Value::Integer(session.expires_at),
                    Value::Integer(session.created_at),
                    Value::Integer(session.updated_at),
                ],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;

        Ok(session)
    }

    fn find_by_refresh_token(&self, token: &str) -> Result<Session, ServiceError> {
        let rows = self
            .db
            .query(
                "SELECT id, user_id, refresh_token, expires_at, created_at, updated_at \
                 FROM sessions WHERE refresh_token = ?1",
                &[Value::Text(token.to_string())],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;

        let row = rows
            .first()
            .ok_or_else(|| ServiceError::NotFound("session".into()))?;

        row_to_session(row)
    }

    fn delete_by_id(&self, id: &str) -> Result<bool, ServiceError> {
        let affected = self
            .db
            .exec(
                "DELETE FROM sessions WHERE id = ?1",
                &[Value::Text(id.to_string())],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;

        Ok(affected > 0)
    }

    fn delete_by_user_id(&self, user_id: i64) -> Result<u64, ServiceError> {
        self.db
            .exec(
                "DELETE FROM sessions WHERE user_id = ?1",
                &[Value::Integer(user_id)],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))
    }
}

/// Map a sessions row onto the model. Sessions use plain columns, so this
/// is a straight field-by-field read.
fn row_to_session(row: &Row) -> Result<Session, ServiceError> {
    let text = |name: &str| {
        row.get_str(name)
            .map(str::to_string)
            .ok_or_else(|| ServiceError::Storage(format!("session row missing {name}")))
    };
    let int = |name: &str| {
        row.get_i64(name)
            .ok_or_else(|| ServiceError::Storage(format!("session row missing {name}")))
    };

    Ok(Session {
        id: text("id")?,
        user_id: int("user_id")?,
        refresh_token: text("refresh_token")?,
        expires_at: int("expires_at")?,
        created_at: int("created_at")?,
        updated_at: int("updated_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use domus_sql::SqliteStore;

    fn test_store() -> SqlSessionStore {
        let db = Arc::new(SqliteStore::open_in_memory().unwrap());
        SqlSessionStore::new(db, 3600).unwrap()
    }

    #[test]
    fn create_and_find() {
        let store = test_store();
        let session = store.create(7).unwrap();
        assert_eq!(session.user_id, 7);
        assert_eq!(session.expires_at, session.created_at + 3600);

        let found = store.find_by_refresh_token(&session.refresh_token).unwrap();
        assert_eq!(found.id, session.id);
        assert_eq!(found.user_id, 7);
        assert_eq!(found.expires_at, session.expires_at);
    }

    #[test]
    fn find_unknown_token() {
        let store = test_store();
        let err = store.find_by_refresh_token("nope").unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[test]
    fn delete_reports_outcome() {
        let store = test_store();
        let session = store.create(1).unwrap();

        assert!(store.delete_by_id(&session.id).unwrap());
        // A second delete finds nothing: this is the consume signal.
        assert!(!store.delete_by_id(&session.id).unwrap());
        assert!(store.find_by_refresh_token(&session.refresh_token).is_err());
    }

    #[test]
    fn delete_by_user_clears_only_that_user() {
        let store = test_store();
        store.create(5).unwrap();
        store.create(5).unwrap();
        store.create(6).unwrap();

        assert_eq!(store.delete_by_user_id(5).unwrap(), 2);
        assert_eq!(store.delete_by_user_id(5).unwrap(), 0);
        assert_eq!(store.delete_by_user_id(6).unwrap(), 1);
    }

    #[test]
    fn refresh_tokens_are_unique_per_session() {
        let store = test_store();
        let a = store.create(1).unwrap();
        let b = store.create(1).unwrap();
        assert_ne!(a.refresh_token, b.refresh_token);
        assert_ne!(a.id, b.id);
    }
}
