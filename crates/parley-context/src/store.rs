use std::sync::Mutex;

use rusqlite::Connection;
use tracing::debug;

use crate::error::Result;

/// Opaque get/put-by-key persistence for serialized conversation histories.
///
/// The store has no transactional guarantees beyond last-write-wins; the
/// manager layer owns all interpretation of the stored value.
pub trait ContextStore: Send + Sync {
    /// Fetch the raw record for a chat key. `None` when the key is absent.
    fn get(&self, chat_key: &str) -> Result<Option<String>>;

    /// Full overwrite of the record for a chat key.
    fn put(&self, chat_key: &str, value: &str) -> Result<()>;
}

/// SQLite-backed store.
///
/// Wraps a single connection in a `Mutex`. For high-concurrency deployments
/// consider a connection pool, but a Mutex is sufficient for the single-node
/// target.
pub struct SqliteStore {
    db: Mutex<Connection>,
}

impl SqliteStore {
    /// Wrap an already-open (and `init_db`-initialised) connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Mutex::new(conn),
        }
    }
}

impl ContextStore for SqliteStore {
    fn get(&self, chat_key: &str) -> Result<Option<String>> {
        let db = self.db.lock().unwrap();
        match db.query_row(
            "SELECT turns FROM chat_context WHERE chat_key = ?1",
            rusqlite::params![chat_key],
            |row| row.get(0),
        ) {
            Ok(turns) => Ok(Some(turns)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn put(&self, chat_key: &str, value: &str) -> Result<()> {
        let now = chrono::Utc::now().to_rfc3339();
        let db = self.db.lock().unwrap();
        db.execute(
            "INSERT INTO chat_context (chat_key, turns, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(chat_key) DO UPDATE SET
                 turns      = excluded.turns,
                 updated_at = excluded.updated_at",
            rusqlite::params![chat_key, value, now],
        )?;
        debug!(chat_key, bytes = value.len(), "context stored");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;

    fn open_store() -> SqliteStore {
        let conn = Connection::open_in_memory().unwrap();
        init_db(&conn).unwrap();
        SqliteStore::new(conn)
    }

    #[test]
    fn absent_key_reads_none() {
        let store = open_store();
        assert_eq!(store.get("chan-1").unwrap(), None);
    }

    #[test]
    fn put_then_get_round_trips() {
        let store = open_store();
        store.put("chan-1", r#"[{"role":"user","content":"hi"}]"#).unwrap();
        assert_eq!(
            store.get("chan-1").unwrap().as_deref(),
            Some(r#"[{"role":"user","content":"hi"}]"#)
        );
    }

    #[test]
    fn put_overwrites_previous_value() {
        let store = open_store();
        store.put("chan-1", "[1]").unwrap();
        store.put("chan-1", "[2]").unwrap();
        assert_eq!(store.get("chan-1").unwrap().as_deref(), Some("[2]"));
    }

    #[test]
    fn keys_are_independent() {
        let store = open_store();
        store.put("chan-1", "[1]").unwrap();
        assert_eq!(store.get("chan-2").unwrap(), None);
    }
}
