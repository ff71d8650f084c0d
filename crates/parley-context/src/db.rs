use rusqlite::{Connection, Result};

/// Initialise the context table. Safe to call on every startup (idempotent).
pub fn init_db(conn: &Connection) -> Result<()> {
    create_chat_context_table(conn)
}

/// One row per chat key. `turns` holds the JSON-serialized conversation
/// history; `updated_at` exists for operator forensics only and carries no
/// expiry semantics.
fn create_chat_context_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS chat_context (
            chat_key    TEXT PRIMARY KEY,
            turns       TEXT NOT NULL,
            updated_at  TEXT NOT NULL
        );",
    )
}
