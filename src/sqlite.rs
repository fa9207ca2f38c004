// SQLite-backed slot: a key/value table holding the same JSONL text

use chrono::Utc;
use eyre::{Context, Result};
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::PersistError;
use crate::jsonl;
use crate::record::{Record, validate_collection_name};
use crate::slot::{Slot, prepare_store_dir};

/// Slot stored as rows of `slots(key, value, updated_at)`
pub struct SqliteSlot {
    db: Connection,
}

impl SqliteSlot {
    /// Open or create `sprintboard.db` in a `.sprintboard` subdirectory of `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let base_path = prepare_store_dir(path.as_ref())?;

        let db_path = base_path.join("sprintboard.db");
        let db = Connection::open(&db_path).context("Failed to open SQLite database")?;

        let slot = Self { db };
        slot.create_schema()?;
        debug!(path = ?db_path, "Opened SQLite slot");
        Ok(slot)
    }

    pub fn open_in_memory() -> Result<Self> {
        let db = Connection::open_in_memory().context("Failed to open in-memory SQLite database")?;
        let slot = Self { db };
        slot.create_schema()?;
        Ok(slot)
    }

    /// Get a reference to the SQLite database connection
    pub fn db(&self) -> &Connection {
        &self.db
    }

    fn create_schema(&self) -> Result<()> {
        debug!("Creating slot schema");

        self.db
            .execute_batch(
                r#"
            CREATE TABLE IF NOT EXISTS slots (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            );
            "#,
            )
            .context("Failed to create slot schema")?;

        Ok(())
    }

    /// Stored text for a key, if any
    pub fn raw(&self, key: &str) -> Result<Option<String>, PersistError> {
        let value = self
            .db
            .query_row("SELECT value FROM slots WHERE key = ?1", [key], |row| row.get::<_, String>(0))
            .optional()?;
        Ok(value)
    }
}

impl Slot for SqliteSlot {
    fn load<T: Record>(&self) -> Vec<T> {
        let key = T::collection_name();
        match self.raw(key) {
            Ok(Some(content)) => {
                let records = jsonl::decode(&content);
                info!(key, count = records.len(), "Loaded records from SQLite slot");
                records
            }
            Ok(None) => {
                debug!(key, "Slot row absent, starting empty");
                Vec::new()
            }
            Err(e) => {
                warn!(key, error = ?e, "Failed to read slot row, starting empty");
                Vec::new()
            }
        }
    }

    fn save<T: Record>(&mut self, records: &[T]) -> Result<(), PersistError> {
        let key = T::collection_name();
        validate_collection_name(key).map_err(PersistError::InvalidKey)?;

        let content = jsonl::encode(records)?;
        self.db.execute(
            "INSERT OR REPLACE INTO slots (key, value, updated_at) VALUES (?1, ?2, ?3)",
            rusqlite::params![key, content, Utc::now().timestamp_millis()],
        )?;

        info!(key, count = records.len(), "Saved records to SQLite slot");
        Ok(())
    }
}
