// Persistence slots: a fixed key holding a whole serialized collection

use eyre::{Context, Result};
use fs2::FileExt;
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::PersistError;
use crate::jsonl;
use crate::record::{Record, validate_collection_name};

pub const STORE_DIR: &str = ".sprintboard";
const CURRENT_VERSION: u32 = 1;

/// Durable get/set of one record collection per key
///
/// `load` never fails: an absent, unreadable or unparsable slot reads as an
/// empty collection. `save` replaces the whole collection.
pub trait Slot {
    fn load<T: Record>(&self) -> Vec<T>;

    fn save<T: Record>(&mut self, records: &[T]) -> Result<(), PersistError>;
}

/// Create `<path>/.sprintboard` with its .gitignore and .version files
pub(crate) fn prepare_store_dir(path: &Path) -> Result<PathBuf> {
    let base_path = path.join(STORE_DIR);

    fs::create_dir_all(&base_path).context("Failed to create store directory")?;

    let gitignore_path = base_path.join(".gitignore");
    if !gitignore_path.exists() {
        fs::write(
            &gitignore_path,
            "sprintboard.db\nsprintboard.db-shm\nsprintboard.db-wal\n*.lock\n*.tmp\n",
        )
        .context("Failed to write .gitignore")?;
    }

    let version_path = base_path.join(".version");
    if !version_path.exists() {
        fs::write(&version_path, CURRENT_VERSION.to_string()).context("Failed to write .version")?;
    }

    Ok(base_path)
}

// ============================================================================
// JSONL file slot
// ============================================================================

/// One `{key}.jsonl` file per collection, rewritten atomically on save
#[derive(Debug, Clone)]
pub struct JsonlSlot {
    base_path: PathBuf,
}

impl JsonlSlot {
    /// Open or create a slot directory in a `.sprintboard` subdirectory of `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let base_path = prepare_store_dir(path.as_ref())?;
        debug!(path = ?base_path, "Opened JSONL slot directory");
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn file_path(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{}.jsonl", key))
    }
}

impl Slot for JsonlSlot {
    fn load<T: Record>(&self) -> Vec<T> {
        let key = T::collection_name();
        if let Err(e) = validate_collection_name(key) {
            warn!(key, error = %e, "Invalid slot key, loading empty collection");
            return Vec::new();
        }

        let path = self.file_path(key);
        if !path.exists() {
            // File doesn't exist yet
            debug!(file = ?path, "Slot file absent, starting empty");
            return Vec::new();
        }

        match fs::read_to_string(&path) {
            Ok(content) => {
                let records = jsonl::decode(&content);
                info!(file = ?path, count = records.len(), "Loaded records from JSONL");
                records
            }
            Err(e) => {
                warn!(file = ?path, error = ?e, "Failed to read slot file, starting empty");
                Vec::new()
            }
        }
    }

    fn save<T: Record>(&mut self, records: &[T]) -> Result<(), PersistError> {
        let key = T::collection_name();
        validate_collection_name(key).map_err(PersistError::InvalidKey)?;

        let content = jsonl::encode(records)?;
        let path = self.file_path(key);
        let tmp_path = self.base_path.join(format!("{}.jsonl.tmp", key));

        let lock_file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.base_path.join(format!("{}.lock", key)))?;

        // Acquire exclusive lock before writing
        lock_file.lock_exclusive()?;

        {
            let mut file = File::create(&tmp_path)?;
            file.write_all(content.as_bytes())?;
            file.sync_all()?; // Ensure data is flushed to disk
        }
        fs::rename(&tmp_path, &path)?;

        // Lock is automatically released when lock_file is dropped
        info!(file = ?path, count = records.len(), "Saved records to JSONL");
        Ok(())
    }
}

// ============================================================================
// In-memory slot
// ============================================================================

/// Process-local slot keeping the encoded text, for tests and demos
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    values: HashMap<String, String>,
    read_only: bool,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a key with raw content, as if an earlier session had written it
    pub fn with_raw(mut self, key: &str, content: impl Into<String>) -> Self {
        self.values.insert(key.to_string(), content.into());
        self
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Make every save fail, to exercise storage outages
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }
}

impl Slot for MemorySlot {
    fn load<T: Record>(&self) -> Vec<T> {
        match self.values.get(T::collection_name()) {
            Some(content) => jsonl::decode(content),
            None => Vec::new(),
        }
    }

    fn save<T: Record>(&mut self, records: &[T]) -> Result<(), PersistError> {
        if self.read_only {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "memory slot is read-only").into());
        }
        let content = jsonl::encode(records)?;
        self.values.insert(T::collection_name().to_string(), content);
        Ok(())
    }
}
