use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

const NAMESPACE: &str = "jobtrack";

pub const SAVED_JOB_IDS: &str = "saved-job-ids";
pub const PREFERENCES: &str = "preferences";
pub const JOB_STATUSES: &str = "job-statuses";
pub const TEST_CHECKLIST: &str = "test-checklist";
pub const JOBS: &str = "jobs";

pub fn digest_key(date: chrono::NaiveDate) -> String {
    format!("digest-{}", date.format("%Y-%m-%d"))
}

fn namespaced(key: &str) -> String {
    format!("{}:{}", NAMESPACE, key)
}

/// Raw string storage keyed by name. Values are JSON text.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn put(&self, key: &str, value: &str) -> Result<()>;
}

/// Read and decode `key`, falling back to `T::default()` when the value is
/// absent, unreadable or malformed.
pub fn load_or_default<T>(store: &dyn KeyValueStore, key: &str) -> T
where
    T: DeserializeOwned + Default,
{
    load(store, key).unwrap_or_default()
}

/// Like `load_or_default` but keeps absence distinguishable.
pub fn load<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to read stored value, using default");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "malformed stored value, using default");
            None
        }
    }
}

pub fn save<T: Serialize + ?Sized>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value)
        .with_context(|| format!("Failed to encode value for '{}'", key))?;
    store.put(key, &raw)
}

pub struct Database {
    conn: Connection,
    path: PathBuf,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create data directory: {}", parent.display())
                })?;
            }
        }
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        let db = Self {
            conn,
            path: path.to_path_buf(),
        };
        db.init()?;
        Ok(db)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let db = Self {
            conn: Connection::open_in_memory()?,
            path: PathBuf::from(":memory:"),
        };
        db.init()?;
        Ok(db)
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    pub fn default_path() -> PathBuf {
        // Use XDG data directory or fallback
        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "jobtrack") {
            proj_dirs.data_dir().join("jobtrack.db")
        } else {
            PathBuf::from("jobtrack.db")
        }
    }

    fn init(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            "#,
        )?;
        Ok(())
    }

    /// Remove every stored key for this namespace.
    pub fn clear(&self) -> Result<usize> {
        let removed = self.conn.execute(
            "DELETE FROM kv WHERE key LIKE ?1",
            [format!("{}:%", NAMESPACE)],
        )?;
        Ok(removed)
    }
}

impl KeyValueStore for Database {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM kv WHERE key = ?1",
                [namespaced(key)],
                |row| row.get(0),
            )
            .optional()
            .with_context(|| format!("Failed to read '{}'", key))
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO kv (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = datetime('now')",
                params![namespaced(key), value],
            )
            .with_context(|| format!("Failed to write '{}'", key))?;
        Ok(())
    }
}

/// Process-local store. `fail_writes` simulates a full disk.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: std::cell::RefCell<std::collections::HashMap<String, String>>,
    fail_writes: bool,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.values.borrow().get(&namespaced(key)).cloned()
    }

    pub fn insert_raw(&self, key: &str, value: &str) {
        self.values
            .borrow_mut()
            .insert(namespaced(key), value.to_string());
    }
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.raw(key))
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes {
            return Err(anyhow::anyhow!("Storage quota exceeded while writing '{}'", key));
        }
        self.insert_raw(key, value);
        Ok(())
    }
}
