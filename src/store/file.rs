//! YAML file store.
//!
//! A [`MemoryStore`] loaded from a YAML file and written back after every
//! mutation.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{Column, MemoryStore, Predicate, Row, RowFields, RowId, RowStore};
use crate::error::{EnvironError, Result};

/// A row store persisted to a single YAML file.
///
/// # Example
///
/// ```
/// use environ::store::{Column, FileStore, RowStore};
///
/// let dir = tempfile::TempDir::new().unwrap();
/// let path = dir.path().join("store.yml");
///
/// let mut store = FileStore::open(&path).unwrap();
/// store
///     .create_table("env", vec![Column::string("key"), Column::simple_object("value")])
///     .unwrap();
///
/// let reopened = FileStore::open(&path).unwrap();
/// assert!(reopened.exists("env"));
/// ```
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl FileStore {
    /// Open a store file. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let inner = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                MemoryStore::new()
            } else {
                serde_yaml::from_str(&content).map_err(|e| EnvironError::StoreParseError {
                    path: path.clone(),
                    message: e.to_string(),
                })?
            }
        } else {
            MemoryStore::new()
        };
        debug!("Opened store at {}", path.display());
        Ok(Self { path, inner })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The loaded tables.
    pub fn memory(&self) -> &MemoryStore {
        &self.inner
    }

    /// Create a table and save, replacing any table with the same name.
    pub fn create_table(&mut self, name: impl Into<String>, columns: Vec<Column>) -> Result<()> {
        self.inner.create_table(name, columns);
        self.save()
    }

    /// Add a column to an existing table and save.
    pub fn add_column(&mut self, table: &str, column: Column) -> Result<()> {
        self.inner.add_column(table, column)?;
        self.save()
    }

    /// Save to disk using atomic write.
    ///
    /// Writes to a temp file next to the store, then renames over it.
    pub fn save(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }

        let content = serde_yaml::to_string(&self.inner).map_err(|e| {
            EnvironError::Other(anyhow::anyhow!("Failed to serialize store: {}", e))
        })?;

        let temp_path = self.path.with_extension("yml.tmp");
        fs::write(&temp_path, &content)?;
        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

impl RowStore for FileStore {
    fn exists(&self, table: &str) -> bool {
        self.inner.exists(table)
    }

    fn columns(&self, table: &str) -> Result<Vec<Column>> {
        self.inner.columns(table)
    }

    fn get_one(&self, table: &str, predicate: &Predicate) -> Result<Option<Row>> {
        self.inner.get_one(table, predicate)
    }

    fn get_or_create(&mut self, table: &str, predicate: &Predicate) -> Result<Row> {
        if let Some(row) = self.inner.get_one(table, predicate)? {
            return Ok(row);
        }
        let row = self.inner.get_or_create(table, predicate)?;
        self.save()?;
        Ok(row)
    }

    fn update(&mut self, table: &str, id: RowId, fields: &RowFields) -> Result<()> {
        self.inner.update(table, id, fields)?;
        self.save()
    }
}
