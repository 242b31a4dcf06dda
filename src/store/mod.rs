//! Row storage.
//!
//! The resolver reads and writes a single table through the [`RowStore`]
//! trait. A table has the `key`, `value` and optional `info` columns plus one
//! nullable boolean column per declared environment.
//!
//! - [`RowStore`] - The operations the resolver needs from a backing store
//! - [`MemoryStore`] - Tables held in process
//! - [`FileStore`] - A [`MemoryStore`] persisted to a YAML file
//!
//! # Example
//!
//! ```
//! use environ::store::{Column, MemoryStore, Predicate, RowStore};
//! use serde_json::json;
//!
//! let mut store = MemoryStore::new();
//! store.create_table(
//!     "env",
//!     vec![Column::string("key"), Column::simple_object("value"), Column::bool("Debug")],
//! );
//! store.add_row_with_flags("env", "API_URL", json!("localhost"), [("Debug", true)]).unwrap();
//!
//! let row = store
//!     .get_one("env", &Predicate::new("API_URL").with_true("Debug"))
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(row.value, json!("localhost"));
//! ```

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::{MemoryStore, MemoryTable};

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// Identifier of a row within its table.
pub type RowId = u64;

/// Field values for [`RowStore::update`], keyed by column name.
pub type RowFields = BTreeMap<String, Value>;

/// Column data types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    String,
    /// Any JSON-compatible value.
    SimpleObject,
    Bool,
    Number,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::SimpleObject => write!(f, "simple object"),
            Self::Bool => write!(f, "bool"),
            Self::Number => write!(f, "number"),
        }
    }
}

/// A named, typed column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

impl Column {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::String)
    }

    pub fn simple_object(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::SimpleObject)
    }

    pub fn bool(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Bool)
    }
}

/// A stored row.
///
/// Environment columns live in `flags`; a column missing from the map is null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub id: RowId,
    pub key: String,
    #[serde(default)]
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub flags: BTreeMap<String, bool>,
}

impl Row {
    /// Create an empty row for `key`.
    pub fn new(id: RowId, key: impl Into<String>) -> Self {
        Self {
            id,
            key: key.into(),
            value: Value::Null,
            info: None,
            flags: BTreeMap::new(),
        }
    }

    /// The value of a boolean column, `None` when null.
    pub fn flag(&self, column: &str) -> Option<bool> {
        self.flags.get(column).copied()
    }

    /// Check if a boolean column is explicitly true.
    pub fn is_true(&self, column: &str) -> bool {
        self.flag(column) == Some(true)
    }
}

/// Condition on a boolean column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagMatch {
    /// The column must be true.
    True,
    /// The column must be false or null.
    NotTrue,
}

/// Row selection: an exact key plus conditions on boolean columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    key: String,
    flags: BTreeMap<String, FlagMatch>,
}

impl Predicate {
    /// Match rows with this key, regardless of environment columns.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            flags: BTreeMap::new(),
        }
    }

    /// Require `column` to be true.
    pub fn with_true(mut self, column: impl Into<String>) -> Self {
        self.flags.insert(column.into(), FlagMatch::True);
        self
    }

    /// Require `column` to be false or null.
    pub fn with_not_true(mut self, column: impl Into<String>) -> Self {
        self.flags.insert(column.into(), FlagMatch::NotTrue);
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn flags(&self) -> &BTreeMap<String, FlagMatch> {
        &self.flags
    }

    /// Check if a row satisfies the predicate.
    pub fn matches(&self, row: &Row) -> bool {
        row.key == self.key
            && self.flags.iter().all(|(column, expected)| match expected {
                FlagMatch::True => row.is_true(column),
                FlagMatch::NotTrue => !row.is_true(column),
            })
    }
}

/// Operations the resolver consumes from a backing store.
///
/// Implementations own transactional behavior, if any; the resolver issues
/// plain reads and writes.
pub trait RowStore {
    /// Check if a table exists.
    fn exists(&self, table: &str) -> bool;

    /// List a table's columns.
    fn columns(&self, table: &str) -> Result<Vec<Column>>;

    /// Fetch the single row matching `predicate`.
    ///
    /// Returns `MultipleRows` if more than one row matches.
    fn get_one(&self, table: &str, predicate: &Predicate) -> Result<Option<Row>>;

    /// Fetch the single row matching `predicate`, creating it if none does.
    ///
    /// A created row has the predicate's key, its `True` columns set to true
    /// and every other column null.
    fn get_or_create(&mut self, table: &str, predicate: &Predicate) -> Result<Row>;

    /// Overwrite fields of an existing row.
    ///
    /// Returns `UnknownColumn` for a field that is not a column of the table.
    fn update(&mut self, table: &str, id: RowId, fields: &RowFields) -> Result<()>;
}
