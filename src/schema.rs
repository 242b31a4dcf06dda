//! Table schema inspection.
//!
//! Determines whether the backing table is usable and which of its columns
//! declare environments. Every boolean column other than the fixed
//! `key`/`value`/`info` columns names an environment, so adding a `Staging`
//! bool column to the table is all it takes to declare a `Staging`
//! environment.

use std::collections::BTreeSet;
use std::fmt;

use crate::error::Result;
use crate::store::{Column, ColumnType, RowStore};

/// Column holding the variable name.
pub const KEY_COLUMN: &str = "key";
/// Column holding the stored value.
pub const VALUE_COLUMN: &str = "value";
/// Optional column holding a human readable description.
pub const INFO_COLUMN: &str = "info";

/// Columns the table must have to be ready.
pub const REQUIRED_COLUMNS: &[&str] = &[KEY_COLUMN, VALUE_COLUMN];

/// The inspected shape of a variables table.
///
/// # Example
///
/// ```
/// use environ::schema::TableSchema;
/// use environ::store::Column;
///
/// let schema = TableSchema::from_columns(
///     "env",
///     true,
///     &[
///         Column::string("key"),
///         Column::simple_object("value"),
///         Column::bool("Debug"),
///         Column::bool("Published"),
///     ],
/// );
/// assert!(schema.is_ready());
/// assert_eq!(schema.environments().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TableSchema {
    table: String,
    exists: bool,
    columns: Vec<Column>,
    missing: Vec<String>,
    environments: BTreeSet<String>,
    has_info: bool,
}

impl TableSchema {
    /// Inspect `table` in `store`.
    pub fn inspect(store: &dyn RowStore, table: &str) -> Result<Self> {
        let exists = store.exists(table);
        let columns = if exists {
            store.columns(table)?
        } else {
            Vec::new()
        };
        Ok(Self::from_columns(table, exists, &columns))
    }

    /// Build a schema from a known column list.
    pub fn from_columns(table: impl Into<String>, exists: bool, columns: &[Column]) -> Self {
        let has_column = |name: &str| columns.iter().any(|c| c.name == name);

        let missing = REQUIRED_COLUMNS
            .iter()
            .filter(|name| !has_column(**name))
            .map(|name| name.to_string())
            .collect();

        let environments = columns
            .iter()
            .filter(|c| c.column_type == ColumnType::Bool)
            .filter(|c| ![KEY_COLUMN, VALUE_COLUMN, INFO_COLUMN].contains(&c.name.as_str()))
            .map(|c| c.name.clone())
            .collect();

        Self {
            table: table.into(),
            exists,
            columns: columns.to_vec(),
            missing,
            environments,
            has_info: has_column(INFO_COLUMN),
        }
    }

    /// Table name.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Check if the table exists.
    pub fn exists(&self) -> bool {
        self.exists
    }

    /// All columns found on the table.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Required columns that are missing.
    pub fn missing_columns(&self) -> &[String] {
        &self.missing
    }

    /// Declared environments, one per extra boolean column.
    pub fn environments(&self) -> &BTreeSet<String> {
        &self.environments
    }

    /// Check if the optional `info` column is present.
    pub fn has_info(&self) -> bool {
        self.has_info
    }

    /// Check that the table exists and has every required column.
    pub fn is_ready(&self) -> bool {
        self.exists && self.missing.is_empty()
    }

    /// Why the table is not ready, or `None` when it is.
    pub fn not_ready_reason(&self) -> Option<String> {
        if !self.exists {
            Some("table needs to be created".to_string())
        } else if !self.missing.is_empty() {
            Some(format!("missing columns: {}", self.missing.join(", ")))
        } else {
            None
        }
    }
}

impl fmt::Display for TableSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.is_ready() {
            "Ready"
        } else {
            "Requires setup"
        };
        writeln!(f, "ENV Table Status: {}", state)?;

        if !self.exists {
            return write!(f, "\t'{}' table needs to be created", self.table);
        }
        writeln!(f, "\t'{}' table created", self.table)?;

        if !self.missing.is_empty() {
            writeln!(
                f,
                "\t'{}' missing columns: {}",
                self.table,
                self.missing.join(", ")
            )?;
        } else {
            let mut found: Vec<&str> = REQUIRED_COLUMNS.to_vec();
            if self.has_info {
                found.push(INFO_COLUMN);
            }
            writeln!(f, "\t{} columns found", found.join(", "))?;
        }

        if self.environments.is_empty() {
            write!(f, "\tno environment columns")
        } else {
            let names: Vec<&str> = self.environments.iter().map(String::as_str).collect();
            write!(f, "\tenvironments: {}", names.join(", "))
        }
    }
}
