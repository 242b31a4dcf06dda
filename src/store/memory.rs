//! In-process table store.

use std::collections::BTreeMap;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Column, ColumnType, FlagMatch, Predicate, Row, RowFields, RowId, RowStore};
use crate::error::{EnvironError, Result};
use crate::schema::{INFO_COLUMN, KEY_COLUMN, VALUE_COLUMN};

/// A table: its columns and rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryTable {
    pub columns: Vec<Column>,
    #[serde(default)]
    pub rows: Vec<Row>,
    #[serde(default)]
    next_id: RowId,
}

impl MemoryTable {
    /// Create an empty table with the given columns.
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            next_id: 1,
        }
    }

    fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    fn allocate_id(&mut self) -> RowId {
        // Tables deserialized from older files may carry no counter.
        let floor = self.rows.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        let id = self.next_id.max(floor);
        self.next_id = id + 1;
        id
    }

    fn matching(&self, predicate: &Predicate) -> Vec<&Row> {
        self.rows.iter().filter(|r| predicate.matches(r)).collect()
    }
}

/// Tables held in memory.
///
/// Cloning a store snapshots it, which tests use to discard writes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryStore {
    #[serde(default)]
    tables: BTreeMap<String, MemoryTable>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`create_table`](Self::create_table).
    pub fn with_table(mut self, name: impl Into<String>, columns: Vec<Column>) -> Self {
        self.create_table(name, columns);
        self
    }

    /// Create a table, replacing any table with the same name.
    pub fn create_table(&mut self, name: impl Into<String>, columns: Vec<Column>) {
        self.tables.insert(name.into(), MemoryTable::new(columns));
    }

    /// Add a column to an existing table. Existing rows read it as null.
    ///
    /// Adding a column that already exists is a no-op.
    pub fn add_column(&mut self, table: &str, column: Column) -> Result<()> {
        let table = self.table_mut(table)?;
        if table.column(&column.name).is_none() {
            table.columns.push(column);
        }
        Ok(())
    }

    /// Table names in order.
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.keys().map(String::as_str).collect()
    }

    /// Get a table.
    pub fn table(&self, name: &str) -> Result<&MemoryTable> {
        self.tables.get(name).ok_or_else(|| EnvironError::TableNotFound {
            table: name.to_string(),
        })
    }

    fn table_mut(&mut self, name: &str) -> Result<&mut MemoryTable> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| EnvironError::TableNotFound {
                table: name.to_string(),
            })
    }

    /// All rows of a table.
    pub fn rows(&self, table: &str) -> Result<&[Row]> {
        Ok(&self.table(table)?.rows)
    }

    /// Insert a row with null environment columns.
    pub fn add_row(&mut self, table: &str, key: &str, value: Value) -> Result<RowId> {
        self.add_row_with_flags(table, key, value, std::iter::empty::<(&str, bool)>())
    }

    /// Insert a row with the given environment columns set.
    ///
    /// Unlike [`RowStore::get_or_create`] this never checks for an existing
    /// row, so it can produce overlapping rows.
    pub fn add_row_with_flags<'a>(
        &mut self,
        table: &str,
        key: &str,
        value: Value,
        flags: impl IntoIterator<Item = (&'a str, bool)>,
    ) -> Result<RowId> {
        let table_name = table;
        let table = self.table_mut(table_name)?;
        let id = table.allocate_id();
        let mut row = Row::new(id, key);
        row.value = value;
        for (column, flag) in flags {
            check_flag_column(table, table_name, column)?;
            row.flags.insert(column.to_string(), flag);
        }
        table.rows.push(row);
        Ok(id)
    }

    /// Delete a row. Returns whether it existed.
    pub fn delete_row(&mut self, table: &str, id: RowId) -> Result<bool> {
        let table = self.table_mut(table)?;
        let before = table.rows.len();
        table.rows.retain(|r| r.id != id);
        Ok(table.rows.len() != before)
    }

    fn check_predicate(&self, table: &str, predicate: &Predicate) -> Result<&MemoryTable> {
        let memory_table = self.table(table)?;
        for column in predicate.flags().keys() {
            check_flag_column(memory_table, table, column)?;
        }
        Ok(memory_table)
    }
}

fn check_flag_column(table: &MemoryTable, table_name: &str, column: &str) -> Result<()> {
    match table.column(column) {
        Some(c) if c.column_type == ColumnType::Bool => Ok(()),
        Some(c) => Err(anyhow!(
            "column '{}' in '{}' is a {} column, not a bool column",
            column,
            table_name,
            c.column_type
        )
        .into()),
        None => Err(EnvironError::UnknownColumn {
            table: table_name.to_string(),
            column: column.to_string(),
        }),
    }
}

fn apply_field(row: &mut Row, column: &Column, table: &str, value: &Value) -> Result<()> {
    let mismatch = || -> EnvironError {
        anyhow!(
            "cannot write {} to {} column '{}' in '{}'",
            value,
            column.column_type,
            column.name,
            table
        )
        .into()
    };

    match column.name.as_str() {
        KEY_COLUMN => match value {
            Value::String(key) => row.key = key.clone(),
            _ => return Err(mismatch()),
        },
        VALUE_COLUMN => row.value = value.clone(),
        INFO_COLUMN => match value {
            Value::String(info) => row.info = Some(info.clone()),
            Value::Null => row.info = None,
            _ => return Err(mismatch()),
        },
        name => match (column.column_type, value) {
            (ColumnType::Bool, Value::Bool(flag)) => {
                row.flags.insert(name.to_string(), *flag);
            }
            (ColumnType::Bool, Value::Null) => {
                row.flags.remove(name);
            }
            _ => return Err(mismatch()),
        },
    }
    Ok(())
}

impl RowStore for MemoryStore {
    fn exists(&self, table: &str) -> bool {
        self.tables.contains_key(table)
    }

    fn columns(&self, table: &str) -> Result<Vec<Column>> {
        Ok(self.table(table)?.columns.clone())
    }

    fn get_one(&self, table: &str, predicate: &Predicate) -> Result<Option<Row>> {
        let memory_table = self.check_predicate(table, predicate)?;
        match memory_table.matching(predicate).as_slice() {
            [] => Ok(None),
            [row] => Ok(Some((*row).clone())),
            rows => Err(EnvironError::MultipleRows {
                table: table.to_string(),
                count: rows.len(),
            }),
        }
    }

    fn get_or_create(&mut self, table: &str, predicate: &Predicate) -> Result<Row> {
        if let Some(row) = self.get_one(table, predicate)? {
            return Ok(row);
        }
        let memory_table = self.table_mut(table)?;
        let mut row = Row::new(memory_table.allocate_id(), predicate.key());
        for (column, expected) in predicate.flags() {
            if *expected == FlagMatch::True {
                row.flags.insert(column.clone(), true);
            }
        }
        memory_table.rows.push(row.clone());
        Ok(row)
    }

    fn update(&mut self, table: &str, id: RowId, fields: &RowFields) -> Result<()> {
        let memory_table = self.table_mut(table)?;
        let columns = memory_table.columns.clone();

        // Validate every field before touching the row.
        let mut resolved = Vec::with_capacity(fields.len());
        for (name, value) in fields {
            let column = columns
                .iter()
                .find(|c| &c.name == name)
                .ok_or_else(|| EnvironError::UnknownColumn {
                    table: table.to_string(),
                    column: name.clone(),
                })?;
            resolved.push((column, value));
        }

        let row = memory_table
            .rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| EnvironError::RowNotFound {
                table: table.to_string(),
                id,
            })?;

        let mut updated = row.clone();
        for (column, value) in resolved {
            apply_field(&mut updated, column, table, value)?;
        }
        *row = updated;
        Ok(())
    }
}
