//! Error types for environ operations.
//!
//! This module defines [`EnvironError`], the error type used throughout the
//! crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Resolution and normalization errors always propagate to the caller
//! - Only an unready store is soft-degraded, and only for reads
//! - Use `anyhow::Error` (via `EnvironError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for environ operations.
#[derive(Debug, Error)]
pub enum EnvironError {
    /// The backing table is missing or lacks required columns.
    #[error("'{table}' table is not ready: {reason}")]
    NotReady { table: String, reason: String },

    /// The runtime environment name matches more than one declared environment.
    #[error("environment '{runtime}' is ambiguous, it matches: {}", .candidates.join(", "))]
    AmbiguousEnvironment {
        runtime: String,
        candidates: Vec<String>,
    },

    /// More than one stored row applies to the resolved environment.
    #[error(
        "{count} rows in '{table}' match '{key}' for environment '{environment}', \
         environment assignments must not overlap"
    )]
    OverlappingEnvironments {
        key: String,
        table: String,
        environment: String,
        count: usize,
    },

    /// Nothing was stored for the variable and no default was given.
    #[error("environment variable '{name}' not found in '{table}'")]
    VariableNotFound { name: String, table: String },

    /// An environment-scoped write against a table with no environment columns.
    #[error(
        "'{table}' has no environment columns, add a boolean column for each of \
         [{}] before setting environment specific values",
        .requested.join(", ")
    )]
    EnvironmentsNotSupported { table: String, requested: Vec<String> },

    /// An environment name that is not a declared environment.
    #[error("unknown environment '{name}', expected one of: {}", .available.join(", "))]
    UnknownEnvironment { name: String, available: Vec<String> },

    /// An environment flag that is neither true, false nor empty.
    #[error("environment '{name}' must be true, false or null, got {value}")]
    InvalidEnvironmentFlag { name: String, value: String },

    /// An environments argument of an unsupported shape.
    #[error("invalid environments request: {message}")]
    InvalidEnvironmentRequest { message: String },

    /// A plain value that would read back as a secret reference.
    #[error(
        "value for '{name}' uses the reserved '🔒' key, store a secret reference \
         instead of a plain value"
    )]
    ReservedValue { name: String },

    /// A write named a column the table does not have.
    #[error("'{table}' has no column '{column}'")]
    UnknownColumn { table: String, column: String },

    /// The named table does not exist in the store.
    #[error("table '{table}' does not exist")]
    TableNotFound { table: String },

    /// A row id that is not in the table.
    #[error("row {id} not found in '{table}'")]
    RowNotFound { table: String, id: u64 },

    /// The store found more than one row for a single-row query.
    #[error("{count} rows in '{table}' match a single row query")]
    MultipleRows { table: String, count: usize },

    /// The vault has no secret with this name.
    #[error("secret '{name}' not found")]
    SecretNotFound { name: String },

    /// A resolved value could not be converted to the requested type.
    #[error("environment variable '{name}' has an unexpected type: {message}")]
    Decode { name: String, message: String },

    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Failed to parse a store file.
    #[error("Failed to parse store at {path}: {message}")]
    StoreParseError { path: PathBuf, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error wrapper.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for environ operations.
pub type Result<T> = std::result::Result<T, EnvironError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ambiguous_environment_lists_candidates() {
        let err = EnvironError::AmbiguousEnvironment {
            runtime: "A".into(),
            candidates: vec!["A1".into(), "AA".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("'A'"));
        assert!(msg.contains("A1, AA"));
    }

    #[test]
    fn overlapping_environments_names_key() {
        let err = EnvironError::OverlappingEnvironments {
            key: "API_URL".into(),
            table: "env".into(),
            environment: "Debug".into(),
            count: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("API_URL"));
        assert!(msg.contains("Debug"));
        assert!(msg.contains("must not overlap"));
    }

    #[test]
    fn variable_not_found_names_variable_and_table() {
        let err = EnvironError::VariableNotFound {
            name: "APP_URL".into(),
            table: "env".into(),
        };
        assert_eq!(
            err.to_string(),
            "environment variable 'APP_URL' not found in 'env'"
        );
    }

    #[test]
    fn environments_not_supported_names_schema_change() {
        let err = EnvironError::EnvironmentsNotSupported {
            table: "basic_env".into(),
            requested: vec!["Debug".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("basic_env"));
        assert!(msg.contains("boolean column"));
        assert!(msg.contains("[Debug]"));
    }

    #[test]
    fn config_parse_error_displays_path_and_message() {
        let err = EnvironError::ConfigParseError {
            path: PathBuf::from("/config.yml"),
            message: "invalid syntax".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/config.yml"));
        assert!(msg.contains("invalid syntax"));
    }

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: EnvironError = io_err.into();
        assert!(matches!(err, EnvironError::Io(_)));
    }

    #[test]
    fn anyhow_error_converts() {
        let err: EnvironError = anyhow::anyhow!("boom").into();
        assert_eq!(err.to_string(), "boom");
    }
}
