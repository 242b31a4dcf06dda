//! Configuration loading for the `environ` binary.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Layering in [`EnvironConfig::merge`]
//!
//! # Example
//!
//! ```
//! use environ::config::load_merged_config;
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! let dir = temp.path().join(".environ");
//! fs::create_dir_all(&dir).unwrap();
//! fs::write(dir.join("config.yml"), "table: settings").unwrap();
//!
//! let config = load_merged_config(temp.path()).unwrap();
//! assert_eq!(config.table_name(), "settings");
//! ```
//!
//! # Configuration File Locations
//!
//! Files are merged in this order, later files overriding earlier ones:
//! 1. Project config (`.environ/config.yml`)
//! 2. Local overrides (`.environ/config.local.yml`)

pub mod loader;
pub mod schema;

pub use loader::{
    find_project_root, load_config, load_config_file, load_merged_config,
    parse_config, ConfigPaths, CONFIG_DIR,
};
pub use schema::{EnvironConfig, SecretsConfig, DEFAULT_STORE_PATH};
