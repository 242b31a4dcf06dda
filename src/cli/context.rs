//! Project context shared by commands.
//!
//! Settings are layered: config files first, then command-line flags (and
//! their environment variable fallbacks).

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::config::{load_config, EnvironConfig};
use crate::environ::Environ;
use crate::error::Result;
use crate::secrets::EnvVault;
use crate::store::FileStore;

use super::args::Cli;

/// Settings given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config: Option<PathBuf>,
    pub store: Option<PathBuf>,
    pub table: Option<String>,
    pub environment: Option<String>,
    pub tags: Vec<String>,
}

impl From<&Cli> for Overrides {
    fn from(cli: &Cli) -> Self {
        Self {
            config: cli.config.clone(),
            store: cli.store.clone(),
            table: cli.table.clone(),
            environment: cli.environment.clone(),
            tags: cli.tags.clone(),
        }
    }
}

/// The resolved configuration for one invocation.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    project_root: PathBuf,
    config: EnvironConfig,
}

impl ProjectContext {
    /// Load config for `project_root` and apply the overrides.
    pub fn load(project_root: &Path, overrides: &Overrides) -> Result<Self> {
        let mut config = load_config(project_root, overrides.config.as_deref())?;

        if let Some(store) = &overrides.store {
            config.store = Some(store.clone());
        }
        if let Some(table) = &overrides.table {
            config.table = Some(table.clone());
        }
        if let Some(environment) = &overrides.environment {
            config.environment = Some(environment.clone());
        }
        if !overrides.tags.is_empty() {
            config.tags = overrides.tags.clone();
        }

        debug!("Resolved config: {:?}", config);
        Ok(Self {
            project_root: project_root.to_path_buf(),
            config,
        })
    }

    pub fn config(&self) -> &EnvironConfig {
        &self.config
    }

    pub fn store_path(&self) -> PathBuf {
        self.config.store_path(&self.project_root)
    }

    pub fn table(&self) -> &str {
        self.config.table_name()
    }

    pub fn open_store(&self) -> Result<FileStore> {
        FileStore::open(self.store_path())
    }

    /// A resolver over the configured store, table, secrets and environment.
    pub fn environ(&self) -> Result<Environ> {
        let mut environ = Environ::new(self.open_store()?)
            .with_table(self.table())
            .with_vault(EnvVault::new(self.config.secret_prefix()));
        if let Some(runtime) = self.config.runtime_environment() {
            environ.set_environment(runtime);
        }
        Ok(environ)
    }
}

/// Parse a command-line value as JSON, falling back to a plain string.
///
/// ```
/// use environ::cli::context::parse_value;
/// use serde_json::json;
///
/// assert_eq!(parse_value("42"), json!(42));
/// assert_eq!(parse_value("{\"a\": true}"), json!({"a": true}));
/// assert_eq!(parse_value("localhost:8080"), json!("localhost:8080"));
/// ```
pub fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Render a value for output.
pub fn format_value(value: &Value, raw: bool) -> String {
    match value {
        Value::String(s) if raw => s.clone(),
        other => other.to_string(),
    }
}
