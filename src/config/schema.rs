//! Configuration schema.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::environ::DEFAULT_TABLE;
use crate::environment::RuntimeEnvironment;
use crate::secrets::DEFAULT_SECRET_PREFIX;

/// Store file used when none is configured, relative to the project root.
pub const DEFAULT_STORE_PATH: &str = ".environ/store.yml";

/// Contents of `.environ/config.yml`.
///
/// ```yaml
/// store: .environ/store.yml
/// table: env
/// environment: Debug for alice@example.com
/// tags: [debug]
/// secrets:
///   prefix: APP_SECRET_
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironConfig {
    /// Store file, relative to the project root unless absolute.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store: Option<PathBuf>,

    /// Variables table name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,

    /// Runtime environment name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,

    /// Runtime environment tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Secret lookup settings.
    pub secrets: SecretsConfig,
}

/// Where secrets are read from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecretsConfig {
    /// Process environment prefix for secret variables.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
}

impl EnvironConfig {
    /// The store file for a project.
    pub fn store_path(&self, project_root: &Path) -> PathBuf {
        match &self.store {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => project_root.join(path),
            None => project_root.join(DEFAULT_STORE_PATH),
        }
    }

    pub fn table_name(&self) -> &str {
        self.table.as_deref().unwrap_or(DEFAULT_TABLE)
    }

    pub fn secret_prefix(&self) -> &str {
        self.secrets.prefix.as_deref().unwrap_or(DEFAULT_SECRET_PREFIX)
    }

    /// Layer `overlay` over this config. Fields set in `overlay` win, and a
    /// non-empty tag list replaces the inherited one.
    pub fn merge(self, overlay: EnvironConfig) -> Self {
        Self {
            store: overlay.store.or(self.store),
            table: overlay.table.or(self.table),
            environment: overlay.environment.or(self.environment),
            tags: if overlay.tags.is_empty() {
                self.tags
            } else {
                overlay.tags
            },
            secrets: SecretsConfig {
                prefix: overlay.secrets.prefix.or(self.secrets.prefix),
            },
        }
    }

    /// The configured runtime environment, if any.
    pub fn runtime_environment(&self) -> Option<RuntimeEnvironment> {
        self.environment
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .map(|name| RuntimeEnvironment::new(name).with_tags(self.tags.iter().cloned()))
    }
}
