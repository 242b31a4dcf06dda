//! Configuration file discovery and loading.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::schema::EnvironConfig;
use crate::error::{EnvironError, Result};

/// Directory holding project configuration.
pub const CONFIG_DIR: &str = ".environ";

/// Paths to configuration files in priority order (later overrides earlier).
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    /// Project config: .environ/config.yml
    pub project: Option<PathBuf>,

    /// Local overrides: .environ/config.local.yml
    pub project_local: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover config files for the given project root.
    pub fn discover(project_root: &Path) -> Self {
        Self {
            project: existing(project_root.join(CONFIG_DIR).join("config.yml")),
            project_local: existing(project_root.join(CONFIG_DIR).join("config.local.yml")),
        }
    }

    /// Returns all existing config paths in merge order.
    pub fn all_existing(&self) -> Vec<&PathBuf> {
        self.project.iter().chain(self.project_local.iter()).collect()
    }
}

fn existing(path: PathBuf) -> Option<PathBuf> {
    if path.exists() {
        Some(path)
    } else {
        None
    }
}

/// Find the project root by walking up from `start`.
///
/// A directory containing `.environ` wins over one containing `.git`.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    let mut git_root = None;

    loop {
        if current.join(CONFIG_DIR).is_dir() {
            return Some(current);
        }
        if git_root.is_none() && current.join(".git").exists() {
            git_root = Some(current.clone());
        }
        if !current.pop() {
            return git_root;
        }
    }
}

/// Load a single config file.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<EnvironConfig> {
    let content = read(path)?;
    parse_config(&content, path)
}

/// Parse YAML content into an [`EnvironConfig`].
///
/// An empty document is the default config.
pub fn parse_config(content: &str, source_path: &Path) -> Result<EnvironConfig> {
    if content.trim().is_empty() {
        return Ok(EnvironConfig::default());
    }
    serde_yaml::from_str(content).map_err(|e| EnvironError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            EnvironError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            EnvironError::Io(e)
        }
    })
}

/// Load the project's config files and layer them.
///
/// Each file is parsed on its own, so a parse error names the file at
/// fault. A project without config files gets the default config.
pub fn load_merged_config(project_root: &Path) -> Result<EnvironConfig> {
    let paths = ConfigPaths::discover(project_root);

    let mut config = EnvironConfig::default();
    for path in paths.all_existing() {
        debug!("Loading config from {}", path.display());
        config = config.merge(load_config_file(path)?);
    }
    Ok(config)
}

/// Load config with optional path override.
///
/// If `config_override` is provided, loads only that file without merging.
pub fn load_config(project_root: &Path, config_override: Option<&Path>) -> Result<EnvironConfig> {
    if let Some(override_path) = config_override {
        load_config_file(override_path)
    } else {
        load_merged_config(project_root)
    }
}
