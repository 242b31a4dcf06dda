//! Secret vault implementations.

use std::collections::HashMap;

use crate::error::{EnvironError, Result};

/// Default prefix for [`EnvVault`] lookups.
pub const DEFAULT_SECRET_PREFIX: &str = "ENVIRON_SECRET_";

/// Resolves secret names to plaintext.
pub trait SecretVault {
    /// Resolve a secret by name.
    ///
    /// Returns `SecretNotFound` if the vault holds no such secret.
    fn resolve(&self, name: &str) -> Result<String>;
}

/// In-process vault backed by a map.
#[derive(Debug, Clone, Default)]
pub struct MemoryVault {
    secrets: HashMap<String, String>,
}

impl MemoryVault {
    /// Create an empty vault.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a secret.
    pub fn insert(&mut self, name: impl Into<String>, plaintext: impl Into<String>) {
        self.secrets.insert(name.into(), plaintext.into());
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_secret(mut self, name: impl Into<String>, plaintext: impl Into<String>) -> Self {
        self.insert(name, plaintext);
        self
    }

    /// Number of secrets held.
    pub fn len(&self) -> usize {
        self.secrets.len()
    }

    /// Check if the vault is empty.
    pub fn is_empty(&self) -> bool {
        self.secrets.is_empty()
    }
}

impl SecretVault for MemoryVault {
    fn resolve(&self, name: &str) -> Result<String> {
        self.secrets
            .get(name)
            .cloned()
            .ok_or_else(|| EnvironError::SecretNotFound {
                name: name.to_string(),
            })
    }
}

/// Vault that reads `<prefix><NAME>` from the process environment.
///
/// Secret names are upper-cased and `-`, `.` and spaces become `_`, so the
/// secret `stripe-key` is read from `ENVIRON_SECRET_STRIPE_KEY`.
///
/// # Example
///
/// ```
/// use environ::secrets::EnvVault;
///
/// let vault = EnvVault::new("APP_SECRET_");
/// assert_eq!(vault.variable_for("stripe-key"), "APP_SECRET_STRIPE_KEY");
/// ```
#[derive(Debug, Clone)]
pub struct EnvVault {
    prefix: String,
}

impl EnvVault {
    /// Create a vault reading variables with the given prefix.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// The process environment variable a secret is read from.
    pub fn variable_for(&self, name: &str) -> String {
        let suffix: String = name
            .chars()
            .map(|c| match c {
                '-' | '.' | ' ' => '_',
                c => c.to_ascii_uppercase(),
            })
            .collect();
        format!("{}{}", self.prefix, suffix)
    }

    /// Resolve with a custom env var lookup (for testing).
    pub fn resolve_with_env<F>(&self, name: &str, env_fn: F) -> Result<String>
    where
        F: Fn(&str) -> std::result::Result<String, std::env::VarError>,
    {
        env_fn(&self.variable_for(name)).map_err(|_| EnvironError::SecretNotFound {
            name: name.to_string(),
        })
    }
}

impl Default for EnvVault {
    fn default() -> Self {
        Self::new(DEFAULT_SECRET_PREFIX)
    }
}

impl SecretVault for EnvVault {
    fn resolve(&self, name: &str) -> Result<String> {
        self.resolve_with_env(name, |key| std::env::var(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_env(vars: &[(&str, &str)]) -> impl Fn(&str) -> std::result::Result<String, std::env::VarError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned().ok_or(std::env::VarError::NotPresent)
    }

    #[test]
    fn memory_vault_resolves_known_secret() {
        let vault = MemoryVault::new().with_secret("test_secret", "42");
        assert_eq!(vault.resolve("test_secret").unwrap(), "42");
        assert_eq!(vault.len(), 1);
    }

    #[test]
    fn memory_vault_missing_secret() {
        let vault = MemoryVault::new();
        assert!(vault.is_empty());
        assert!(matches!(
            vault.resolve("nope"),
            Err(EnvironError::SecretNotFound { name }) if name == "nope"
        ));
    }

    #[test]
    fn env_vault_maps_names_to_variables() {
        let vault = EnvVault::default();
        assert_eq!(vault.variable_for("db.password"), "ENVIRON_SECRET_DB_PASSWORD");
        assert_eq!(vault.variable_for("test secret"), "ENVIRON_SECRET_TEST_SECRET");
    }

    #[test]
    fn env_vault_reads_prefixed_variable() {
        let vault = EnvVault::new("X_");
        let env = mock_env(&[("X_TOKEN", "abc")]);
        assert_eq!(vault.resolve_with_env("token", &env).unwrap(), "abc");
    }

    #[test]
    fn env_vault_missing_variable() {
        let vault = EnvVault::new("X_");
        let env = mock_env(&[]);
        assert!(matches!(
            vault.resolve_with_env("token", env),
            Err(EnvironError::SecretNotFound { .. })
        ));
    }
}
