//! Secret references and vaults.
//!
//! Values that should not live in the table in plaintext are stored as a
//! [`SecretRef`] and resolved through a [`SecretVault`] only when a variable
//! is read.
//!
//! - [`SecretVault`] - Resolves a secret name to its plaintext
//! - [`MemoryVault`] - In-process vault, mostly for tests
//! - [`EnvVault`] - Reads secrets from prefixed process environment variables
//!
//! # Example
//!
//! ```
//! use environ::secrets::{MemoryVault, SecretRef, SecretVault};
//!
//! let mut vault = MemoryVault::new();
//! vault.insert("stripe_key", "sk_test_123");
//!
//! let secret = SecretRef::new("stripe_key");
//! assert_eq!(vault.resolve(secret.name()).unwrap(), "sk_test_123");
//! assert_eq!(secret.to_string(), "🔒 stripe_key");
//! ```

pub mod vault;

pub use vault::{EnvVault, MemoryVault, SecretVault, DEFAULT_SECRET_PREFIX};

use std::fmt;

/// A reference to a secret held by a [`SecretVault`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SecretRef {
    name: String,
}

impl SecretRef {
    /// Create a reference to the named secret.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The secret's name in the vault.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for SecretRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", crate::value::SECRET_MARKER, self.name)
    }
}
