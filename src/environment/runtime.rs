//! The runtime environment the host application is running in.
//!
//! The host names its environment freely, e.g. `Published` for the live app or
//! `Debug for alice@example.com` for a developer session. Matching that name
//! against declared environments is done by
//! [`resolve_environment`](super::resolve_environment).

use std::collections::BTreeSet;

/// Variable holding the runtime environment name.
pub const ENVIRONMENT_VAR: &str = "ENVIRON_ENVIRONMENT";
/// Variable holding comma-separated runtime environment tags.
pub const TAGS_VAR: &str = "ENVIRON_TAGS";

/// Supplies the host's current environment.
pub trait EnvironmentProvider {
    /// The current environment name.
    fn current_environment_name(&self) -> String;

    /// Tags attached to the current environment.
    fn tags(&self) -> BTreeSet<String>;
}

/// A fixed runtime environment.
///
/// # Example
///
/// ```
/// use environ::environment::{EnvironmentProvider, RuntimeEnvironment};
///
/// let env = RuntimeEnvironment::new("Debug for alice@example.com").with_tag("debug");
/// assert_eq!(env.current_environment_name(), "Debug for alice@example.com");
/// assert!(env.tags().contains("debug"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeEnvironment {
    name: String,
    tags: BTreeSet<String>,
}

impl RuntimeEnvironment {
    /// Create an environment with no tags.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tags: BTreeSet::new(),
        }
    }

    /// Add a tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Add several tags.
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Read the environment from `ENVIRON_ENVIRONMENT` and `ENVIRON_TAGS`.
    ///
    /// Returns `None` when no environment name is set.
    pub fn from_process_env() -> Option<Self> {
        Self::from_env_with(|key| std::env::var(key))
    }

    /// Read with a custom env var lookup (for testing).
    pub fn from_env_with<F>(env_fn: F) -> Option<Self>
    where
        F: Fn(&str) -> Result<String, std::env::VarError>,
    {
        let name = env_fn(ENVIRONMENT_VAR).ok()?;
        if name.trim().is_empty() {
            return None;
        }
        let tags = env_fn(TAGS_VAR).unwrap_or_default();
        Some(
            Self::new(name).with_tags(
                tags.split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(String::from),
            ),
        )
    }
}

impl EnvironmentProvider for RuntimeEnvironment {
    fn current_environment_name(&self) -> String {
        self.name.clone()
    }

    fn tags(&self) -> BTreeSet<String> {
        self.tags.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn make_env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Result<String, std::env::VarError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned().ok_or(std::env::VarError::NotPresent)
    }

    #[test]
    fn nothing_in_clean_env() {
        assert!(RuntimeEnvironment::from_env_with(make_env(&[])).is_none());
    }

    #[test]
    fn blank_name_is_ignored() {
        let env = make_env(&[("ENVIRON_ENVIRONMENT", "  ")]);
        assert!(RuntimeEnvironment::from_env_with(env).is_none());
    }

    #[test]
    fn reads_name_and_tags() {
        let env = make_env(&[
            ("ENVIRON_ENVIRONMENT", "Debug for bob@example.com"),
            ("ENVIRON_TAGS", "debug, local,,"),
        ]);
        let runtime = RuntimeEnvironment::from_env_with(env).unwrap();
        assert_eq!(runtime.current_environment_name(), "Debug for bob@example.com");
        let tags: Vec<String> = runtime.tags().into_iter().collect();
        assert_eq!(tags, vec!["debug", "local"]);
    }

    #[test]
    fn name_without_tags() {
        let env = make_env(&[("ENVIRON_ENVIRONMENT", "Published")]);
        let runtime = RuntimeEnvironment::from_env_with(env).unwrap();
        assert!(runtime.tags().is_empty());
    }
}
