//! Runtime environment name resolution.
//!
//! Maps the host's environment name onto one declared environment:
//! 1. An exact match wins
//! 2. Otherwise a single declared name that prefixes the runtime name, or
//!    that the runtime name prefixes
//! 3. No candidate means no environment applies (the default row is used)
//! 4. Several candidates are an error
//!
//! A blank runtime name never matches.

use std::collections::BTreeSet;

use tracing::debug;

use crate::error::{EnvironError, Result};

/// Resolve a runtime environment name against the declared environments.
///
/// # Example
///
/// ```
/// use environ::environment::resolve_environment;
/// use std::collections::BTreeSet;
///
/// let declared: BTreeSet<String> =
///     ["Debug", "Published"].into_iter().map(String::from).collect();
///
/// let resolved = resolve_environment("Debug for alice@example.com", &declared).unwrap();
/// assert_eq!(resolved.as_deref(), Some("Debug"));
///
/// assert_eq!(resolve_environment("Staging", &declared).unwrap(), None);
/// ```
pub fn resolve_environment(runtime: &str, declared: &BTreeSet<String>) -> Result<Option<String>> {
    if runtime.trim().is_empty() {
        debug!("Blank runtime environment, using the default row");
        return Ok(None);
    }
    if declared.contains(runtime) {
        return Ok(Some(runtime.to_string()));
    }

    let candidates: Vec<&String> = declared
        .iter()
        .filter(|env| runtime.starts_with(env.as_str()) || env.starts_with(runtime))
        .collect();

    match candidates.as_slice() {
        [] => {
            debug!("Environment '{}' matches no declared environment", runtime);
            Ok(None)
        }
        [env] => {
            debug!("Environment '{}' resolved to '{}'", runtime, env);
            Ok(Some((*env).clone()))
        }
        many => Err(EnvironError::AmbiguousEnvironment {
            runtime: runtime.to_string(),
            candidates: many.iter().map(|env| env.to_string()).collect(),
        }),
    }
}
