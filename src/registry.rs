//! Registry of variables looked up during this process.
//!
//! Every `get` and `set` registers its [`Variable`], so after a run the
//! registry lists which variables came from the table (`in_use`) and which
//! fell back to defaults (`available`). Entries are last-write-wins.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard};

use crate::variable::Variable;

/// Variables registered by lookups, keyed by name.
///
/// Shared between [`Environ`](crate::Environ) instances through an `Arc`.
///
/// # Example
///
/// ```
/// use environ::registry::VariableRegistry;
/// use environ::variable::Variable;
///
/// let registry = VariableRegistry::new();
/// registry.register(Variable::new("API_URL", None));
/// assert_eq!(registry.available(), vec!["API_URL"]);
/// assert!(registry.in_use().is_empty());
///
/// registry.reset();
/// assert!(registry.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct VariableRegistry {
    variables: Mutex<BTreeMap<String, Variable>>,
}

impl VariableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, Variable>> {
        // A panic while holding the lock leaves the map intact.
        self.variables
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Add or replace a variable.
    pub fn register(&self, variable: Variable) {
        self.lock().insert(variable.name().to_string(), variable);
    }

    /// Get a copy of a registered variable.
    pub fn get(&self, name: &str) -> Option<Variable> {
        self.lock().get(name).cloned()
    }

    /// Names of variables with a stored value.
    pub fn in_use(&self) -> Vec<String> {
        self.names_where(|v| v.in_use())
    }

    /// Names of variables relying on their default.
    pub fn available(&self) -> Vec<String> {
        self.names_where(|v| !v.in_use())
    }

    /// Names of every registered variable.
    pub fn all(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Forget every registered variable.
    pub fn reset(&self) {
        self.lock().clear();
    }

    fn names_where(&self, keep: impl Fn(&Variable) -> bool) -> Vec<String> {
        self.lock()
            .values()
            .filter(|v| keep(v))
            .map(|v| v.name().to_string())
            .collect()
    }

    /// The report with each variable's details instead of just its name.
    pub fn detailed(&self) -> String {
        let variables = self.lock();
        let (in_use, available): (Vec<&Variable>, Vec<&Variable>) =
            variables.values().partition(|v| v.in_use());
        report(
            in_use.iter().map(|v| v.details()),
            available.iter().map(|v| v.details()),
        )
    }
}

fn report(
    in_use: impl Iterator<Item = String>,
    available: impl Iterator<Item = String>,
) -> String {
    let section = |lines: Vec<String>, empty: &str| {
        if lines.is_empty() {
            empty.to_string()
        } else {
            lines.join("\n\t")
        }
    };
    format!(
        "Environment Variables\nin_use:\n\t{}\navailable:\n\t{}",
        section(in_use.collect(), "No variables in use."),
        section(available.collect(), "No variables available.")
    )
}

/// The summary report of variable names.
impl fmt::Display for VariableRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = report(self.in_use().into_iter(), self.available().into_iter());
        write!(f, "{}", text)
    }
}
