//! Environment requests for writes.
//!
//! A caller says which environments a value applies to in one of several
//! shapes. [`EnvironmentRequest::normalize`] turns any of them into an
//! [`EnvironmentAssignment`] checked against the declared environments.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

use crate::error::{EnvironError, Result};
use crate::store::Predicate;

/// Which environments a written value applies to.
///
/// # Example
///
/// ```
/// use environ::environment::EnvironmentRequest;
/// use std::collections::BTreeSet;
///
/// let declared: BTreeSet<String> =
///     ["Debug", "Published"].into_iter().map(String::from).collect();
///
/// let assignment = EnvironmentRequest::from("Debug").normalize(&declared).unwrap();
/// assert_eq!(assignment.scoped(), vec!["Debug"]);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EnvironmentRequest {
    /// The default row, applying to no specific environment.
    #[default]
    Default,
    /// A single environment.
    Named(String),
    /// Several environments sharing one row.
    Many(Vec<String>),
    /// Per-environment flags. Only `true` entries are kept; `false` and
    /// `null` mean "not this environment".
    Flags(BTreeMap<String, Value>),
}

impl EnvironmentRequest {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    pub fn many(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::Many(names.into_iter().map(Into::into).collect())
    }

    /// Build a flags request from boolean entries.
    pub fn flags<'a>(entries: impl IntoIterator<Item = (&'a str, bool)>) -> Self {
        Self::Flags(
            entries
                .into_iter()
                .map(|(name, flag)| (name.to_string(), Value::Bool(flag)))
                .collect(),
        )
    }

    /// Parse a request from JSON.
    ///
    /// `null` is the default row, a string names one environment, an array of
    /// strings names several and an object holds per-environment flags.
    pub fn from_json(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Self::Default),
            Value::String(name) => Ok(Self::Named(name)),
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(name) => Ok(name),
                    other => Err(EnvironError::InvalidEnvironmentRequest {
                        message: format!("environment names must be strings, got {}", other),
                    }),
                })
                .collect::<Result<Vec<_>>>()
                .map(Self::Many),
            Value::Object(map) => Ok(Self::Flags(map.into_iter().collect())),
            other => Err(EnvironError::InvalidEnvironmentRequest {
                message: format!(
                    "expected null, a name, a list of names or a map of flags, got {}",
                    other
                ),
            }),
        }
    }

    /// Check if the request assigns any environment.
    ///
    /// A map of flags is scoped only when some flag is `true`; false and
    /// null flags leave the request on the default row.
    pub fn is_scoped(&self) -> bool {
        match self {
            Self::Default => false,
            Self::Named(name) => !name.is_empty(),
            Self::Many(names) => !names.is_empty(),
            Self::Flags(flags) => flags.values().any(|flag| flag == &Value::Bool(true)),
        }
    }

    /// Every environment name the request mentions.
    pub fn requested(&self) -> Vec<String> {
        match self {
            Self::Default => Vec::new(),
            Self::Named(name) if name.is_empty() => Vec::new(),
            Self::Named(name) => vec![name.clone()],
            Self::Many(names) => names.clone(),
            Self::Flags(flags) => flags.keys().cloned().collect(),
        }
    }

    /// Validate against the declared environments and canonicalize.
    ///
    /// Unknown names fail with `UnknownEnvironment`; a flag that is not a
    /// boolean or null fails with `InvalidEnvironmentFlag`.
    pub fn normalize(&self, declared: &BTreeSet<String>) -> Result<EnvironmentAssignment> {
        let check = |name: &str| -> Result<()> {
            if declared.contains(name) {
                Ok(())
            } else {
                Err(EnvironError::UnknownEnvironment {
                    name: name.to_string(),
                    available: declared.iter().cloned().collect(),
                })
            }
        };

        let mut assigned = BTreeMap::new();
        match self {
            Self::Default => return Ok(EnvironmentAssignment::default_for(declared)),
            Self::Named(name) if name.is_empty() => {
                return Ok(EnvironmentAssignment::default_for(declared))
            }
            Self::Named(name) => {
                check(name)?;
                assigned.insert(name.clone(), Some(true));
            }
            Self::Many(names) => {
                for name in names {
                    check(name)?;
                    assigned.insert(name.clone(), Some(true));
                }
            }
            Self::Flags(flags) => {
                for (name, flag) in flags {
                    check(name)?;
                    match flag {
                        Value::Bool(true) => {
                            assigned.insert(name.clone(), Some(true));
                        }
                        Value::Bool(false) | Value::Null => {}
                        other => {
                            return Err(EnvironError::InvalidEnvironmentFlag {
                                name: name.clone(),
                                value: other.to_string(),
                            })
                        }
                    }
                }
            }
        }

        if assigned.is_empty() {
            return Ok(EnvironmentAssignment::default_for(declared));
        }
        Ok(EnvironmentAssignment(assigned))
    }
}

impl From<&str> for EnvironmentRequest {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl From<String> for EnvironmentRequest {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

impl From<Vec<&str>> for EnvironmentRequest {
    fn from(names: Vec<&str>) -> Self {
        Self::many(names)
    }
}

impl From<Vec<String>> for EnvironmentRequest {
    fn from(names: Vec<String>) -> Self {
        Self::Many(names)
    }
}

impl From<BTreeSet<String>> for EnvironmentRequest {
    fn from(names: BTreeSet<String>) -> Self {
        Self::many(names)
    }
}

impl From<BTreeMap<String, Value>> for EnvironmentRequest {
    fn from(flags: BTreeMap<String, Value>) -> Self {
        Self::Flags(flags)
    }
}

impl From<Option<&str>> for EnvironmentRequest {
    fn from(name: Option<&str>) -> Self {
        name.map(Self::from).unwrap_or_default()
    }
}

/// A normalized environment assignment.
///
/// Scoped assignments hold only `Some(true)` entries. The default assignment
/// holds every declared environment as `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentAssignment(BTreeMap<String, Option<bool>>);

impl EnvironmentAssignment {
    /// The default row assignment: no environment applies.
    pub fn default_for(declared: &BTreeSet<String>) -> Self {
        Self(declared.iter().map(|name| (name.clone(), None)).collect())
    }

    /// Check if no environment is assigned.
    pub fn is_default(&self) -> bool {
        !self.0.values().any(|flag| *flag == Some(true))
    }

    /// Names of the assigned environments.
    pub fn scoped(&self) -> Vec<&str> {
        self.0
            .iter()
            .filter(|(_, flag)| **flag == Some(true))
            .map(|(name, _)| name.as_str())
            .collect()
    }

    pub fn as_map(&self) -> &BTreeMap<String, Option<bool>> {
        &self.0
    }

    /// Exact-match predicate over every declared environment column.
    ///
    /// Assigned columns must be true and all others must not be, so a write
    /// lands on the row with exactly this assignment.
    pub fn predicate(&self, key: &str, declared: &BTreeSet<String>) -> Predicate {
        declared
            .iter()
            .fold(Predicate::new(key), |predicate, name| {
                if self.0.get(name) == Some(&Some(true)) {
                    predicate.with_true(name.as_str())
                } else {
                    predicate.with_not_true(name.as_str())
                }
            })
    }
}
