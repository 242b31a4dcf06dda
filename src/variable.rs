//! A configuration variable as seen by one `get` or `set`.

use std::fmt;

use serde_json::Value;

use crate::value::StoredValue;

/// A named variable with its caller default and stored value.
///
/// A variable is in use when a stored value was found for it; otherwise it
/// is only available and reads fall back to its default.
///
/// # Example
///
/// ```
/// use environ::variable::Variable;
/// use serde_json::json;
///
/// let mut variable = Variable::new("API_URL", Some(json!("localhost")));
/// assert!(!variable.in_use());
///
/// variable.set_value(json!("example.com").into());
/// assert!(variable.in_use());
/// assert_eq!(
///     variable.details(),
///     "API_URL=example.com, default=localhost, in_use=true"
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    name: String,
    default: Option<Value>,
    value: Option<StoredValue>,
}

impl Variable {
    /// A variable with no stored value.
    pub fn new(name: impl Into<String>, default: Option<Value>) -> Self {
        Self {
            name: name.into(),
            default,
            value: None,
        }
    }

    /// A variable with a stored value.
    pub fn stored(name: impl Into<String>, value: StoredValue) -> Self {
        Self {
            name: name.into(),
            default: None,
            value: Some(value),
        }
    }

    /// Record the stored value, marking the variable in use.
    pub fn set_value(&mut self, value: StoredValue) {
        self.value = Some(value);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// The stored value, still wrapped if it is a secret.
    pub fn stored_value(&self) -> Option<&StoredValue> {
        self.value.as_ref()
    }

    pub fn in_use(&self) -> bool {
        self.value.is_some()
    }

    /// Take the default back out.
    pub fn into_default(self) -> Option<Value> {
        self.default
    }

    /// One line summary: `name=value, default=default, in_use=flag`.
    ///
    /// The value falls back to the default when nothing is stored. Missing
    /// values show as `NotSet`; secrets show as their reference.
    pub fn details(&self) -> String {
        let value = match (&self.value, &self.default) {
            (Some(stored), _) => display_stored(stored),
            (None, Some(default)) => display_value(default),
            (None, None) => NOT_SET.to_string(),
        };
        let default = self
            .default
            .as_ref()
            .map(display_value)
            .unwrap_or_else(|| NOT_SET.to_string());
        format!(
            "{}={}, default={}, in_use={}",
            self.name,
            value,
            default,
            self.in_use()
        )
    }
}

const NOT_SET: &str = "NotSet";

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn display_stored(stored: &StoredValue) -> String {
    match stored {
        StoredValue::Plain(value) => display_value(value),
        secret @ StoredValue::Secret(_) => secret.to_string(),
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secrets::SecretRef;
    use serde_json::json;

    #[test]
    fn default_only_is_available() {
        let variable = Variable::new("APP_URL", Some(json!("default.com")));
        assert!(!variable.in_use());
        insta::assert_snapshot!(
            variable.details(),
            @"APP_URL=default.com, default=default.com, in_use=false"
        );
    }

    #[test]
    fn nothing_set_shows_not_set() {
        let variable = Variable::new("APP_URL", None);
        assert_eq!(
            variable.details(),
            "APP_URL=NotSet, default=NotSet, in_use=false"
        );
    }

    #[test]
    fn structured_values_show_as_json() {
        let mut variable = Variable::new("LIMITS", Some(json!({"max": 3})));
        variable.set_value(json!([1, 2]).into());
        assert_eq!(
            variable.details(),
            r#"LIMITS=[1,2], default={"max":3}, in_use=true"#
        );
    }

    #[test]
    fn secret_details_show_reference() {
        let variable = Variable::stored("API_KEY", SecretRef::new("test_secret").into());
        let details = variable.details();
        assert!(details.contains("🔒 test_secret"));
        assert!(details.ends_with("in_use=true"));
    }

    #[test]
    fn display_is_name() {
        let variable = Variable::new("APP_URL", None);
        assert_eq!(variable.to_string(), "APP_URL");
    }

    #[test]
    fn into_default_returns_same_value() {
        let default = json!({"nested": {"list": [1, 2, 3]}});
        let variable = Variable::new("NESTED", Some(default.clone()));
        assert_eq!(variable.into_default(), Some(default));
    }
}
