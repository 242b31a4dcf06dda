//! Stored values.
//!
//! A row's `value` column holds either a plain JSON value or a secret
//! reference. On disk a secret reference is the single-field object
//! `{"🔒": "<secret name>"}`; [`StoredValue::decode`] and
//! [`StoredValue::encode`] translate at the store boundary so the rest of the
//! crate never inspects raw objects for the marker.

use std::fmt;

use serde_json::{Map, Value};

use crate::secrets::SecretRef;

/// Reserved key that marks a stored object as a secret reference.
pub const SECRET_MARKER: &str = "🔒";

/// A value as stored in the `value` column of a row.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredValue {
    /// An ordinary value, returned from `get` as is.
    Plain(Value),
    /// A reference into the secrets vault, dereferenced on read.
    Secret(SecretRef),
}

impl StoredValue {
    /// Decode a raw column value.
    ///
    /// Only an object with exactly one field, named [`SECRET_MARKER`], whose
    /// value is a string is a secret reference. Everything else is plain.
    ///
    /// # Example
    ///
    /// ```
    /// use environ::value::StoredValue;
    /// use serde_json::json;
    ///
    /// let stored = StoredValue::decode(json!({"🔒": "stripe_key"}));
    /// assert!(stored.is_secret());
    ///
    /// let stored = StoredValue::decode(json!({"🔒": "a", "other": 1}));
    /// assert!(!stored.is_secret());
    /// ```
    pub fn decode(raw: Value) -> Self {
        if let Value::Object(map) = &raw {
            if map.len() == 1 {
                if let Some(Value::String(name)) = map.get(SECRET_MARKER) {
                    return Self::Secret(SecretRef::new(name.clone()));
                }
            }
        }
        Self::Plain(raw)
    }

    /// Encode for writing into a row.
    pub fn encode(&self) -> Value {
        match self {
            Self::Plain(value) => value.clone(),
            Self::Secret(secret) => {
                let mut map = Map::new();
                map.insert(
                    SECRET_MARKER.to_string(),
                    Value::String(secret.name().to_string()),
                );
                Value::Object(map)
            }
        }
    }

    /// Check if this is a secret reference.
    pub fn is_secret(&self) -> bool {
        matches!(self, Self::Secret(_))
    }

    /// Check if this is a plain value shaped like a secret reference.
    ///
    /// Such a value cannot be stored, it would decode as a secret.
    pub fn is_reserved(&self) -> bool {
        match self {
            Self::Plain(value) => Self::decode(value.clone()).is_secret(),
            Self::Secret(_) => false,
        }
    }
}

impl From<Value> for StoredValue {
    fn from(value: Value) -> Self {
        Self::Plain(value)
    }
}

impl From<SecretRef> for StoredValue {
    fn from(secret: SecretRef) -> Self {
        Self::Secret(secret)
    }
}

impl From<&str> for StoredValue {
    fn from(value: &str) -> Self {
        Self::Plain(Value::String(value.to_string()))
    }
}

impl From<String> for StoredValue {
    fn from(value: String) -> Self {
        Self::Plain(Value::String(value))
    }
}

macro_rules! impl_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for StoredValue {
                fn from(value: $ty) -> Self {
                    Self::Plain(Value::from(value))
                }
            }
        )*
    };
}

impl_from_number!(i32, i64, u32, u64, f64);

impl From<bool> for StoredValue {
    fn from(value: bool) -> Self {
        Self::Plain(Value::Bool(value))
    }
}

/// Secrets display as their wrapper, never as plaintext.
impl fmt::Display for StoredValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain(value) => write!(f, "{}", value),
            Self::Secret(secret) => write!(f, "{}", secret),
        }
    }
}
