//! The variable resolver.
//!
//! [`Environ`] reads variables from a table with one row per
//! (key, environment assignment), picking the row for the current runtime
//! environment and falling back to the default row and then the caller's
//! default. Writes land on the row with exactly the requested assignment.

use std::cell::OnceCell;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::environment::{
    resolve_environment, EnvironmentAssignment, EnvironmentProvider, EnvironmentRequest,
};
use crate::error::{EnvironError, Result};
use crate::registry::VariableRegistry;
use crate::schema::{TableSchema, INFO_COLUMN, VALUE_COLUMN};
use crate::secrets::{EnvVault, SecretVault};
use crate::store::{Predicate, Row, RowFields, RowStore};
use crate::value::StoredValue;
use crate::variable::Variable;

/// Default name of the variables table.
pub const DEFAULT_TABLE: &str = "env";

/// Resolves configuration variables from a row store.
///
/// # Example
///
/// ```
/// use environ::environment::{EnvironmentRequest, RuntimeEnvironment};
/// use environ::store::{Column, MemoryStore};
/// use environ::Environ;
/// use serde_json::json;
///
/// let store = MemoryStore::new().with_table(
///     "env",
///     vec![
///         Column::string("key"),
///         Column::simple_object("value"),
///         Column::bool("Debug"),
///         Column::bool("Published"),
///     ],
/// );
/// let mut environ = Environ::new(store);
///
/// environ.set("API_URL", "api.example.com", EnvironmentRequest::Default, None).unwrap();
/// environ.set("API_URL", "localhost", "Debug", None).unwrap();
///
/// environ.set_environment(RuntimeEnvironment::new("Debug for alice@example.com"));
/// assert_eq!(environ.get("API_URL").unwrap(), json!("localhost"));
///
/// environ.set_environment(RuntimeEnvironment::new("Published"));
/// assert_eq!(environ.get("API_URL").unwrap(), json!("api.example.com"));
/// ```
pub struct Environ {
    store: Box<dyn RowStore>,
    table: String,
    vault: Box<dyn SecretVault>,
    environment: Option<Box<dyn EnvironmentProvider>>,
    registry: Arc<VariableRegistry>,
    schema: OnceCell<TableSchema>,
}

impl Environ {
    /// Create a resolver over the `env` table of `store`.
    ///
    /// Secrets are read from the process environment until a vault is set
    /// with [`with_vault`](Self::with_vault).
    pub fn new(store: impl RowStore + 'static) -> Self {
        Self {
            store: Box::new(store),
            table: DEFAULT_TABLE.to_string(),
            vault: Box::new(EnvVault::default()),
            environment: None,
            registry: Arc::new(VariableRegistry::new()),
            schema: OnceCell::new(),
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self.schema = OnceCell::new();
        self
    }

    pub fn with_vault(mut self, vault: impl SecretVault + 'static) -> Self {
        self.vault = Box::new(vault);
        self
    }

    pub fn with_environment(mut self, environment: impl EnvironmentProvider + 'static) -> Self {
        self.environment = Some(Box::new(environment));
        self
    }

    /// Share a registry with other resolvers.
    pub fn with_registry(mut self, registry: Arc<VariableRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn registry(&self) -> &Arc<VariableRegistry> {
        &self.registry
    }

    pub fn store(&self) -> &dyn RowStore {
        self.store.as_ref()
    }

    /// Mutable access to the store. Drops the cached schema.
    pub fn store_mut(&mut self) -> &mut dyn RowStore {
        self.schema = OnceCell::new();
        self.store.as_mut()
    }

    /// Swap the backing store, returning the old one.
    pub fn replace_store(&mut self, store: impl RowStore + 'static) -> Box<dyn RowStore> {
        self.schema = OnceCell::new();
        std::mem::replace(&mut self.store, Box::new(store))
    }

    pub fn set_environment(&mut self, environment: impl EnvironmentProvider + 'static) {
        self.environment = Some(Box::new(environment));
    }

    /// Forget the runtime environment, so reads use the default row.
    pub fn clear_environment(&mut self) {
        self.environment = None;
    }

    /// The runtime environment name, if one is set.
    pub fn current_environment(&self) -> Option<String> {
        self.environment
            .as_ref()
            .map(|env| env.current_environment_name())
    }

    /// The table schema, inspected on first use.
    pub fn schema(&self) -> Result<&TableSchema> {
        if let Some(schema) = self.schema.get() {
            return Ok(schema);
        }
        let schema = TableSchema::inspect(self.store.as_ref(), &self.table)?;
        Ok(self.schema.get_or_init(|| schema))
    }

    /// Inspect the table again, after it was changed outside this resolver.
    pub fn refresh_schema(&mut self) -> Result<&TableSchema> {
        self.schema = OnceCell::new();
        self.schema()
    }

    /// Get a variable, failing with `VariableNotFound` when nothing is stored.
    pub fn get(&self, name: &str) -> Result<Value> {
        self.resolve(name, None)?
            .ok_or_else(|| EnvironError::VariableNotFound {
                name: name.to_string(),
                table: self.table.clone(),
            })
    }

    /// Get a variable, returning `default` when nothing is stored.
    pub fn get_or(&self, name: &str, default: impl Into<Value>) -> Result<Value> {
        let resolved = self.resolve(name, Some(default.into()))?;
        Ok(resolved.unwrap_or_default())
    }

    /// Get a variable and deserialize it.
    pub fn get_as<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let value = self.get(name)?;
        serde_json::from_value(value).map_err(|e| EnvironError::Decode {
            name: name.to_string(),
            message: e.to_string(),
        })
    }

    /// Resolve a variable.
    ///
    /// Returns the stored value for the current environment, else the
    /// default row's value, else `default`. `Ok(None)` means nothing was
    /// found and no default was given. The variable is registered whatever
    /// the outcome.
    pub fn resolve(&self, name: &str, default: Option<Value>) -> Result<Option<Value>> {
        let mut variable = Variable::new(name, default);

        let stored = match self.lookup(name) {
            Ok(stored) => stored,
            Err(err) => {
                self.registry.register(variable);
                return Err(err);
            }
        };

        match stored {
            Some(stored) => {
                variable.set_value(stored.clone());
                self.registry.register(variable);
                self.reveal(stored).map(Some)
            }
            None => {
                debug!("No stored value for '{}', using default", name);
                self.registry.register(variable.clone());
                Ok(variable.into_default())
            }
        }
    }

    fn lookup(&self, name: &str) -> Result<Option<StoredValue>> {
        let schema = self.schema()?;
        if !schema.is_ready() {
            warn!(
                "'{}' table is not ready ({}), '{}' falls back to its default",
                self.table,
                schema.not_ready_reason().unwrap_or_default(),
                name
            );
            return Ok(None);
        }

        let declared = schema.environments();
        if let Some(environment) = self.resolved_environment(declared)? {
            let predicate = Predicate::new(name).with_true(environment.as_str());
            if let Some(row) = self.get_row(&predicate, &environment)? {
                debug!("'{}' found for environment '{}'", name, environment);
                return Ok(Some(StoredValue::decode(row.value)));
            }
        }

        let predicate = EnvironmentAssignment::default_for(declared).predicate(name, declared);
        let row = self.get_row(&predicate, "default")?;
        if row.is_some() {
            debug!("'{}' found in the default row", name);
        }
        Ok(row.map(|row| StoredValue::decode(row.value)))
    }

    fn resolved_environment(&self, declared: &BTreeSet<String>) -> Result<Option<String>> {
        if declared.is_empty() {
            return Ok(None);
        }
        match &self.environment {
            Some(environment) => {
                resolve_environment(&environment.current_environment_name(), declared)
            }
            None => Ok(None),
        }
    }

    fn get_row(&self, predicate: &Predicate, environment: &str) -> Result<Option<Row>> {
        self.store
            .get_one(&self.table, predicate)
            .map_err(|err| match err {
                EnvironError::MultipleRows { table, count } => {
                    EnvironError::OverlappingEnvironments {
                        key: predicate.key().to_string(),
                        table,
                        environment: environment.to_string(),
                        count,
                    }
                }
                other => other,
            })
    }

    fn reveal(&self, stored: StoredValue) -> Result<Value> {
        match stored {
            StoredValue::Plain(value) => Ok(value),
            StoredValue::Secret(secret) => {
                debug!("Resolving secret '{}'", secret.name());
                self.vault.resolve(secret.name()).map(Value::String)
            }
        }
    }

    /// Store a value for the requested environments.
    ///
    /// Writes exactly one row: the row whose environment columns equal the
    /// normalized request, created if missing. Fails before writing when the
    /// value is a plain object shaped like a secret reference, the table is
    /// not ready, the request names environments the table does not declare,
    /// or `info` is given but the table has no `info` column.
    pub fn set(
        &mut self,
        name: &str,
        value: impl Into<StoredValue>,
        environments: impl Into<EnvironmentRequest>,
        info: Option<&str>,
    ) -> Result<()> {
        let value = value.into();
        if value.is_reserved() {
            return Err(EnvironError::ReservedValue {
                name: name.to_string(),
            });
        }
        let request = environments.into();
        let schema = self.schema()?.clone();

        if let Some(reason) = schema.not_ready_reason() {
            return Err(EnvironError::NotReady {
                table: self.table.clone(),
                reason,
            });
        }

        let declared = schema.environments();
        if request.is_scoped() && declared.is_empty() {
            return Err(EnvironError::EnvironmentsNotSupported {
                table: self.table.clone(),
                requested: request.requested(),
            });
        }
        let assignment = request.normalize(declared)?;

        if info.is_some() && !schema.has_info() {
            return Err(EnvironError::UnknownColumn {
                table: self.table.clone(),
                column: INFO_COLUMN.to_string(),
            });
        }

        let mut fields = RowFields::new();
        fields.insert(VALUE_COLUMN.to_string(), value.encode());
        if schema.has_info() {
            fields.insert(
                INFO_COLUMN.to_string(),
                info.map(|i| Value::String(i.to_string()))
                    .unwrap_or(Value::Null),
            );
        }

        let predicate = assignment.predicate(name, declared);
        let row = self.store.get_or_create(&self.table, &predicate)?;
        self.store.update(&self.table, row.id, &fields)?;

        let scope = if assignment.is_default() {
            "default".to_string()
        } else {
            assignment.scoped().join(", ")
        };
        info!("Set '{}' in '{}' for {}", name, self.table, scope);

        self.registry.register(Variable::stored(name, value));
        Ok(())
    }

    /// Table, runtime environment and registry status.
    pub fn status(&self) -> Result<StatusReport> {
        let schema = self.schema()?.clone();
        let (runtime, tags) = match &self.environment {
            Some(environment) => (
                Some(environment.current_environment_name()),
                environment.tags(),
            ),
            None => (None, BTreeSet::new()),
        };

        let matched = match &runtime {
            None => EnvironmentMatch::Unset,
            Some(name) => match resolve_environment(name, schema.environments()) {
                Ok(Some(declared)) => EnvironmentMatch::Declared(declared),
                Ok(None) => EnvironmentMatch::DefaultRow,
                Err(EnvironError::AmbiguousEnvironment { candidates, .. }) => {
                    EnvironmentMatch::Ambiguous(candidates)
                }
                Err(err) => return Err(err),
            },
        };

        Ok(StatusReport {
            schema,
            runtime,
            matched,
            tags,
            summary: self.registry.to_string(),
            detailed: self.registry.detailed(),
        })
    }
}

impl fmt::Debug for Environ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environ")
            .field("table", &self.table)
            .field("environment", &self.current_environment())
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

/// How the runtime environment maps onto the declared environments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvironmentMatch {
    /// No runtime environment is set.
    Unset,
    /// Reads use this declared environment.
    Declared(String),
    /// Nothing matches, reads use the default row.
    DefaultRow,
    /// Several declared environments match.
    Ambiguous(Vec<String>),
}

impl fmt::Display for EnvironmentMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unset => write!(f, "default row"),
            Self::Declared(name) => write!(f, "{}", name),
            Self::DefaultRow => write!(f, "default row"),
            Self::Ambiguous(candidates) => write!(f, "ambiguous ({})", candidates.join(", ")),
        }
    }
}

/// Snapshot of [`Environ::status`].
#[derive(Debug, Clone, PartialEq)]
pub struct StatusReport {
    pub schema: TableSchema,
    pub runtime: Option<String>,
    pub matched: EnvironmentMatch,
    pub tags: BTreeSet<String>,
    pub summary: String,
    pub detailed: String,
}

impl StatusReport {
    /// Environment lines shared by both views.
    fn environment_lines(&self) -> String {
        let mut lines = match &self.runtime {
            Some(runtime) => format!("Runtime environment: {} -> {}", runtime, self.matched),
            None => "Runtime environment: not set".to_string(),
        };
        if !self.tags.is_empty() {
            let tags: Vec<&str> = self.tags.iter().map(String::as_str).collect();
            lines.push_str(&format!("\nTags: {}", tags.join(", ")));
        }
        lines
    }

    /// The report with per-variable details.
    pub fn detailed(&self) -> String {
        format!(
            "{}\n{}\n{}",
            self.schema,
            self.environment_lines(),
            self.detailed
        )
    }
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\n{}\n{}",
            self.schema,
            self.environment_lines(),
            self.summary
        )
    }
}
