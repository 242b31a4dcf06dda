//! environ - Per-environment configuration variables backed by a table.
//!
//! Variables live in a table with a `key`, a `value`, an optional `info`
//! column and one boolean column per declared environment. A read picks the
//! row for the current runtime environment, then the default row, then the
//! caller's default.
//!
//! # Modules
//!
//! - [`environ`] - The resolver: `get`, `set` and `status`
//! - [`environment`] - Runtime environments and environment requests
//! - [`schema`] - Table readiness and declared environments
//! - [`store`] - Row storage backends
//! - [`secrets`] - Secret references and vaults
//! - [`registry`] - Variables seen by this process
//! - [`config`] - Configuration loading for the binary
//! - [`cli`] - Command-line interface and argument parsing
//! - [`ui`] - Terminal output
//! - [`error`] - Error types and result aliases
//!
//! # Example
//!
//! ```
//! use environ::store::{Column, MemoryStore};
//! use environ::Environ;
//! use serde_json::json;
//!
//! let store = MemoryStore::new().with_table(
//!     "env",
//!     vec![Column::string("key"), Column::simple_object("value"), Column::string("info")],
//! );
//! let environ = Environ::new(store);
//!
//! assert_eq!(environ.get_or("MY_VARIABLE", 1234).unwrap(), json!(1234));
//! assert_eq!(environ.registry().available(), vec!["MY_VARIABLE"]);
//! ```

pub mod cli;
pub mod config;
pub mod environ;
pub mod environment;
pub mod error;
pub mod registry;
pub mod schema;
pub mod secrets;
pub mod store;
pub mod ui;
pub mod value;
pub mod variable;

pub use environ::{Environ, EnvironmentMatch, StatusReport};
pub use environment::{EnvironmentRequest, RuntimeEnvironment};
pub use error::{EnvironError, Result};
pub use registry::VariableRegistry;
pub use value::StoredValue;
pub use variable::Variable;
