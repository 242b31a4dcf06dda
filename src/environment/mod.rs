//! Runtime environments and environment requests.
//!
//! - [`runtime`] - The host's current environment name and tags
//! - [`resolver`] - Matching a runtime name onto a declared environment
//! - [`request`] - Normalizing which environments a write applies to

pub mod request;
pub mod resolver;
pub mod runtime;

pub use request::{EnvironmentAssignment, EnvironmentRequest};
pub use resolver::resolve_environment;
pub use runtime::{EnvironmentProvider, RuntimeEnvironment};
