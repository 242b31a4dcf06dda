//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results. Commands are
//! routed by [`CommandDispatcher`].

pub mod completions;
pub mod dispatcher;
pub mod get;
pub mod init;
pub mod matrix;
pub mod set;
pub mod status;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
