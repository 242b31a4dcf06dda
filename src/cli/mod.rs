//! Command-line interface for environ.
//!
//! # Architecture
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`context`] - Config and flag layering shared by commands
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;
pub mod context;

pub use args::{
    Cli, Commands, CompletionsArgs, GetArgs, InitArgs, MatrixArgs, SetArgs, StatusArgs,
};
pub use commands::{Command, CommandDispatcher, CommandResult};
pub use context::{Overrides, ProjectContext};
