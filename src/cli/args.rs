//! CLI argument definitions.
//!
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// environ - Per-environment configuration variables.
#[derive(Debug, Parser)]
#[command(name = "environ")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides .environ/config.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Path to the store file
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Variables table name
    #[arg(long, global = true)]
    pub table: Option<String>,

    /// Runtime environment name
    #[arg(short, long, global = true, env = "ENVIRON_ENVIRONMENT")]
    pub environment: Option<String>,

    /// Runtime environment tags (comma-separated)
    #[arg(long = "tag", global = true, env = "ENVIRON_TAGS", value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create the variables table
    Init(InitArgs),

    /// Resolve a variable
    Get(GetArgs),

    /// Store a variable
    Set(SetArgs),

    /// Show table status and resolved variables
    Status(StatusArgs),

    /// Resolve variables under several runtime environments
    Matrix(MatrixArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `init` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct InitArgs {
    /// Environments to declare (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub environments: Vec<String>,

    /// Leave out the info column
    #[arg(long)]
    pub no_info: bool,

    /// Recreate the table, discarding stored rows
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `get` command.
#[derive(Debug, Clone, clap::Args)]
pub struct GetArgs {
    /// Variable name
    pub name: String,

    /// Value returned when nothing is stored (JSON, or a plain string)
    #[arg(short, long)]
    pub default: Option<String>,

    /// Print strings without JSON quoting
    #[arg(short, long)]
    pub raw: bool,
}

/// Arguments for the `set` command.
#[derive(Debug, Clone, clap::Args)]
pub struct SetArgs {
    /// Variable name
    pub name: String,

    /// Value (JSON, or a plain string). With --secret, the secret's name.
    pub value: String,

    /// Environment the value applies to (repeatable)
    #[arg(long = "env", conflicts_with = "environments")]
    pub env: Vec<String>,

    /// Environments as JSON: a name, a list of names or a map of flags
    #[arg(long)]
    pub environments: Option<String>,

    /// Description stored in the info column
    #[arg(short, long)]
    pub info: Option<String>,

    /// Store a reference to the named secret instead of a value
    #[arg(short, long)]
    pub secret: bool,
}

/// Arguments for the `status` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct StatusArgs {
    /// Variables to resolve before reporting
    pub names: Vec<String>,

    /// Show each variable's value and default
    #[arg(short, long)]
    pub detailed: bool,
}

/// Arguments for the `matrix` command.
#[derive(Debug, Clone, clap::Args)]
pub struct MatrixArgs {
    /// Variables to resolve
    #[arg(required = true)]
    pub names: Vec<String>,

    /// Runtime environment names to try (comma-separated)
    #[arg(long, value_delimiter = ',', required = true)]
    pub environment_names: Vec<String>,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_set_with_environments() {
        let cli = Cli::parse_from([
            "environ", "set", "API_URL", "localhost", "--env", "Debug", "--env", "Staging",
            "--info", "local api",
        ]);
        match cli.command {
            Commands::Set(args) => {
                assert_eq!(args.name, "API_URL");
                assert_eq!(args.env, vec!["Debug", "Staging"]);
                assert_eq!(args.info.as_deref(), Some("local api"));
                assert!(!args.secret);
            }
            other => panic!("expected set, got {other:?}"),
        }
    }

    #[test]
    fn env_and_environments_conflict() {
        let result = Cli::try_parse_from([
            "environ", "set", "A", "1", "--env", "Debug", "--environments", "\"Debug\"",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["environ", "get", "A", "--table", "settings", "-q"]);
        assert_eq!(cli.table.as_deref(), Some("settings"));
        assert!(cli.quiet);
    }

    #[test]
    fn matrix_splits_environment_names() {
        let cli = Cli::parse_from([
            "environ",
            "matrix",
            "API_URL",
            "--environment-names",
            "Published,Debug for bob",
        ]);
        match cli.command {
            Commands::Matrix(args) => {
                assert_eq!(args.environment_names, vec!["Published", "Debug for bob"]);
            }
            other => panic!("expected matrix, got {other:?}"),
        }
    }
}
