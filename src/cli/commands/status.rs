//! Status command implementation.
//!
//! The `environ status` command resolves the named variables, then reports
//! the table status, the runtime environment and the variable registry.

use crate::cli::args::StatusArgs;
use crate::cli::context::ProjectContext;
use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The status command implementation.
pub struct StatusCommand {
    context: ProjectContext,
    args: StatusArgs,
}

impl StatusCommand {
    /// Create a new status command.
    pub fn new(context: ProjectContext, args: StatusArgs) -> Self {
        Self { context, args }
    }
}

impl Command for StatusCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let environ = self.context.environ()?;
        ui.show_header(&format!("environ status: {}", self.context.store_path().display()));

        let mut failed = false;
        for name in &self.args.names {
            if let Err(e) = environ.resolve(name, None) {
                ui.warning(&format!("{}: {}", name, e));
                failed = true;
            }
        }

        let report = environ.status()?;
        if self.args.detailed {
            ui.emit(&report.detailed());
        } else {
            ui.emit(&report.to_string());
        }

        if failed {
            Ok(CommandResult::failure(1))
        } else {
            Ok(CommandResult::success())
        }
    }
}
