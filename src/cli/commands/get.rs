//! Get command implementation.
//!
//! The `environ get` command resolves one variable and prints it as JSON.

use crate::cli::args::GetArgs;
use crate::cli::context::{format_value, parse_value, ProjectContext};
use crate::error::{EnvironError, Result};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The get command implementation.
pub struct GetCommand {
    context: ProjectContext,
    args: GetArgs,
}

impl GetCommand {
    /// Create a new get command.
    pub fn new(context: ProjectContext, args: GetArgs) -> Self {
        Self { context, args }
    }
}

impl Command for GetCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let environ = self.context.environ()?;

        let schema = environ.schema()?;
        if let Some(reason) = schema.not_ready_reason() {
            ui.warning(&format!(
                "'{}' table is not ready ({}), run 'environ init'",
                environ.table(),
                reason
            ));
        }

        let default = self.args.default.as_deref().map(parse_value);
        match environ.resolve(&self.args.name, default)? {
            Some(value) => {
                ui.emit(&format_value(&value, self.args.raw));
                Ok(CommandResult::success())
            }
            None => {
                ui.error(
                    &EnvironError::VariableNotFound {
                        name: self.args.name.clone(),
                        table: environ.table().to_string(),
                    }
                    .to_string(),
                );
                Ok(CommandResult::failure(2))
            }
        }
    }
}
