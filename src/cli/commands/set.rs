//! Set command implementation.
//!
//! The `environ set` command stores a value for the default row or for
//! specific environments.

use crate::cli::args::SetArgs;
use crate::cli::context::{parse_value, ProjectContext};
use crate::environment::EnvironmentRequest;
use crate::error::{EnvironError, Result};
use crate::secrets::SecretRef;
use crate::ui::UserInterface;
use crate::value::StoredValue;

use super::dispatcher::{Command, CommandResult};

/// The set command implementation.
pub struct SetCommand {
    context: ProjectContext,
    args: SetArgs,
}

impl SetCommand {
    /// Create a new set command.
    pub fn new(context: ProjectContext, args: SetArgs) -> Self {
        Self { context, args }
    }

    fn request(&self) -> Result<EnvironmentRequest> {
        if let Some(json) = &self.args.environments {
            let value = serde_json::from_str(json).map_err(|e| {
                EnvironError::InvalidEnvironmentRequest {
                    message: format!("--environments is not valid JSON: {}", e),
                }
            })?;
            return EnvironmentRequest::from_json(value);
        }
        Ok(match self.args.env.as_slice() {
            [] => EnvironmentRequest::Default,
            [one] => EnvironmentRequest::named(one.as_str()),
            many => EnvironmentRequest::many(many.iter().cloned()),
        })
    }

    fn value(&self) -> StoredValue {
        if self.args.secret {
            SecretRef::new(self.args.value.as_str()).into()
        } else {
            parse_value(&self.args.value).into()
        }
    }
}

impl Command for SetCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let request = self.request()?;
        let mut environ = self.context.environ()?;

        let scope = if request.is_scoped() {
            request.requested().join(", ")
        } else {
            "the default row".to_string()
        };
        let value = self.value();
        let shown = value.to_string();

        environ.set(&self.args.name, value, request, self.args.info.as_deref())?;
        ui.success(&format!("Set '{}' = {} for {}", self.args.name, shown, scope));
        Ok(CommandResult::success())
    }
}
