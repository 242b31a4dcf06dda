//! Matrix command implementation.
//!
//! The `environ matrix` command resolves each variable under each runtime
//! environment name and prints every outcome, errors included.

use crate::cli::args::MatrixArgs;
use crate::cli::context::{format_value, ProjectContext};
use crate::environ::Environ;
use crate::environment::RuntimeEnvironment;
use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The matrix command implementation.
pub struct MatrixCommand {
    context: ProjectContext,
    args: MatrixArgs,
}

impl MatrixCommand {
    /// Create a new matrix command.
    pub fn new(context: ProjectContext, args: MatrixArgs) -> Self {
        Self { context, args }
    }

    /// Outcome lines for one runtime environment.
    fn lines(&self, environ: &Environ) -> Vec<String> {
        self.args
            .names
            .iter()
            .map(|name| match environ.resolve(name, None) {
                Ok(Some(value)) => format!("  get('{}') = {}", name, format_value(&value, false)),
                Ok(None) => format!("  get('{}') -> not set", name),
                Err(e) => format!("  get('{}') -> error: {}", name, e),
            })
            .collect()
    }
}

impl Command for MatrixCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut environ = self.context.environ()?;
        let tags = self.context.config().tags.clone();

        let mut blocks = Vec::new();
        for runtime in &self.args.environment_names {
            environ.set_environment(RuntimeEnvironment::new(runtime.as_str()).with_tags(tags.clone()));
            let mut block = vec![format!("environment: '{}'", runtime)];
            block.extend(self.lines(&environ));
            blocks.push(block.join("\n"));
        }

        ui.emit(&blocks.join("\n\n"));
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::context::Overrides;
    use crate::environ::DEFAULT_TABLE;
    use crate::store::{Column, MemoryStore};
    use crate::ui::MockUI;
    use serde_json::json;
    use tempfile::TempDir;

    fn project() -> TempDir {
        let temp = TempDir::new().unwrap();
        let mut memory = MemoryStore::new();
        memory.create_table(
            DEFAULT_TABLE,
            vec![
                Column::string("key"),
                Column::simple_object("value"),
                Column::bool("Debug"),
                Column::bool("Published"),
            ],
        );
        memory
            .add_row(DEFAULT_TABLE, "example", json!("default example"))
            .unwrap();
        memory
            .add_row_with_flags(DEFAULT_TABLE, "example", json!("debug example"), [("Debug", true)])
            .unwrap();
        memory
            .add_row_with_flags(DEFAULT_TABLE, "overlap", json!(1), [("Debug", true)])
            .unwrap();
        memory
            .add_row_with_flags(
                DEFAULT_TABLE,
                "overlap",
                json!(2),
                [("Debug", true), ("Published", true)],
            )
            .unwrap();
        let dir = temp.path().join(".environ");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("store.yml"), serde_yaml::to_string(&memory).unwrap()).unwrap();
        temp
    }

    #[test]
    fn resolves_each_environment() {
        let temp = project();
        let context = ProjectContext::load(temp.path(), &Overrides::default()).unwrap();
        let args = MatrixArgs {
            names: vec!["example".into(), "fallback".into(), "overlap".into()],
            environment_names: vec!["Published".into(), "Debug for bob".into(), "Staging".into()],
        };
        let mut ui = MockUI::new();
        assert!(MatrixCommand::new(context, args).execute(&mut ui).unwrap().success);

        let output = &ui.outputs()[0];
        insta::assert_snapshot!(output, @r###"
        environment: 'Published'
          get('example') = "default example"
          get('fallback') -> not set
          get('overlap') = 2

        environment: 'Debug for bob'
          get('example') = "debug example"
          get('fallback') -> not set
          get('overlap') -> error: 2 rows in 'env' match 'overlap' for environment 'Debug', environment assignments must not overlap

        environment: 'Staging'
          get('example') = "default example"
          get('fallback') -> not set
          get('overlap') -> not set
        "###);
    }
}
