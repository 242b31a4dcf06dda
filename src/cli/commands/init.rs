//! Init command implementation.
//!
//! The `environ init` command creates the variables table, or adds missing
//! columns to an existing one.

use crate::cli::args::InitArgs;
use crate::cli::context::ProjectContext;
use crate::error::Result;
use crate::schema::{TableSchema, INFO_COLUMN, KEY_COLUMN, VALUE_COLUMN};
use crate::store::{Column, RowStore};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The init command implementation.
pub struct InitCommand {
    context: ProjectContext,
    args: InitArgs,
}

impl InitCommand {
    /// Create a new init command.
    pub fn new(context: ProjectContext, args: InitArgs) -> Self {
        Self { context, args }
    }

    /// The columns the table should have.
    fn columns(&self) -> Vec<Column> {
        let mut columns = vec![Column::string(KEY_COLUMN), Column::simple_object(VALUE_COLUMN)];
        if !self.args.no_info {
            columns.push(Column::string(INFO_COLUMN));
        }
        columns.extend(self.args.environments.iter().map(Column::bool));
        columns
    }

    fn check_environment_names(&self) -> Result<()> {
        for name in &self.args.environments {
            if [KEY_COLUMN, VALUE_COLUMN, INFO_COLUMN].contains(&name.as_str()) {
                return Err(anyhow::anyhow!(
                    "'{}' is a reserved column and cannot name an environment",
                    name
                )
                .into());
            }
            if name.trim().is_empty() {
                return Err(anyhow::anyhow!("environment names must not be empty").into());
            }
        }
        Ok(())
    }
}

impl Command for InitCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        self.check_environment_names()?;

        let table = self.context.table();
        let mut store = self.context.open_store()?;
        ui.show_header(&format!("environ init: '{}'", table));

        if store.exists(table) && !self.args.force {
            let existing = store.columns(table)?;
            let added: Vec<Column> = self
                .columns()
                .into_iter()
                .filter(|c| !existing.iter().any(|e| e.name == c.name))
                .collect();
            for column in &added {
                store.add_column(table, column.clone())?;
            }
            if added.is_empty() {
                ui.message(&format!("'{}' table is up to date", table));
            } else {
                let names: Vec<&str> = added.iter().map(|c| c.name.as_str()).collect();
                ui.success(&format!("Added columns to '{}': {}", table, names.join(", ")));
            }
        } else {
            store.create_table(table, self.columns())?;
            ui.success(&format!(
                "Created '{}' table in {}",
                table,
                store.path().display()
            ));
        }

        let schema = TableSchema::inspect(&store, table)?;
        ui.message(&schema.to_string());
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::context::Overrides;
    use crate::store::FileStore;
    use crate::ui::MockUI;
    use tempfile::TempDir;

    fn init(temp: &TempDir, args: InitArgs) -> (Result<CommandResult>, MockUI) {
        let context = ProjectContext::load(temp.path(), &Overrides::default()).unwrap();
        let mut ui = MockUI::new();
        let result = InitCommand::new(context, args).execute(&mut ui);
        (result, ui)
    }

    fn environments(names: &[&str]) -> InitArgs {
        InitArgs {
            environments: names.iter().map(|n| n.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn creates_table_with_environments() {
        let temp = TempDir::new().unwrap();
        let (result, ui) = init(&temp, environments(&["Debug", "Published"]));
        assert!(result.unwrap().success);
        assert!(ui.has_success("Created 'env' table"));
        assert!(ui.has_message("ENV Table Status: Ready"));
        assert!(ui.has_message("environments: Debug, Published"));

        let store = FileStore::open(temp.path().join(".environ/store.yml")).unwrap();
        let schema = TableSchema::inspect(&store, "env").unwrap();
        assert!(schema.has_info());
        assert_eq!(schema.environments().len(), 2);
    }

    #[test]
    fn no_info_leaves_out_info_column() {
        let temp = TempDir::new().unwrap();
        let args = InitArgs {
            no_info: true,
            ..Default::default()
        };
        let (result, ui) = init(&temp, args);
        assert!(result.is_ok());
        assert!(ui.has_message("key, value columns found"));
    }

    #[test]
    fn second_run_adds_missing_columns() {
        let temp = TempDir::new().unwrap();
        init(&temp, environments(&["Debug"])).0.unwrap();
        let (result, ui) = init(&temp, environments(&["Debug", "Staging"]));
        assert!(result.is_ok());
        assert!(ui.has_success("Added columns to 'env': Staging"));

        let (_, ui) = init(&temp, environments(&["Debug"]));
        assert!(ui.has_message("up to date"));
    }

    #[test]
    fn reserved_environment_name_is_rejected() {
        let temp = TempDir::new().unwrap();
        let (result, _) = init(&temp, environments(&["info"]));
        assert!(result.is_err());
        assert!(!temp.path().join(".environ/store.yml").exists());
    }
}
