//! Library integration tests.

use environ::EnvironError;

#[test]
fn error_types_are_public() {
    let err = EnvironError::VariableNotFound {
        name: "API_URL".into(),
        table: "env".into(),
    };
    assert!(err.to_string().contains("API_URL"));
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> environ::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn cli_types_are_public() {
    use clap::Parser;
    use environ::cli::{Cli, Commands};

    let cli = Cli::parse_from(["environ", "get", "API_URL", "--raw"]);
    if let Commands::Get(args) = cli.command {
        assert_eq!(args.name, "API_URL");
        assert!(args.raw);
    } else {
        panic!("Expected Get command");
    }
}

#[test]
fn config_types_are_public() {
    use environ::config::EnvironConfig;

    let config = EnvironConfig::default();
    assert_eq!(config.table_name(), "env");
    assert!(config.runtime_environment().is_none());
}

#[test]
fn store_types_are_public() {
    use environ::store::{Column, MemoryStore, Predicate, RowStore};

    let mut store = MemoryStore::new().with_table(
        "env",
        vec![Column::string("key"), Column::simple_object("value")],
    );
    let row = store.get_or_create("env", &Predicate::new("A")).unwrap();
    assert_eq!(row.key, "A");
    assert!(store.exists("env"));
}

#[test]
fn ui_types_are_public() {
    use environ::ui::{MockUI, UserInterface};

    let mut ui = MockUI::new();
    ui.emit("hello");
    assert!(ui.has_output("hello"));
}

#[test]
fn environment_types_are_public() {
    use environ::environment::EnvironmentProvider;
    use environ::{EnvironmentRequest, RuntimeEnvironment};

    let runtime = RuntimeEnvironment::new("Published").with_tag("prod");
    assert_eq!(runtime.current_environment_name(), "Published");
    assert!(runtime.tags().contains("prod"));
    assert!(EnvironmentRequest::named("Published").is_scoped());
    assert!(!EnvironmentRequest::default().is_scoped());
}
