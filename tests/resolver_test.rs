//! Resolver integration tests against in-memory tables.

use std::sync::Arc;

use environ::secrets::{MemoryVault, SecretRef};
use environ::store::{Column, MemoryStore, RowStore};
use environ::{
    Environ, EnvironError, EnvironmentMatch, EnvironmentRequest, RuntimeEnvironment,
    VariableRegistry,
};
use serde_json::json;

fn store() -> MemoryStore {
    MemoryStore::new()
        .with_table(
            "env",
            vec![
                Column::string("key"),
                Column::simple_object("value"),
                Column::string("info"),
                Column::bool("Debug"),
                Column::bool("Published"),
            ],
        )
        .with_table(
            "basic_env",
            vec![Column::string("key"), Column::simple_object("value")],
        )
}

fn debug(user: &str) -> RuntimeEnvironment {
    RuntimeEnvironment::new(format!("Debug for {}@example.com", user)).with_tag("debug")
}

fn published() -> RuntimeEnvironment {
    RuntimeEnvironment::new("Published")
}

fn staging() -> RuntimeEnvironment {
    RuntimeEnvironment::new("Staging")
}

fn environments() -> Environ {
    Environ::new(store())
}

fn basic() -> Environ {
    Environ::new(store()).with_table("basic_env")
}

mod get {
    use super::*;

    #[test]
    fn missing_variable_errors() {
        let environ = basic();
        let err = environ.get("non_existent_variable").unwrap_err();
        assert!(matches!(err, EnvironError::VariableNotFound { .. }));
        assert_eq!(environ.registry().available(), vec!["non_existent_variable"]);
    }

    #[test]
    fn missing_variable_returns_default() {
        let environ = basic();
        let value = environ.get_or("missing_variable", "my default value").unwrap();
        assert_eq!(value, json!("my default value"));
    }

    #[test]
    fn existing_variable() {
        let mut environ = basic();
        environ.set("test_existing", 1234, EnvironmentRequest::Default, None).unwrap();
        assert_eq!(environ.get("test_existing").unwrap(), json!(1234));
        assert_eq!(
            environ.get_or("test_existing", "ignored").unwrap(),
            json!(1234)
        );
        assert_eq!(environ.registry().in_use(), vec!["test_existing"]);
    }

    #[test]
    fn typed_read() {
        let mut environ = basic();
        environ.set("PORT", 8080, EnvironmentRequest::Default, None).unwrap();
        let port: u16 = environ.get_as("PORT").unwrap();
        assert_eq!(port, 8080);

        let err = environ.get_as::<bool>("PORT").unwrap_err();
        assert!(matches!(err, EnvironError::Decode { .. }));
    }

    #[test]
    fn per_environment_values() {
        let mut environ = environments().with_environment(debug("abc"));
        let name = "c6340ab7";

        assert_eq!(
            environ.get_or(name, "default_value").unwrap(),
            json!("default_value")
        );

        environ
            .set(name, "development_value", EnvironmentRequest::flags([("Debug", true)]), None)
            .unwrap();
        environ
            .set(name, "production_value", EnvironmentRequest::flags([("Published", true)]), None)
            .unwrap();

        assert_eq!(environ.get(name).unwrap(), json!("development_value"));

        environ.set_environment(debug("bob"));
        assert_eq!(environ.get(name).unwrap(), json!("development_value"));

        environ.set_environment(published());
        assert_eq!(environ.get(name).unwrap(), json!("production_value"));
    }

    #[test]
    fn overlapping_environments_error() {
        let mut environ = environments().with_environment(debug("abc"));
        let name = "test_overlapping_environments";
        environ
            .set(name, 1, EnvironmentRequest::flags([("Debug", true), ("Published", true)]), None)
            .unwrap();
        environ.set(name, 2, "Debug", None).unwrap();

        let err = environ.get(name).unwrap_err();
        assert!(
            matches!(err, EnvironError::OverlappingEnvironments { count: 2, .. }),
            "unexpected error: {err}"
        );

        // The Published runtime sees only the first row.
        environ.set_environment(published());
        assert_eq!(environ.get(name).unwrap(), json!(1));
    }

    #[test]
    fn undeclared_runtime_reads_default_row() {
        let mut environ = environments().with_environment(published());
        let name = "test_default_environment";
        environ.set(name, "PublishedValue", "Published", None).unwrap();
        environ.set(name, "DefaultValue", EnvironmentRequest::Default, None).unwrap();

        assert_eq!(environ.get(name).unwrap(), json!("PublishedValue"));

        environ.set_environment(staging());
        assert_eq!(environ.get(name).unwrap(), json!("DefaultValue"));

        environ.clear_environment();
        assert_eq!(environ.get(name).unwrap(), json!("DefaultValue"));
    }

    #[test]
    fn declared_environment_without_row_falls_back_to_default_row() {
        let mut environ = environments().with_environment(debug("abc"));
        environ.set("API_URL", "example.com", EnvironmentRequest::Default, None).unwrap();
        assert_eq!(environ.get("API_URL").unwrap(), json!("example.com"));
    }

    #[test]
    fn default_row_ignores_scoped_rows() {
        let mut environ = environments();
        environ.set("API_URL", "localhost", "Debug", None).unwrap();
        assert_eq!(
            environ.get_or("API_URL", "fallback").unwrap(),
            json!("fallback")
        );
    }

    #[test]
    fn ambiguous_runtime_errors() {
        let store = MemoryStore::new().with_table(
            "env",
            vec![
                Column::string("key"),
                Column::simple_object("value"),
                Column::bool("A1"),
                Column::bool("AA"),
                Column::bool("B"),
            ],
        );
        let environ = Environ::new(store).with_environment(RuntimeEnvironment::new("A"));
        let err = environ.get_or("API_URL", "x").unwrap_err();
        assert!(matches!(err, EnvironError::AmbiguousEnvironment { .. }));
    }

    #[test]
    fn missing_table_soft_degrades_to_default() {
        let environ = Environ::new(MemoryStore::new());
        assert_eq!(environ.get_or("API_URL", 3).unwrap(), json!(3));
        assert!(matches!(
            environ.get("API_URL"),
            Err(EnvironError::VariableNotFound { .. })
        ));
    }
}

mod set {
    use super::*;

    #[test]
    fn set_new_variable() {
        let mut environ = environments();
        environ.set("new_variable", 42, EnvironmentRequest::Default, None).unwrap();
        assert_eq!(environ.get("new_variable").unwrap(), json!(42));
    }

    #[test]
    fn overwrites_the_same_row() {
        let mut environ = environments().with_environment(debug("abc"));
        environ.set("test_set_existing", 1234, "Debug", None).unwrap();
        environ.set("test_set_existing", 1235, "Published", None).unwrap();
        environ.set("test_set_existing", 1236, "Debug", None).unwrap();

        assert_eq!(environ.get("test_set_existing").unwrap(), json!(1236));
        environ.set_environment(published());
        assert_eq!(environ.get("test_set_existing").unwrap(), json!(1235));
    }

    #[test]
    fn request_shapes_are_equivalent() {
        let mut environ = environments().with_environment(debug("abc"));
        environ.set("A", 1, "Debug", None).unwrap();
        environ.set("A", 2, vec!["Debug"], None).unwrap();
        environ
            .set("A", 3, EnvironmentRequest::flags([("Debug", true), ("Published", false)]), None)
            .unwrap();
        assert_eq!(environ.get("A").unwrap(), json!(3));
    }

    #[test]
    fn scoped_write_without_environment_columns() {
        let mut environ = basic();
        environ.set("test_set_existing", 1, EnvironmentRequest::Default, None).unwrap();

        let err = environ.set("test_set_existing", 1234, "Debug", None).unwrap_err();
        assert!(matches!(err, EnvironError::EnvironmentsNotSupported { .. }));
        assert!(err.to_string().contains("Debug"));
        assert_eq!(environ.get("test_set_existing").unwrap(), json!(1));
    }

    #[test]
    fn unknown_environment_is_rejected() {
        let mut environ = environments();
        let err = environ.set("A", 1, "Staging", None).unwrap_err();
        assert!(matches!(err, EnvironError::UnknownEnvironment { .. }));
        assert!(environ.get_or("A", 0).is_ok());
        assert_eq!(environ.get_or("A", 0).unwrap(), json!(0));
    }

    #[test]
    fn info_needs_info_column() {
        let mut environ = basic();
        let err = environ.set("A", 1, EnvironmentRequest::Default, Some("note")).unwrap_err();
        assert!(matches!(err, EnvironError::UnknownColumn { .. }));
        assert!(environ.store().columns("basic_env").is_ok());
        assert!(matches!(
            environ.get("A"),
            Err(EnvironError::VariableNotFound { .. })
        ));
    }

    #[test]
    fn not_ready_table_rejects_writes() {
        let mut environ = Environ::new(MemoryStore::new());
        let err = environ.set("A", 1, EnvironmentRequest::Default, None).unwrap_err();
        assert!(matches!(err, EnvironError::NotReady { .. }));
    }
}

mod secrets {
    use super::*;

    fn vault() -> MemoryVault {
        MemoryVault::new()
            .with_secret("test_secret", "42")
            .with_secret("test_secret_dev", "not_42")
    }

    #[test]
    fn secrets_resolve_per_environment() {
        let mut environ = environments()
            .with_vault(vault())
            .with_environment(published());
        environ
            .set("my_secret", SecretRef::new("test_secret"), EnvironmentRequest::Default, None)
            .unwrap();
        environ
            .set("my_secret", SecretRef::new("test_secret_dev"), "Debug", None)
            .unwrap();

        assert_eq!(environ.get("my_secret").unwrap(), json!("42"));
        environ.set_environment(debug("abc"));
        assert_eq!(environ.get("my_secret").unwrap(), json!("not_42"));
    }

    #[test]
    fn details_hide_plaintext() {
        let mut environ = environments().with_vault(vault());
        environ
            .set("my_secret", SecretRef::new("test_secret"), EnvironmentRequest::Default, None)
            .unwrap();
        environ.get("my_secret").unwrap();

        let details = environ.registry().detailed();
        assert!(details.contains("my_secret=🔒 test_secret"));
        assert!(!details.contains("42"));
    }

    #[test]
    fn missing_secret_errors() {
        let mut environ = environments().with_vault(MemoryVault::new());
        environ
            .set("my_secret", SecretRef::new("absent"), EnvironmentRequest::Default, None)
            .unwrap();
        let err = environ.get("my_secret").unwrap_err();
        assert!(matches!(err, EnvironError::SecretNotFound { .. }));
    }
}

mod registry {
    use super::*;

    #[test]
    fn shared_registry_collects_across_resolvers() {
        let registry = Arc::new(VariableRegistry::new());
        let mut first = environments().with_registry(Arc::clone(&registry));
        let second = basic().with_registry(Arc::clone(&registry));

        first.set("API_URL", "example.com", EnvironmentRequest::Default, None).unwrap();
        second.get_or("TIMEOUT", 30).unwrap();

        assert_eq!(registry.in_use(), vec!["API_URL"]);
        assert_eq!(registry.available(), vec!["TIMEOUT"]);
        assert_eq!(registry.all().len(), 2);
    }

    #[test]
    fn status_reports_match_and_registry() {
        let mut environ = environments().with_environment(debug("abc"));
        environ.set("API_URL", "localhost", "Debug", None).unwrap();
        environ.get_or("fallback", "value").unwrap();

        let report = environ.status().unwrap();
        assert_eq!(report.matched, EnvironmentMatch::Declared("Debug".to_string()));
        let text = report.to_string();
        assert!(text.contains("ENV Table Status: Ready"));
        assert!(text.contains("Runtime environment: Debug for abc@example.com -> Debug"));
        assert!(text.contains("Tags: debug"));
        assert!(text.contains("in_use:\n\tAPI_URL"));
        assert!(text.contains("available:\n\tfallback"));
        assert!(report
            .detailed()
            .contains("fallback=value, default=value, in_use=false"));
    }
}
