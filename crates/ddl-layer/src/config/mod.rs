//! Configuration loading and validation.

mod types;
mod validation;

pub use types::*;

use crate::error::Result;
use std::path::Path;

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::connection::{BackendKind, Location};
    use crate::core::schema::LogicalType;

    const SQLITE_YAML: &str = r#"
connection:
  type: sqlite
  path: /tmp/inventory.db
tables:
  - name: Items
    columns:
      - name: Id
        type: int64
        autonumber: true
      - name: Payload
        type: bytes
"#;

    const POSTGRES_YAML: &str = r#"
connection:
  type: postgresql
  host: db.internal
  database: app
  user: svc
  password: hunter2
  ssl_mode: verify-full
"#;

    #[test]
    fn test_from_yaml_sqlite() {
        let config = Config::from_yaml(SQLITE_YAML).unwrap();
        let identity = config.connection.identity().unwrap();
        assert_eq!(identity.kind, BackendKind::Sqlite);
        assert_eq!(
            identity.location,
            Location::File("/tmp/inventory.db".into())
        );

        let items = config.table("items").unwrap();
        assert_eq!(items.columns.len(), 2);
        assert!(items.columns[0].is_autonumber);
        assert!(items.columns[0].is_primary_key);
        assert!(!items.columns[0].is_nullable);
        assert_eq!(items.columns[1].logical_type, LogicalType::Bytes);
    }

    #[test]
    fn test_server_defaults() {
        let config = Config::from_yaml(POSTGRES_YAML).unwrap();
        assert!(config.tables.is_empty());

        let identity = config.connection.identity().unwrap();
        let location = identity.server_location().unwrap();
        assert_eq!(identity.kind, BackendKind::Postgres);
        assert_eq!(location.port, 5432);
        assert_eq!(location.schema.as_deref(), Some("public"));
        assert_eq!(location.ssl_mode, "verify-full");
    }

    #[test]
    fn test_mysql_has_no_default_schema() {
        let yaml = POSTGRES_YAML.replace("postgresql", "mysql");
        let config = Config::from_yaml(&yaml).unwrap();
        let identity = config.connection.identity().unwrap();
        let location = identity.server_location().unwrap();
        assert_eq!(location.port, 3306);
        assert_eq!(location.schema, None);
    }

    #[test]
    fn test_password_never_leaves() {
        let config = Config::from_yaml(POSTGRES_YAML).unwrap();
        assert_eq!(config.connection.password, "hunter2");

        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(!yaml.contains("hunter2"));
        let debug = format!("{:?}", config);
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        assert!(Config::from_yaml("connection: [").is_err());
        assert!(Config::from_yaml("tables: []").is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load("/nonexistent/ddl.yaml").unwrap_err();
        assert_eq!(err.exit_code(), 5);
    }
}
