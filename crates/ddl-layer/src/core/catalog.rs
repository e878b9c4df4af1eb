//! Driver catalog for explicit dependency injection.
//!
//! The [`DriverCatalog`] maps a [`BackendKind`] to its dialect and builds the
//! matching [`DdlLayer`] for a connection identity. It is constructed by the
//! caller and passed around explicitly; there is no global registry.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::Span;

use crate::drivers::{DialectImpl, MssqlDdlLayer, MysqlDdlLayer, PostgresDdlLayer, SqliteDdlLayer};
use crate::error::{DdlError, Result};

use super::connection::{BackendKind, ConnectionIdentity};
use super::traits::{DdlLayer, Dialect, QueryExecutor};

/// Registry of dialects, and factory for DDL layers.
///
/// # Example
///
/// ```rust,ignore
/// let catalog = DriverCatalog::with_builtins();
/// let layer = catalog.create_layer(&ConnectionIdentity::sqlite("app.db"))?;
/// if layer.storage_unit_missing().await? {
///     layer.create_storage_unit().await?;
/// }
/// ```
#[derive(Default)]
pub struct DriverCatalog {
    dialects: HashMap<BackendKind, Arc<dyn Dialect>>,
}

impl DriverCatalog {
    /// Create a new empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog with every built-in dialect registered.
    pub fn with_builtins() -> Self {
        let mut catalog = Self::new();
        for kind in BackendKind::ALL {
            catalog.register_dialect(kind, DialectImpl::from_kind(kind));
        }
        catalog
    }

    /// Register (or replace) the dialect for a backend.
    pub fn register_dialect(&mut self, kind: BackendKind, dialect: impl Dialect + 'static) {
        self.dialects.insert(kind, Arc::new(dialect));
    }

    /// Get the dialect for a backend.
    pub fn get_dialect(&self, kind: BackendKind) -> Option<Arc<dyn Dialect>> {
        self.dialects.get(&kind).cloned()
    }

    /// Get the dialect for a backend, returning an error if not registered.
    pub fn require_dialect(&self, kind: BackendKind) -> Result<Arc<dyn Dialect>> {
        self.get_dialect(kind)
            .ok_or_else(|| DdlError::Config(format!("No dialect registered for {}", kind)))
    }

    /// Check if a dialect is registered.
    pub fn has_dialect(&self, kind: BackendKind) -> bool {
        self.dialects.contains_key(&kind)
    }

    /// Registered backend names, sorted.
    pub fn dialect_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.dialects.keys().map(BackendKind::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Build the DDL layer for a connection identity with its native
    /// executor and default logging context.
    pub fn create_layer(&self, identity: &ConnectionIdentity) -> Result<Arc<dyn DdlLayer>> {
        self.create_layer_with(identity, None, None)
    }

    /// Build the DDL layer for a connection identity.
    ///
    /// The layer composes statements and probes with the dialect registered
    /// for the identity's backend. `executor` replaces the backend's native query primitive and `span`
    /// replaces the default logging context.
    ///
    /// # Errors
    ///
    /// `DdlError::Config` when the backend is not registered in this catalog
    /// or the identity's location does not fit the backend.
    pub fn create_layer_with(
        &self,
        identity: &ConnectionIdentity,
        executor: Option<Arc<dyn QueryExecutor>>,
        span: Option<Span>,
    ) -> Result<Arc<dyn DdlLayer>> {
        let dialect = self.get_dialect(identity.kind).ok_or_else(|| {
            DdlError::Config(format!(
                "Backend '{}' is not registered. Registered: {}",
                identity.kind,
                self.dialect_names().join(", ")
            ))
        })?;

        let layer: Arc<dyn DdlLayer> = match identity.kind {
            BackendKind::Sqlite => {
                let path = identity.file_path()?;
                let layer = match executor {
                    Some(executor) => SqliteDdlLayer::with_executor(path.clone(), executor),
                    None => SqliteDdlLayer::new(identity)?,
                }
                .with_dialect(dialect);
                Arc::new(match span {
                    Some(span) => layer.with_span(span),
                    None => layer,
                })
            }
            BackendKind::Postgres => {
                let layer = match executor {
                    Some(executor) => PostgresDdlLayer::with_executor(identity, executor)?,
                    None => PostgresDdlLayer::new(identity)?,
                }
                .with_dialect(dialect);
                Arc::new(match span {
                    Some(span) => layer.with_span(span),
                    None => layer,
                })
            }
            BackendKind::Mysql => {
                let layer = match executor {
                    Some(executor) => MysqlDdlLayer::with_executor(identity, executor)?,
                    None => MysqlDdlLayer::new(identity)?,
                }
                .with_dialect(dialect);
                Arc::new(match span {
                    Some(span) => layer.with_span(span),
                    None => layer,
                })
            }
            BackendKind::Mssql => {
                let layer = match executor {
                    Some(executor) => MssqlDdlLayer::with_executor(identity, executor)?,
                    None => MssqlDdlLayer::new(identity)?,
                }
                .with_dialect(dialect);
                Arc::new(match span {
                    Some(span) => layer.with_span(span),
                    None => layer,
                })
            }
        };

        Ok(layer)
    }

    /// Get the canonical database type string.
    ///
    /// Normalizes various aliases to the canonical form:
    /// - "sqlite", "sqlite3" → "sqlite"
    /// - "postgres", "postgresql", "pg" → "postgres"
    /// - "mysql", "mariadb" → "mysql"
    /// - "mssql", "sqlserver", "sql_server" → "mssql"
    pub fn normalize_db_type(db_type: &str) -> Result<&'static str> {
        Ok(db_type.parse::<BackendKind>()?.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::connection::ServerLocation;
    use crate::core::schema::{Column, LogicalType, Table};
    use crate::core::testing::RecordingExecutor;
    use crate::drivers::SqliteDialect;

    fn mysql_identity() -> ConnectionIdentity {
        ConnectionIdentity::server(
            BackendKind::Mysql,
            ServerLocation {
                host: "localhost".into(),
                port: 3306,
                database: "shop".into(),
                user: "root".into(),
                password: "root".into(),
                schema: None,
                ssl_mode: "disable".into(),
                trust_server_cert: false,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_catalog_new_is_empty() {
        let catalog = DriverCatalog::new();
        assert!(catalog.dialect_names().is_empty());
        assert!(catalog.get_dialect(BackendKind::Sqlite).is_none());
        assert!(catalog.require_dialect(BackendKind::Sqlite).is_err());
    }

    #[test]
    fn test_catalog_with_builtins() {
        let catalog = DriverCatalog::with_builtins();
        assert_eq!(
            catalog.dialect_names(),
            vec!["mssql", "mysql", "postgres", "sqlite"]
        );
        let dialect = catalog.require_dialect(BackendKind::Mysql).unwrap();
        assert_eq!(dialect.name(), "mysql");
    }

    #[test]
    fn test_register_dialect() {
        let mut catalog = DriverCatalog::new();
        catalog.register_dialect(BackendKind::Sqlite, SqliteDialect::new());
        assert!(catalog.has_dialect(BackendKind::Sqlite));
        assert!(!catalog.has_dialect(BackendKind::Postgres));
    }

    #[test]
    fn test_create_layer_requires_registration() {
        let catalog = DriverCatalog::new();
        let err = match catalog.create_layer(&ConnectionIdentity::sqlite("x.db")) {
            Err(e) => e,
            Ok(_) => panic!("unregistered backend should fail"),
        };
        assert!(err.to_string().contains("not registered"));
    }

    #[test]
    fn test_create_layer_selects_backend() {
        let catalog = DriverCatalog::with_builtins();
        let layer = catalog
            .create_layer(&ConnectionIdentity::sqlite("x.db"))
            .unwrap();
        assert_eq!(layer.dialect().name(), "sqlite");

        let layer = catalog.create_layer(&mysql_identity()).unwrap();
        assert_eq!(layer.dialect().name(), "mysql");
        assert_eq!(layer.qualified_name("Items").unwrap(), "`shop`.`Items`");
    }

    #[tokio::test]
    async fn test_create_layer_with_injected_executor() {
        let catalog = DriverCatalog::with_builtins();
        let recorder = Arc::new(RecordingExecutor::new("mysql", 0));
        let layer = catalog
            .create_layer_with(&mysql_identity(), Some(recorder.clone()), Some(Span::none()))
            .unwrap();

        let table = Table::new("Items").column(Column::new("Id", LogicalType::Int32));
        assert!(layer.container_missing(&table).await.unwrap());
        assert_eq!(recorder.calls().len(), 1);
        assert_eq!(layer.executor().db_type(), "mysql");
    }

    /// SQLite syntax with a different name and `:n` placeholders.
    struct NamedParamSqlite;

    impl Dialect for NamedParamSqlite {
        fn name(&self) -> &str {
            "sqlite-named"
        }

        fn quote_ident(&self, name: &str) -> Result<String> {
            SqliteDialect::new().quote_ident(name)
        }

        fn param_placeholder(&self, index: usize) -> String {
            format!(":{}", index)
        }

        fn type_token(&self, logical_type: &LogicalType) -> Result<String> {
            SqliteDialect::new().type_token(logical_type)
        }

        fn auto_type(&self, base: &LogicalType) -> Result<String> {
            SqliteDialect::new().auto_type(base)
        }

        fn auto_type_includes_primary_key(&self) -> bool {
            true
        }

        fn supports_sequences(&self) -> bool {
            false
        }
    }

    #[tokio::test]
    async fn test_registered_dialect_drives_the_layer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("named.db");
        tokio::fs::write(&path, b"").await.unwrap();

        let mut catalog = DriverCatalog::with_builtins();
        catalog.register_dialect(BackendKind::Sqlite, NamedParamSqlite);
        let recorder = Arc::new(RecordingExecutor::new("sqlite", 0));
        let layer = catalog
            .create_layer_with(&ConnectionIdentity::sqlite(&path), Some(recorder.clone()), None)
            .unwrap();

        assert_eq!(layer.dialect().name(), "sqlite-named");
        let table = Table::new("Items").column(Column::new("Id", LogicalType::Int32));
        assert!(layer.container_missing(&table).await.unwrap());
        assert_eq!(
            recorder.last().sql,
            "SELECT COUNT(*) FROM sqlite_master WHERE type = :1 AND name = :2"
        );
    }

    #[test]
    fn test_normalize_db_type() {
        assert_eq!(DriverCatalog::normalize_db_type("pg").unwrap(), "postgres");
        assert_eq!(DriverCatalog::normalize_db_type("SQLite3").unwrap(), "sqlite");
        assert!(DriverCatalog::normalize_db_type("oracle").is_err());
    }
}
