//! Database driver implementations.
//!
//! Each driver module provides:
//! - a `Dialect`: pure SQL syntax strategy for the engine
//! - a `QueryExecutor`: the query primitive over the engine's client crate
//! - a `DdlLayer`: storage unit and container operations
//!
//! Backends:
//!
//! - [`sqlite`]: SQLite database files (sqlx)
//! - [`postgres`]: PostgreSQL (tokio-postgres)
//! - [`mysql`]: MySQL/MariaDB (sqlx)
//! - [`mssql`]: Microsoft SQL Server (Tiberius)
//! - [`common`]: Shared utilities (TLS)
//!
//! # Adding New Databases
//!
//! 1. Create a new module under `drivers/`
//! 2. Implement `Dialect`, `QueryExecutor` and `DdlLayer`
//! 3. Add a variant to [`BackendKind`] and to `DialectImpl`
//! 4. Handle the variant in `DriverCatalog::create_layer_with()`

pub mod common;
pub mod mssql;
pub mod mysql;
pub mod postgres;
pub mod sqlite;

pub use common::{SslMode, TlsBuilder};

pub use mssql::{MssqlDdlLayer, MssqlDialect, MssqlExecutor};
pub use mysql::{MysqlDdlLayer, MysqlDialect, MysqlExecutor};
pub use postgres::{PostgresDdlLayer, PostgresDialect, PostgresExecutor};
pub use sqlite::{SqliteDdlLayer, SqliteDialect, SqliteExecutor};

use crate::core::connection::BackendKind;
use crate::core::schema::LogicalType;
use crate::core::traits::Dialect;
use crate::error::Result;

/// Enum-based static dispatch for dialects.
///
/// The compiler generates a match instead of vtable dispatch; used where the
/// backend is known only at runtime but no connection is needed.
#[derive(Debug, Clone)]
pub enum DialectImpl {
    Sqlite(SqliteDialect),
    Postgres(PostgresDialect),
    Mysql(MysqlDialect),
    Mssql(MssqlDialect),
}

impl Dialect for DialectImpl {
    fn name(&self) -> &str {
        match self {
            DialectImpl::Sqlite(d) => d.name(),
            DialectImpl::Postgres(d) => d.name(),
            DialectImpl::Mysql(d) => d.name(),
            DialectImpl::Mssql(d) => d.name(),
        }
    }

    fn quote_ident(&self, name: &str) -> Result<String> {
        match self {
            DialectImpl::Sqlite(d) => d.quote_ident(name),
            DialectImpl::Postgres(d) => d.quote_ident(name),
            DialectImpl::Mysql(d) => d.quote_ident(name),
            DialectImpl::Mssql(d) => d.quote_ident(name),
        }
    }

    fn max_identifier_length(&self) -> usize {
        match self {
            DialectImpl::Sqlite(d) => d.max_identifier_length(),
            DialectImpl::Postgres(d) => d.max_identifier_length(),
            DialectImpl::Mysql(d) => d.max_identifier_length(),
            DialectImpl::Mssql(d) => d.max_identifier_length(),
        }
    }

    fn param_placeholder(&self, index: usize) -> String {
        match self {
            DialectImpl::Sqlite(d) => d.param_placeholder(index),
            DialectImpl::Postgres(d) => d.param_placeholder(index),
            DialectImpl::Mysql(d) => d.param_placeholder(index),
            DialectImpl::Mssql(d) => d.param_placeholder(index),
        }
    }

    fn type_token(&self, logical_type: &LogicalType) -> Result<String> {
        match self {
            DialectImpl::Sqlite(d) => d.type_token(logical_type),
            DialectImpl::Postgres(d) => d.type_token(logical_type),
            DialectImpl::Mysql(d) => d.type_token(logical_type),
            DialectImpl::Mssql(d) => d.type_token(logical_type),
        }
    }

    fn auto_type(&self, base: &LogicalType) -> Result<String> {
        match self {
            DialectImpl::Sqlite(d) => d.auto_type(base),
            DialectImpl::Postgres(d) => d.auto_type(base),
            DialectImpl::Mysql(d) => d.auto_type(base),
            DialectImpl::Mssql(d) => d.auto_type(base),
        }
    }

    fn auto_type_includes_primary_key(&self) -> bool {
        match self {
            DialectImpl::Sqlite(d) => d.auto_type_includes_primary_key(),
            DialectImpl::Postgres(d) => d.auto_type_includes_primary_key(),
            DialectImpl::Mysql(d) => d.auto_type_includes_primary_key(),
            DialectImpl::Mssql(d) => d.auto_type_includes_primary_key(),
        }
    }

    fn supports_sequences(&self) -> bool {
        match self {
            DialectImpl::Sqlite(d) => d.supports_sequences(),
            DialectImpl::Postgres(d) => d.supports_sequences(),
            DialectImpl::Mysql(d) => d.supports_sequences(),
            DialectImpl::Mssql(d) => d.supports_sequences(),
        }
    }

    fn table_options(&self) -> Option<&str> {
        match self {
            DialectImpl::Sqlite(d) => d.table_options(),
            DialectImpl::Postgres(d) => d.table_options(),
            DialectImpl::Mysql(d) => d.table_options(),
            DialectImpl::Mssql(d) => d.table_options(),
        }
    }
}

impl DialectImpl {
    /// Dialect for a backend kind.
    pub fn from_kind(kind: BackendKind) -> Self {
        match kind {
            BackendKind::Sqlite => DialectImpl::Sqlite(SqliteDialect::new()),
            BackendKind::Postgres => DialectImpl::Postgres(PostgresDialect::new()),
            BackendKind::Mysql => DialectImpl::Mysql(MysqlDialect::new()),
            BackendKind::Mssql => DialectImpl::Mssql(MssqlDialect::new()),
        }
    }

    /// Create a dialect implementation from a database type string.
    ///
    /// # Errors
    ///
    /// Returns an error if the database type is not recognized.
    pub fn from_db_type(db_type: &str) -> Result<Self> {
        Ok(Self::from_kind(db_type.parse()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::{Column, Table};

    #[test]
    fn test_dialect_impl_from_db_type() {
        assert_eq!(DialectImpl::from_db_type("sqlite").unwrap().name(), "sqlite");
        assert_eq!(DialectImpl::from_db_type("postgresql").unwrap().name(), "postgres");
        assert_eq!(DialectImpl::from_db_type("mariadb").unwrap().name(), "mysql");
        assert_eq!(DialectImpl::from_db_type("sqlserver").unwrap().name(), "mssql");
        assert!(DialectImpl::from_db_type("unknown").is_err());
    }

    #[test]
    fn test_dialect_impl_dispatch() {
        let dialect = DialectImpl::from_kind(BackendKind::Mssql);
        assert_eq!(dialect.quote_ident("table").unwrap(), "[table]");
        assert_eq!(dialect.param_placeholder(1), "@P1");

        let dialect = DialectImpl::from_kind(BackendKind::Postgres);
        assert_eq!(dialect.quote_ident("table").unwrap(), "\"table\"");
        assert_eq!(dialect.param_placeholder(2), "$2");
    }

    #[test]
    fn test_dispatch_reaches_provided_methods() {
        let table = Table::new("Items")
            .column(Column::new("Id", LogicalType::Int64).autonumber())
            .column(Column::new("Payload", LogicalType::Bytes));

        let sqlite = DialectImpl::from_kind(BackendKind::Sqlite)
            .build_create_table("\"Items\"", &table)
            .unwrap();
        assert!(sqlite.contains("AUTOINCREMENT"));
        assert!(!sqlite.contains("PRIMARY KEY (\"Id\")"));

        let mysql = DialectImpl::from_kind(BackendKind::Mysql)
            .build_create_table("`Items`", &table)
            .unwrap();
        assert!(mysql.ends_with("ENGINE=InnoDB DEFAULT CHARSET=utf8mb4"));
    }

    #[test]
    fn test_identifier_limits() {
        let limits: Vec<usize> = BackendKind::ALL
            .iter()
            .map(|k| DialectImpl::from_kind(*k).max_identifier_length())
            .collect();
        assert_eq!(limits, vec![128, 63, 64, 128]);

        let pg = DialectImpl::from_kind(BackendKind::Postgres);
        assert!(pg.quote_ident(&"x".repeat(63)).is_ok());
        assert!(pg.quote_ident(&"x".repeat(64)).is_err());
    }

    #[test]
    fn test_sequence_support_matrix() {
        let supported: Vec<bool> = BackendKind::ALL
            .iter()
            .map(|k| DialectImpl::from_kind(*k).supports_sequences())
            .collect();
        assert_eq!(supported, vec![false, true, false, true]);
    }
}
