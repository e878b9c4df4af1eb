//! Core traits for backend-agnostic schema management.
//!
//! - [`QueryExecutor`]: Runs a scalar query or a DDL statement on a backend
//! - [`Dialect`]: Pure SQL syntax strategy (quoting, type tokens, DDL text)
//! - [`DdlLayer`]: The schema-management contract a backend implements
//!
//! # Design Patterns
//!
//! - **Strategy**: `Dialect` implementations are interchangeable syntax rules
//! - **Template Method**: provided methods on `Dialect` and `DdlLayer` compose
//!   statements and orchestrate calls; backends supply only the hooks

use async_trait::async_trait;

use crate::error::Result;

use super::identifier::MAX_IDENTIFIER_LENGTH;
use super::schema::{LogicalType, Table};

/// Runs SQL against one backend connection identity.
///
/// Implementations open whatever connection they need per call; the DDL
/// layer never holds a connection across operations.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Run a query returning a single integer (typically `COUNT(*)`).
    ///
    /// `params` are bound positionally to the dialect's placeholders.
    async fn query_scalar_int(&self, sql: &str, params: &[&str]) -> Result<i64>;

    /// Execute a statement that returns no rows.
    async fn execute(&self, sql: &str) -> Result<()>;

    /// Get the database type identifier (e.g., "sqlite", "postgres").
    fn db_type(&self) -> &str;
}

/// SQL syntax strategy for a database engine.
///
/// Everything here is pure: no I/O, deterministic for a given input.
///
/// # Required hooks
///
/// - [`type_token`](Dialect::type_token) and [`auto_type`](Dialect::auto_type)
///   map logical types onto dialect tokens
/// - [`quote_ident`](Dialect::quote_ident) and
///   [`param_placeholder`](Dialect::param_placeholder) encode syntax rules
///
/// # Provided orchestration
///
/// [`build_create_table`](Dialect::build_create_table) and
/// [`build_drop_table`](Dialect::build_drop_table) compose statements from
/// those hooks and are shared by every backend.
pub trait Dialect: Send + Sync {
    /// Get the dialect identifier (e.g., "sqlite", "postgres").
    fn name(&self) -> &str;

    /// Validate and quote an identifier.
    ///
    /// - SQLite/PostgreSQL: `"identifier"`
    /// - MySQL: `` `identifier` ``
    /// - SQL Server: `[identifier]`
    fn quote_ident(&self, name: &str) -> Result<String>;

    /// Longest identifier, in bytes, the engine stores without truncation.
    fn max_identifier_length(&self) -> usize {
        MAX_IDENTIFIER_LENGTH
    }

    /// Get a parameter placeholder for the given 1-based index.
    ///
    /// - SQLite/MySQL: `?`
    /// - PostgreSQL: `$1`, `$2`, etc.
    /// - SQL Server: `@P1`, `@P2`, etc.
    fn param_placeholder(&self, index: usize) -> String;

    /// Map a logical type onto the dialect's DDL token.
    ///
    /// # Errors
    ///
    /// `DdlError::UnsupportedType` when the dialect has no equivalent.
    fn type_token(&self, logical_type: &LogicalType) -> Result<String>;

    /// DDL token for a generated (auto-increment / identity) column.
    ///
    /// Some databases only store autonumbers in one column type, in which
    /// case `base` is ignored.
    fn auto_type(&self, base: &LogicalType) -> Result<String>;

    /// Whether [`auto_type`](Dialect::auto_type) already carries the
    /// PRIMARY KEY clause.
    fn auto_type_includes_primary_key(&self) -> bool {
        false
    }

    /// Whether the engine has native sequence generators.
    fn supports_sequences(&self) -> bool;

    /// Trailing options appended after the column list of CREATE TABLE.
    fn table_options(&self) -> Option<&str> {
        None
    }

    /// Compose a CREATE TABLE statement.
    ///
    /// `qualified_name` must already be quoted (see
    /// [`DdlLayer::qualified_name`]). Columns are emitted in descriptor order;
    /// non-generated key columns are collected into a trailing PRIMARY KEY
    /// constraint.
    fn build_create_table(&self, qualified_name: &str, table: &Table) -> Result<String> {
        table.validate()?;

        let mut defs = Vec::with_capacity(table.columns.len() + 1);
        let mut key_inline = false;

        for col in &table.columns {
            let name = self.quote_ident(&col.name)?;
            if col.is_autonumber {
                defs.push(format!("{} {}", name, self.auto_type(&col.logical_type)?));
                key_inline = self.auto_type_includes_primary_key();
            } else {
                let token = self.type_token(&col.logical_type)?;
                let null_clause = if col.is_nullable && !col.is_primary_key {
                    ""
                } else {
                    " NOT NULL"
                };
                defs.push(format!("{} {}{}", name, token, null_clause));
            }
        }

        let pk_cols = table.primary_key_columns();
        if !pk_cols.is_empty() && !key_inline {
            let quoted = pk_cols
                .iter()
                .map(|c| self.quote_ident(&c.name))
                .collect::<Result<Vec<_>>>()?;
            defs.push(format!("PRIMARY KEY ({})", quoted.join(", ")));
        }

        let mut sql = format!(
            "CREATE TABLE {} (\n    {}\n)",
            qualified_name,
            defs.join(",\n    ")
        );
        if let Some(options) = self.table_options() {
            sql.push(' ');
            sql.push_str(options);
        }

        Ok(sql)
    }

    /// Compose a DROP TABLE statement that tolerates a missing table.
    fn build_drop_table(&self, qualified_name: &str) -> String {
        format!("DROP TABLE IF EXISTS {}", qualified_name)
    }
}

/// Schema-management contract implemented once per backend.
///
/// A storage unit ("store house") is the outermost container: a file for
/// SQLite, a schema for PostgreSQL, a database for MySQL and SQL Server.
/// A container ("store room") is one table inside it.
///
/// Existence probes are read-only and report absence as `Ok(true)` /
/// `Ok(false)`, never as an error. No operation opens a transaction or takes
/// a lock; callers that race check-then-create across processes must
/// coordinate themselves.
#[async_trait]
pub trait DdlLayer: Send + Sync {
    /// Pure syntax rules for this backend.
    fn dialect(&self) -> &dyn Dialect;

    /// Executor bound to this layer's connection identity.
    fn executor(&self) -> &dyn QueryExecutor;

    /// Quoted, namespace-qualified container name.
    fn qualified_name(&self, table: &str) -> Result<String> {
        self.dialect().quote_ident(table)
    }

    /// DDL token for a logical type.
    fn type_token(&self, logical_type: &LogicalType) -> Result<String> {
        self.dialect().type_token(logical_type)
    }

    /// Compose the CREATE TABLE statement for a container.
    fn build_create_container_statement(&self, table: &Table) -> Result<String> {
        let qualified = self.qualified_name(&table.name)?;
        self.dialect().build_create_table(&qualified, table)
    }

    /// Compose the DROP TABLE statement for a container.
    fn build_delete_container_statement(&self, table: &Table) -> Result<String> {
        let qualified = self.qualified_name(&table.name)?;
        Ok(self.dialect().build_drop_table(&qualified))
    }

    /// True if the container does not yet exist in the storage unit.
    async fn container_missing(&self, table: &Table) -> Result<bool>;

    /// True if a sequence with this name exists.
    ///
    /// Backends without native sequences answer without probing.
    async fn sequence_exists(&self, name: &str) -> Result<bool>;

    /// True if the storage unit referenced by the connection identity does
    /// not exist.
    async fn storage_unit_missing(&self) -> Result<bool>;

    /// Create an empty storage unit.
    ///
    /// No-op for backends without a storage unit concept;
    /// `DdlError::NotSupported` where creation is meaningful but not
    /// implemented.
    async fn create_storage_unit(&self) -> Result<()>;

    /// Delete the storage unit. No-op when it does not exist.
    async fn delete_storage_unit(&self) -> Result<()>;

    /// Create a container from its descriptor.
    async fn create_container(&self, table: &Table) -> Result<()> {
        let sql = self.build_create_container_statement(table)?;
        self.executor().execute(&sql).await
    }

    /// Drop a container. No-op when it does not exist.
    async fn delete_container(&self, table: &Table) -> Result<()> {
        let sql = self.build_delete_container_statement(table)?;
        self.executor().execute(&sql).await
    }
}
