//! SQL Server DDL layer: the storage unit is a database.
//!
//! Creating or dropping a database on SQL Server needs server-level
//! permissions and file placement decisions, so the storage unit operations
//! report `NotSupported`; the probe still works.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, info_span, Instrument, Span};

use crate::core::connection::ConnectionIdentity;
use crate::core::schema::Table;
use crate::core::traits::{DdlLayer, Dialect, QueryExecutor};
use crate::error::{DdlError, Result};

use super::{MssqlDialect, MssqlExecutor};

/// Schema used when the identity does not name one.
pub const DEFAULT_SCHEMA: &str = "dbo";

pub struct MssqlDdlLayer {
    database: String,
    schema: String,
    dialect: Arc<dyn Dialect>,
    executor: Arc<dyn QueryExecutor>,
    span: Span,
}

impl MssqlDdlLayer {
    pub fn new(identity: &ConnectionIdentity) -> Result<Self> {
        let executor = Arc::new(MssqlExecutor::new(identity.server_location()?)?);
        Self::with_executor(identity, executor)
    }

    pub fn with_executor(
        identity: &ConnectionIdentity,
        executor: Arc<dyn QueryExecutor>,
    ) -> Result<Self> {
        let location = identity.server_location()?;
        let schema = location
            .schema
            .clone()
            .unwrap_or_else(|| DEFAULT_SCHEMA.to_string());
        let span = info_span!(
            "ddl",
            backend = "mssql",
            database = %location.database,
            schema = %schema
        );
        Ok(Self {
            database: location.database.clone(),
            schema,
            dialect: Arc::new(MssqlDialect::new()),
            executor,
            span,
        })
    }

    /// Replace the syntax strategy.
    pub fn with_dialect(mut self, dialect: Arc<dyn Dialect>) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    fn table_probe(&self) -> Result<String> {
        Ok(format!(
            "SELECT COUNT(*) FROM {}.INFORMATION_SCHEMA.TABLES \
             WHERE TABLE_SCHEMA = {} AND TABLE_NAME = {} AND TABLE_TYPE = 'BASE TABLE'",
            self.dialect.quote_ident(&self.database)?,
            self.dialect.param_placeholder(1),
            self.dialect.param_placeholder(2)
        ))
    }

    fn sequence_probe(&self) -> Result<String> {
        let db = self.dialect.quote_ident(&self.database)?;
        Ok(format!(
            "SELECT COUNT(*) FROM {db}.sys.sequences s \
             JOIN {db}.sys.schemas sc ON sc.schema_id = s.schema_id \
             WHERE sc.name = {p1} AND s.name = {p2}",
            db = db,
            p1 = self.dialect.param_placeholder(1),
            p2 = self.dialect.param_placeholder(2)
        ))
    }

    fn database_probe(&self) -> String {
        format!(
            "SELECT COUNT(*) FROM sys.databases WHERE name = {}",
            self.dialect.param_placeholder(1)
        )
    }

    async fn count(&self, sql: &str, params: &[&str]) -> Result<i64> {
        self.executor
            .query_scalar_int(sql, params)
            .instrument(self.span.clone())
            .await
    }

    async fn run(&self, sql: &str) -> Result<()> {
        debug!(parent: &self.span, "{}", sql);
        self.executor
            .execute(sql)
            .instrument(self.span.clone())
            .await
    }
}

#[async_trait]
impl DdlLayer for MssqlDdlLayer {
    fn dialect(&self) -> &dyn Dialect {
        self.dialect.as_ref()
    }

    fn executor(&self) -> &dyn QueryExecutor {
        self.executor.as_ref()
    }

    fn qualified_name(&self, table: &str) -> Result<String> {
        Ok(format!(
            "{}.{}.{}",
            self.dialect.quote_ident(&self.database)?,
            self.dialect.quote_ident(&self.schema)?,
            self.dialect.quote_ident(table)?
        ))
    }

    async fn container_missing(&self, table: &Table) -> Result<bool> {
        let sql = self.table_probe()?;
        let count = self
            .count(&sql, &[self.schema.as_str(), table.name.as_str()])
            .await?;
        Ok(count == 0)
    }

    async fn sequence_exists(&self, name: &str) -> Result<bool> {
        let sql = self.sequence_probe()?;
        let count = self.count(&sql, &[self.schema.as_str(), name]).await?;
        Ok(count > 0)
    }

    async fn storage_unit_missing(&self) -> Result<bool> {
        let count = self
            .count(&self.database_probe(), &[self.database.as_str()])
            .await?;
        Ok(count == 0)
    }

    async fn create_storage_unit(&self) -> Result<()> {
        Err(DdlError::not_supported(self.dialect.name(), "create_storage_unit"))
    }

    async fn delete_storage_unit(&self) -> Result<()> {
        Err(DdlError::not_supported(self.dialect.name(), "delete_storage_unit"))
    }

    async fn create_container(&self, table: &Table) -> Result<()> {
        let sql = self.build_create_container_statement(table)?;
        self.run(&sql).await?;
        info!(parent: &self.span, "Created table {}.{}", self.schema, table.name);
        Ok(())
    }

    async fn delete_container(&self, table: &Table) -> Result<()> {
        let sql = self.build_delete_container_statement(table)?;
        self.run(&sql).await?;
        info!(parent: &self.span, "Dropped table {}.{}", self.schema, table.name);
        Ok(())
    }
}
