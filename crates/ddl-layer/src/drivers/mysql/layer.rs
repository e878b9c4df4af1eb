//! MySQL DDL layer: the storage unit is a database.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, info_span, Instrument, Span};

use crate::core::connection::ConnectionIdentity;
use crate::core::schema::Table;
use crate::core::traits::{DdlLayer, Dialect, QueryExecutor};
use crate::error::Result;

use super::{MysqlDialect, MysqlExecutor};

pub struct MysqlDdlLayer {
    database: String,
    dialect: Arc<dyn Dialect>,
    executor: Arc<dyn QueryExecutor>,
    span: Span,
}

impl MysqlDdlLayer {
    pub fn new(identity: &ConnectionIdentity) -> Result<Self> {
        let executor = Arc::new(MysqlExecutor::new(identity.server_location()?)?);
        Self::with_executor(identity, executor)
    }

    pub fn with_executor(
        identity: &ConnectionIdentity,
        executor: Arc<dyn QueryExecutor>,
    ) -> Result<Self> {
        let database = identity.server_location()?.database.clone();
        let span = info_span!("ddl", backend = "mysql", database = %database);
        Ok(Self {
            database,
            dialect: Arc::new(MysqlDialect::new()),
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

    fn table_probe(&self) -> String {
        format!(
            "SELECT COUNT(*) FROM information_schema.TABLES \
             WHERE TABLE_SCHEMA = {} AND TABLE_NAME = {}",
            self.dialect.param_placeholder(1),
            self.dialect.param_placeholder(2)
        )
    }

    fn database_probe(&self) -> String {
        format!(
            "SELECT COUNT(*) FROM information_schema.SCHEMATA WHERE SCHEMA_NAME = {}",
            self.dialect.param_placeholder(1)
        )
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
impl DdlLayer for MysqlDdlLayer {
    fn dialect(&self) -> &dyn Dialect {
        self.dialect.as_ref()
    }

    fn executor(&self) -> &dyn QueryExecutor {
        self.executor.as_ref()
    }

    fn qualified_name(&self, table: &str) -> Result<String> {
        Ok(format!(
            "{}.{}",
            self.dialect.quote_ident(&self.database)?,
            self.dialect.quote_ident(table)?
        ))
    }

    async fn container_missing(&self, table: &Table) -> Result<bool> {
        let count = self
            .executor
            .query_scalar_int(&self.table_probe(), &[self.database.as_str(), table.name.as_str()])
            .instrument(self.span.clone())
            .await?;
        Ok(count == 0)
    }

    /// MySQL has no sequence objects; answers without a round trip.
    async fn sequence_exists(&self, name: &str) -> Result<bool> {
        debug!(parent: &self.span, "sequence '{}' requested; MySQL has no sequences", name);
        Ok(false)
    }

    async fn storage_unit_missing(&self) -> Result<bool> {
        let count = self
            .executor
            .query_scalar_int(&self.database_probe(), &[self.database.as_str()])
            .instrument(self.span.clone())
            .await?;
        Ok(count == 0)
    }

    async fn create_storage_unit(&self) -> Result<()> {
        let sql = format!(
            "CREATE DATABASE {} CHARACTER SET utf8mb4 COLLATE utf8mb4_unicode_ci",
            self.dialect.quote_ident(&self.database)?
        );
        self.run(&sql).await?;
        info!(parent: &self.span, "Created database '{}'", self.database);
        Ok(())
    }

    async fn delete_storage_unit(&self) -> Result<()> {
        let sql = format!(
            "DROP DATABASE IF EXISTS {}",
            self.dialect.quote_ident(&self.database)?
        );
        self.run(&sql).await?;
        info!(parent: &self.span, "Dropped database '{}'", self.database);
        Ok(())
    }

    async fn create_container(&self, table: &Table) -> Result<()> {
        let sql = self.build_create_container_statement(table)?;
        self.run(&sql).await?;
        info!(parent: &self.span, "Created table {}.{}", self.database, table.name);
        Ok(())
    }

    async fn delete_container(&self, table: &Table) -> Result<()> {
        let sql = self.build_delete_container_statement(table)?;
        self.run(&sql).await?;
        info!(parent: &self.span, "Dropped table {}.{}", self.database, table.name);
        Ok(())
    }
}
