//! PostgreSQL DDL layer: the storage unit is a schema.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, info_span, Instrument, Span};

use crate::core::connection::ConnectionIdentity;
use crate::core::schema::Table;
use crate::core::traits::{DdlLayer, Dialect, QueryExecutor};
use crate::error::Result;

use super::{PostgresDialect, PostgresExecutor};

/// Schema used when the identity does not name one.
pub const DEFAULT_SCHEMA: &str = "public";

pub struct PostgresDdlLayer {
    schema: String,
    dialect: Arc<dyn Dialect>,
    executor: Arc<dyn QueryExecutor>,
    span: Span,
}

impl PostgresDdlLayer {
    pub fn new(identity: &ConnectionIdentity) -> Result<Self> {
        let executor = Arc::new(PostgresExecutor::new(identity.server_location()?)?);
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
            backend = "postgres",
            database = %location.database,
            schema = %schema
        );
        Ok(Self {
            schema,
            dialect: Arc::new(PostgresDialect::new()),
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

    /// Schema holding this layer's tables.
    pub fn schema(&self) -> &str {
        &self.schema
    }

    fn table_probe(&self) -> String {
        format!(
            "SELECT COUNT(*) FROM pg_catalog.pg_tables WHERE schemaname = {} AND tablename = {}",
            self.dialect.param_placeholder(1),
            self.dialect.param_placeholder(2)
        )
    }

    fn schema_probe(&self) -> String {
        format!(
            "SELECT COUNT(*) FROM pg_catalog.pg_namespace WHERE nspname = {}",
            self.dialect.param_placeholder(1)
        )
    }

    fn sequence_probe(&self) -> String {
        format!(
            "SELECT COUNT(*) FROM pg_catalog.pg_class c \
             JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace \
             WHERE c.relkind = 'S' AND n.nspname = {} AND c.relname = {}",
            self.dialect.param_placeholder(1),
            self.dialect.param_placeholder(2)
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
impl DdlLayer for PostgresDdlLayer {
    fn dialect(&self) -> &dyn Dialect {
        self.dialect.as_ref()
    }

    fn executor(&self) -> &dyn QueryExecutor {
        self.executor.as_ref()
    }

    fn qualified_name(&self, table: &str) -> Result<String> {
        Ok(format!(
            "{}.{}",
            self.dialect.quote_ident(&self.schema)?,
            self.dialect.quote_ident(table)?
        ))
    }

    async fn container_missing(&self, table: &Table) -> Result<bool> {
        let count = self
            .count(&self.table_probe(), &[self.schema.as_str(), table.name.as_str()])
            .await?;
        Ok(count == 0)
    }

    async fn sequence_exists(&self, name: &str) -> Result<bool> {
        let count = self
            .count(&self.sequence_probe(), &[self.schema.as_str(), name])
            .await?;
        Ok(count > 0)
    }

    async fn storage_unit_missing(&self) -> Result<bool> {
        let count = self.count(&self.schema_probe(), &[self.schema.as_str()]).await?;
        Ok(count == 0)
    }

    async fn create_storage_unit(&self) -> Result<()> {
        let sql = format!("CREATE SCHEMA {}", self.dialect.quote_ident(&self.schema)?);
        self.run(&sql).await?;
        info!(parent: &self.span, "Created schema '{}'", self.schema);
        Ok(())
    }

    async fn delete_storage_unit(&self) -> Result<()> {
        let sql = format!(
            "DROP SCHEMA IF EXISTS {} CASCADE",
            self.dialect.quote_ident(&self.schema)?
        );
        self.run(&sql).await?;
        info!(parent: &self.span, "Dropped schema '{}'", self.schema);
        Ok(())
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::connection::{BackendKind, ServerLocation};
    use crate::core::schema::{Column, LogicalType};
    use crate::core::testing::RecordingExecutor;

    fn identity(schema: Option<&str>) -> ConnectionIdentity {
        ConnectionIdentity::server(
            BackendKind::Postgres,
            ServerLocation {
                host: "localhost".into(),
                port: 5432,
                database: "app".into(),
                user: "postgres".into(),
                password: "postgres".into(),
                schema: schema.map(String::from),
                ssl_mode: "disable".into(),
                trust_server_cert: false,
            },
        )
        .unwrap()
    }

    fn layer(schema: Option<&str>, scalar: i64) -> (PostgresDdlLayer, Arc<RecordingExecutor>) {
        let recorder = Arc::new(RecordingExecutor::new("postgres", scalar));
        let layer = PostgresDdlLayer::with_executor(&identity(schema), recorder.clone()).unwrap();
        (layer, recorder)
    }

    fn widgets() -> Table {
        Table::new("Widgets")
            .column(Column::new("Id", LogicalType::Int64).autonumber())
            .column(Column::new("Name", LogicalType::String { max_length: Some(80) }).not_null())
    }

    #[test]
    fn test_default_schema_is_public() {
        let (layer, _) = layer(None, 0);
        assert_eq!(layer.schema(), "public");
        assert_eq!(layer.qualified_name("Widgets").unwrap(), "\"public\".\"Widgets\"");
    }

    #[test]
    fn test_create_statement_is_schema_qualified() {
        let (layer, _) = layer(Some("sales"), 0);
        let sql = layer.build_create_container_statement(&widgets()).unwrap();
        assert!(sql.starts_with("CREATE TABLE \"sales\".\"Widgets\" ("));
        assert!(sql.contains("\"Name\" VARCHAR(80) NOT NULL"));
        assert_eq!(
            layer.build_delete_container_statement(&widgets()).unwrap(),
            "DROP TABLE IF EXISTS \"sales\".\"Widgets\""
        );
    }

    #[tokio::test]
    async fn test_container_probe_binds_schema_and_name() {
        let (layer, recorder) = layer(Some("sales"), 0);
        assert!(layer.container_missing(&widgets()).await.unwrap());

        let call = recorder.last();
        assert_eq!(
            call.sql,
            "SELECT COUNT(*) FROM pg_catalog.pg_tables WHERE schemaname = $1 AND tablename = $2"
        );
        assert_eq!(call.params, vec!["sales", "Widgets"]);
    }

    #[tokio::test]
    async fn test_sequence_probe_polarity() {
        let (layer, recorder) = layer(None, 1);
        assert!(layer.sequence_exists("Widgets_Id_seq").await.unwrap());
        assert!(recorder.last().sql.contains("n.nspname = $1 AND c.relname = $2"));
        assert_eq!(recorder.last().params, vec!["public", "Widgets_Id_seq"]);

        let (empty, _) = self::layer(None, 0);
        assert!(!empty.sequence_exists("missing_seq").await.unwrap());
    }

    #[tokio::test]
    async fn test_storage_unit_statements() {
        let (layer, recorder) = layer(Some("tenant\"1"), 1);
        assert!(!layer.storage_unit_missing().await.unwrap());
        assert_eq!(
            recorder.last().sql,
            "SELECT COUNT(*) FROM pg_catalog.pg_namespace WHERE nspname = $1"
        );

        layer.create_storage_unit().await.unwrap();
        assert_eq!(recorder.last().sql, "CREATE SCHEMA \"tenant\"\"1\"");

        layer.delete_storage_unit().await.unwrap();
        assert_eq!(
            recorder.last().sql,
            "DROP SCHEMA IF EXISTS \"tenant\"\"1\" CASCADE"
        );
    }

    #[tokio::test]
    async fn test_overlong_table_name_is_rejected_before_execution() {
        let (layer, recorder) = layer(None, 0);
        let table = Table::new("t".repeat(70)).column(Column::new("Id", LogicalType::Int32));

        let err = layer.create_container(&table).await.unwrap_err();
        assert!(matches!(err, crate::error::DdlError::Identifier(_)));
        assert!(recorder.calls().is_empty());

        let ok = Table::new("t".repeat(63)).column(Column::new("Id", LogicalType::Int32));
        layer.create_container(&ok).await.unwrap();
    }

    #[tokio::test]
    async fn test_create_container_executes_generated_statement() {
        let (layer, recorder) = layer(None, 0);
        layer.create_container(&widgets()).await.unwrap();
        assert_eq!(
            recorder.last().sql,
            layer.build_create_container_statement(&widgets()).unwrap()
        );
    }
}
