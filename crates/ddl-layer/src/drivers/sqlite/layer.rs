//! SQLite DDL layer: the storage unit is a single database file.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, info_span, warn, Instrument, Span};

use crate::core::connection::ConnectionIdentity;
use crate::core::schema::Table;
use crate::core::traits::{DdlLayer, Dialect, QueryExecutor};
use crate::error::{DdlError, Result};

use super::{SqliteDialect, SqliteExecutor};

/// Files SQLite may leave next to the database.
const SIDE_FILE_SUFFIXES: [&str; 3] = ["-journal", "-wal", "-shm"];

pub struct SqliteDdlLayer {
    path: PathBuf,
    dialect: Arc<dyn Dialect>,
    executor: Arc<dyn QueryExecutor>,
    span: Span,
}

impl SqliteDdlLayer {
    /// Build a layer for the file named by `identity`.
    pub fn new(identity: &ConnectionIdentity) -> Result<Self> {
        let path = identity.file_path()?.clone();
        let executor = Arc::new(SqliteExecutor::new(&path));
        Ok(Self::with_executor(path, executor))
    }

    /// Build a layer over a caller-supplied executor.
    pub fn with_executor(path: impl Into<PathBuf>, executor: Arc<dyn QueryExecutor>) -> Self {
        let path = path.into();
        let span = info_span!("ddl", backend = "sqlite", path = %path.display());
        Self {
            path,
            dialect: Arc::new(SqliteDialect::new()),
            executor,
            span,
        }
    }

    /// Replace the syntax strategy.
    pub fn with_dialect(mut self, dialect: Arc<dyn Dialect>) -> Self {
        self.dialect = dialect;
        self
    }

    /// Replace the logging context.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Path of the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Catalog lookup shared by the container and sequence probes.
    fn catalog_probe(&self) -> String {
        format!(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = {} AND name = {}",
            self.dialect.param_placeholder(1),
            self.dialect.param_placeholder(2)
        )
    }

    async fn catalog_count(&self, kind: &str, name: &str) -> Result<i64> {
        self.executor
            .query_scalar_int(&self.catalog_probe(), &[kind, name])
            .instrument(self.span.clone())
            .await
    }

    /// Remove the database file and its side files, tolerating absence.
    async fn remove_files(&self) -> Result<()> {
        let targets = std::iter::once(self.path.clone())
            .chain(SIDE_FILE_SUFFIXES.iter().map(|s| side_file(&self.path, s)));

        for target in targets {
            match tokio::fs::remove_file(&target).await {
                Ok(()) => info!(parent: &self.span, "Deleted {}", target.display()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(with_path(e, "deleting", &target)),
            }
        }
        Ok(())
    }
}

fn side_file(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

fn with_path(err: io::Error, action: &str, path: &Path) -> DdlError {
    DdlError::Io(io::Error::new(
        err.kind(),
        format!("{} {}: {}", action, path.display(), err),
    ))
}

#[async_trait]
impl DdlLayer for SqliteDdlLayer {
    fn dialect(&self) -> &dyn Dialect {
        self.dialect.as_ref()
    }

    fn executor(&self) -> &dyn QueryExecutor {
        self.executor.as_ref()
    }

    /// An absent database file holds no tables.
    async fn container_missing(&self, table: &Table) -> Result<bool> {
        if self.storage_unit_missing().await? {
            return Ok(true);
        }
        let count = self.catalog_count("table", &table.name).await?;
        debug!(parent: &self.span, "table '{}' count={}", table.name, count);
        Ok(count == 0)
    }

    /// SQLite has no sequence objects, so this is false for every name.
    async fn sequence_exists(&self, name: &str) -> Result<bool> {
        if self.storage_unit_missing().await? {
            return Ok(false);
        }
        let count = self.catalog_count("sequence", name).await?;
        Ok(count > 0)
    }

    async fn storage_unit_missing(&self) -> Result<bool> {
        let exists = tokio::fs::try_exists(&self.path)
            .await
            .map_err(|e| with_path(e, "checking", &self.path))?;
        Ok(!exists)
    }

    /// Creates an empty database file. An existing file is replaced, along
    /// with any journal or WAL files left beside it.
    async fn create_storage_unit(&self) -> Result<()> {
        if !self.storage_unit_missing().await? {
            warn!(parent: &self.span, "Overwriting existing database file {}", self.path.display());
        }
        self.remove_files().await?;
        tokio::fs::File::create(&self.path)
            .await
            .map_err(|e| with_path(e, "creating", &self.path))?;
        info!(parent: &self.span, "Created database file {}", self.path.display());
        Ok(())
    }

    async fn delete_storage_unit(&self) -> Result<()> {
        self.remove_files().await
    }

    async fn create_container(&self, table: &Table) -> Result<()> {
        let sql = self.build_create_container_statement(table)?;
        self.executor
            .execute(&sql)
            .instrument(self.span.clone())
            .await?;
        info!(parent: &self.span, "Created table {}", table.name);
        Ok(())
    }

    async fn delete_container(&self, table: &Table) -> Result<()> {
        let sql = self.build_delete_container_statement(table)?;
        self.executor
            .execute(&sql)
            .instrument(self.span.clone())
            .await?;
        info!(parent: &self.span, "Dropped table {}", table.name);
        Ok(())
    }
}
