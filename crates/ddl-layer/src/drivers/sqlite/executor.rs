//! sqlx-backed query primitive for SQLite files.

use std::path::Path;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::Connection;
use tracing::debug;

use crate::core::traits::QueryExecutor;
use crate::error::{DdlError, Result};

/// Opens the database file for every call and closes it afterwards.
///
/// The file is never created implicitly: storage unit creation belongs to
/// [`SqliteDdlLayer`](super::SqliteDdlLayer).
#[derive(Debug, Clone)]
pub struct SqliteExecutor {
    options: SqliteConnectOptions,
}

impl SqliteExecutor {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let options = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .create_if_missing(false);
        Self { options }
    }

    async fn connect(&self) -> Result<SqliteConnection> {
        Ok(SqliteConnection::connect_with(&self.options).await?)
    }
}

#[async_trait]
impl QueryExecutor for SqliteExecutor {
    async fn query_scalar_int(&self, sql: &str, params: &[&str]) -> Result<i64> {
        let mut conn = self.connect().await?;

        let mut query = sqlx::query_scalar::<_, i64>(sql);
        for param in params {
            query = query.bind(*param);
        }
        let value = query.fetch_optional(&mut conn).await?;
        conn.close().await?;

        value.ok_or_else(|| DdlError::EmptyResult(sql.to_string()))
    }

    async fn execute(&self, sql: &str) -> Result<()> {
        let mut conn = self.connect().await?;
        let result = sqlx::query(sql).execute(&mut conn).await?;
        conn.close().await?;
        debug!("{} row(s) affected", result.rows_affected());
        Ok(())
    }

    fn db_type(&self) -> &str {
        "sqlite"
    }
}
