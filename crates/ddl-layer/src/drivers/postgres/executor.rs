//! tokio-postgres query primitive.

use std::time::Duration;

use async_trait::async_trait;
use tokio_postgres::config::SslMode as PgSslMode;
use tokio_postgres::types::ToSql;
use tokio_postgres::{Client, NoTls};
use tracing::{debug, warn};

use crate::core::connection::ServerLocation;
use crate::core::traits::QueryExecutor;
use crate::drivers::common::{SslMode, TlsBuilder};
use crate::error::{DdlError, Result};

/// Timeout for establishing a connection.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connects for every call; the connection task ends when the client drops.
pub struct PostgresExecutor {
    config: tokio_postgres::Config,
    ssl_mode: SslMode,
}

impl PostgresExecutor {
    pub fn new(location: &ServerLocation) -> Result<Self> {
        let ssl_mode = SslMode::parse(&location.ssl_mode)?;

        let mut config = tokio_postgres::Config::new();
        config
            .host(&location.host)
            .port(location.port)
            .dbname(&location.database)
            .user(&location.user)
            .password(&location.password)
            .connect_timeout(CONNECT_TIMEOUT)
            .ssl_mode(match ssl_mode {
                SslMode::Disable => PgSslMode::Disable,
                SslMode::Prefer => PgSslMode::Prefer,
                _ => PgSslMode::Require,
            });

        if !ssl_mode.uses_tls() {
            warn!("PostgreSQL TLS is disabled. Credentials will be transmitted in plaintext.");
        }

        Ok(Self { config, ssl_mode })
    }

    async fn connect(&self) -> Result<Client> {
        match TlsBuilder::new(self.ssl_mode).build()? {
            Some(tls) => {
                let (client, connection) = self.config.connect(tls).await?;
                tokio::spawn(async move {
                    if let Err(e) = connection.await {
                        warn!("PostgreSQL connection error: {}", e);
                    }
                });
                Ok(client)
            }
            None => {
                let (client, connection) = self.config.connect(NoTls).await?;
                tokio::spawn(async move {
                    if let Err(e) = connection.await {
                        warn!("PostgreSQL connection error: {}", e);
                    }
                });
                Ok(client)
            }
        }
    }
}

#[async_trait]
impl QueryExecutor for PostgresExecutor {
    async fn query_scalar_int(&self, sql: &str, params: &[&str]) -> Result<i64> {
        let client = self.connect().await?;
        let params: Vec<&(dyn ToSql + Sync)> =
            params.iter().map(|p| p as &(dyn ToSql + Sync)).collect();

        let row = client
            .query_opt(sql, &params)
            .await?
            .ok_or_else(|| DdlError::EmptyResult(sql.to_string()))?;
        Ok(row.try_get::<_, i64>(0)?)
    }

    async fn execute(&self, sql: &str) -> Result<()> {
        let client = self.connect().await?;
        client.batch_execute(sql).await?;
        debug!("executed: {}", sql);
        Ok(())
    }

    fn db_type(&self) -> &str {
        "postgres"
    }
}
