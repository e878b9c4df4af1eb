//! Tiberius query primitive for SQL Server.

use async_trait::async_trait;
use tiberius::{AuthMethod, Client, Config, EncryptionLevel, Query, Row};
use tokio::net::TcpStream;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};
use tracing::{debug, warn};

use crate::core::connection::ServerLocation;
use crate::core::traits::QueryExecutor;
use crate::drivers::common::SslMode;
use crate::error::{DdlError, Result};

/// Connects to the `master` database, since the storage unit may not exist.
pub struct MssqlExecutor {
    config: Config,
}

impl MssqlExecutor {
    pub fn new(location: &ServerLocation) -> Result<Self> {
        let ssl_mode = SslMode::parse(&location.ssl_mode)?;

        let mut config = Config::new();
        config.host(&location.host);
        config.port(location.port);
        config.database("master");
        config.authentication(AuthMethod::sql_server(&location.user, &location.password));

        match ssl_mode {
            SslMode::Disable => {
                warn!("MSSQL encryption is disabled. Credentials will be transmitted in plaintext.");
                config.encryption(EncryptionLevel::NotSupported);
            }
            SslMode::Prefer => config.encryption(EncryptionLevel::On),
            _ => config.encryption(EncryptionLevel::Required),
        }
        if location.trust_server_cert || (ssl_mode.uses_tls() && !ssl_mode.verifies_certificate())
        {
            config.trust_cert();
        }

        Ok(Self { config })
    }

    async fn connect(&self) -> Result<Client<Compat<TcpStream>>> {
        let tcp = TcpStream::connect(self.config.get_addr()).await?;
        tcp.set_nodelay(true)?;
        Ok(Client::connect(self.config.clone(), tcp.compat_write()).await?)
    }
}

/// COUNT(*) is INT on SQL Server and COUNT_BIG(*) is BIGINT; accept both.
fn scalar_from_row(row: &Row) -> Result<Option<i64>> {
    if let Ok(value) = row.try_get::<i32, usize>(0) {
        return Ok(value.map(i64::from));
    }
    Ok(row.try_get::<i64, usize>(0)?)
}

#[async_trait]
impl QueryExecutor for MssqlExecutor {
    async fn query_scalar_int(&self, sql: &str, params: &[&str]) -> Result<i64> {
        let mut client = self.connect().await?;

        let mut query = Query::new(sql);
        for param in params {
            query.bind(*param);
        }
        let row = query.query(&mut client).await?.into_row().await?;
        client.close().await?;

        let value = match row {
            Some(row) => scalar_from_row(&row)?,
            None => None,
        };
        value.ok_or_else(|| DdlError::EmptyResult(sql.to_string()))
    }

    async fn execute(&self, sql: &str) -> Result<()> {
        let mut client = self.connect().await?;
        client.simple_query(sql).await?.into_results().await?;
        client.close().await?;
        debug!("executed: {}", sql);
        Ok(())
    }

    fn db_type(&self) -> &str {
        "mssql"
    }
}
