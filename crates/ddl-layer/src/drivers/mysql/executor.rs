//! sqlx query primitive for MySQL/MariaDB.
//!
//! Connections are opened without a default database so that storage unit
//! probes and `CREATE DATABASE` work before the database exists.

use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlSslMode};
use sqlx::Connection;
use tracing::{debug, warn};

use crate::core::connection::ServerLocation;
use crate::core::traits::QueryExecutor;
use crate::drivers::common::SslMode;
use crate::error::{DdlError, Result};

pub struct MysqlExecutor {
    options: MySqlConnectOptions,
}

impl MysqlExecutor {
    pub fn new(location: &ServerLocation) -> Result<Self> {
        let ssl_mode = match SslMode::parse(&location.ssl_mode)? {
            SslMode::Disable => {
                warn!("MySQL TLS is disabled. Credentials will be transmitted in plaintext.");
                MySqlSslMode::Disabled
            }
            SslMode::Prefer => MySqlSslMode::Preferred,
            SslMode::Require => MySqlSslMode::Required,
            SslMode::VerifyCa => MySqlSslMode::VerifyCa,
            SslMode::VerifyFull => MySqlSslMode::VerifyIdentity,
        };

        let options = MySqlConnectOptions::new()
            .host(&location.host)
            .port(location.port)
            .username(&location.user)
            .password(&location.password)
            .charset("utf8mb4")
            .ssl_mode(ssl_mode);

        Ok(Self { options })
    }

    async fn connect(&self) -> Result<MySqlConnection> {
        Ok(MySqlConnection::connect_with(&self.options).await?)
    }
}

#[async_trait]
impl QueryExecutor for MysqlExecutor {
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
        sqlx::query(sql).execute(&mut conn).await?;
        conn.close().await?;
        debug!("executed: {}", sql);
        Ok(())
    }

    fn db_type(&self) -> &str {
        "mysql"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_ssl_mode() {
        let mut location = ServerLocation {
            host: "localhost".into(),
            port: 3306,
            database: "shop".into(),
            user: "root".into(),
            password: "root".into(),
            schema: None,
            ssl_mode: "verify-full".into(),
            trust_server_cert: false,
        };
        assert!(MysqlExecutor::new(&location).is_ok());

        location.ssl_mode = "bogus".into();
        assert!(MysqlExecutor::new(&location).is_err());
    }
}
