//! Configuration types.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::connection::{BackendKind, ConnectionIdentity, ServerLocation};
use crate::core::schema::Table;
use crate::error::{DdlError, Result};

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Backend connection.
    pub connection: ConnectionConfig,

    /// Containers managed by the table commands.
    #[serde(default)]
    pub tables: Vec<Table>,
}

impl Config {
    /// Look up a table descriptor by name (case-insensitive).
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }
}

/// Backend connection configuration.
///
/// SQLite needs only `path`; server backends need `host`, `database` and
/// `user`.
#[derive(Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Backend type: sqlite, postgres, mysql, mssql (aliases accepted).
    pub r#type: String,

    /// Database file (SQLite).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Database host.
    #[serde(default)]
    pub host: String,

    /// Database port (default: the backend's standard port).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Database name.
    #[serde(default)]
    pub database: String,

    /// Username.
    #[serde(default)]
    pub user: String,

    /// Password. Read from the file, never written back out.
    #[serde(default, skip_serializing)]
    pub password: String,

    /// Schema holding the tables (default: "public" for PostgreSQL, "dbo"
    /// for SQL Server).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// SSL mode (default: "prefer").
    #[serde(default = "default_prefer")]
    pub ssl_mode: String,

    /// Trust server certificate (SQL Server, default: false).
    #[serde(default)]
    pub trust_server_cert: bool,
}

impl ConnectionConfig {
    /// Parsed backend kind.
    pub fn kind(&self) -> Result<BackendKind> {
        self.r#type.parse()
    }

    /// Resolve into the identity the DDL layer works with.
    pub fn identity(&self) -> Result<ConnectionIdentity> {
        let kind = self.kind()?;

        if kind.is_file_based() {
            let path = self.path.clone().ok_or_else(|| {
                DdlError::Config(format!("connection.path is required for {}", kind))
            })?;
            return Ok(ConnectionIdentity::sqlite(path));
        }

        let default_schema = match kind {
            BackendKind::Postgres => Some("public".to_string()),
            BackendKind::Mssql => Some("dbo".to_string()),
            _ => None,
        };

        let location = ServerLocation {
            host: self.host.clone(),
            port: self.port.or(kind.default_port()).unwrap_or_default(),
            database: self.database.clone(),
            user: self.user.clone(),
            password: self.password.clone(),
            schema: self.schema.clone().or(default_schema),
            ssl_mode: self.ssl_mode.clone(),
            trust_server_cert: self.trust_server_cert,
        };
        ConnectionIdentity::server(kind, location)
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("type", &self.r#type)
            .field("path", &self.path)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("schema", &self.schema)
            .field("ssl_mode", &self.ssl_mode)
            .field("trust_server_cert", &self.trust_server_cert)
            .finish()
    }
}

fn default_prefer() -> String {
    "prefer".to_string()
}
