//! Connection identity: which backend, and where its storage unit lives.
//!
//! A [`ConnectionIdentity`] is resolved once (usually from
//! [`ConnectionConfig`](crate::config::ConnectionConfig)) and then only read
//! by the DDL layer.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DdlError, Result};

/// Supported relational backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Sqlite,
    Postgres,
    Mysql,
    Mssql,
}

impl BackendKind {
    /// All backends, in registration order.
    pub const ALL: [BackendKind; 4] = [
        BackendKind::Sqlite,
        BackendKind::Postgres,
        BackendKind::Mysql,
        BackendKind::Mssql,
    ];

    /// Canonical backend name.
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Sqlite => "sqlite",
            BackendKind::Postgres => "postgres",
            BackendKind::Mysql => "mysql",
            BackendKind::Mssql => "mssql",
        }
    }

    /// Default TCP port for server backends.
    pub fn default_port(&self) -> Option<u16> {
        match self {
            BackendKind::Sqlite => None,
            BackendKind::Postgres => Some(5432),
            BackendKind::Mysql => Some(3306),
            BackendKind::Mssql => Some(1433),
        }
    }

    /// Whether the storage unit is a single local file.
    pub fn is_file_based(&self) -> bool {
        matches!(self, BackendKind::Sqlite)
    }
}

impl FromStr for BackendKind {
    type Err = DdlError;

    /// Normalizes the usual aliases:
    /// - "sqlite", "sqlite3" → sqlite
    /// - "postgres", "postgresql", "pg" → postgres
    /// - "mysql", "mariadb" → mysql
    /// - "mssql", "sqlserver", "sql_server" → mssql
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "sqlite" | "sqlite3" => Ok(BackendKind::Sqlite),
            "postgres" | "postgresql" | "pg" => Ok(BackendKind::Postgres),
            "mysql" | "mariadb" => Ok(BackendKind::Mysql),
            "mssql" | "sqlserver" | "sql_server" => Ok(BackendKind::Mssql),
            other => Err(DdlError::Config(format!(
                "Unknown database type: '{}'. Supported types: sqlite, postgres, mysql, mssql",
                other
            ))),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Location of a server-hosted storage unit.
#[derive(Clone, PartialEq, Eq)]
pub struct ServerLocation {
    pub host: String,
    pub port: u16,
    /// Database to connect to. For MySQL and SQL Server this is also the
    /// storage unit.
    pub database: String,
    pub user: String,
    pub password: String,
    /// Schema holding containers. The storage unit for PostgreSQL.
    pub schema: Option<String>,
    /// TLS mode: disable, prefer, require, verify-ca, verify-full.
    pub ssl_mode: String,
    /// Accept any server certificate (SQL Server only).
    pub trust_server_cert: bool,
}

// Hand-written so the password never reaches a log line.
impl fmt::Debug for ServerLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerLocation")
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

/// Where the storage unit lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// Single-file database.
    File(PathBuf),
    /// Network server.
    Server(ServerLocation),
}

/// Resolved backend identity for one logical connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionIdentity {
    pub kind: BackendKind,
    pub location: Location,
}

impl ConnectionIdentity {
    /// Identity for a SQLite database file.
    pub fn sqlite(path: impl Into<PathBuf>) -> Self {
        Self {
            kind: BackendKind::Sqlite,
            location: Location::File(path.into()),
        }
    }

    /// Identity for a server backend.
    ///
    /// # Errors
    ///
    /// Returns `DdlError::Config` when `kind` is file based.
    pub fn server(kind: BackendKind, location: ServerLocation) -> Result<Self> {
        if kind.is_file_based() {
            return Err(DdlError::Config(format!(
                "{} is file based and needs a file path, not a server location",
                kind
            )));
        }
        Ok(Self {
            kind,
            location: Location::Server(location),
        })
    }

    /// File path of a file-based storage unit.
    pub fn file_path(&self) -> Result<&PathBuf> {
        match &self.location {
            Location::File(path) => Ok(path),
            Location::Server(_) => Err(DdlError::Config(format!(
                "{} connection has no file location",
                self.kind
            ))),
        }
    }

    /// Server location of a server-hosted storage unit.
    pub fn server_location(&self) -> Result<&ServerLocation> {
        match &self.location {
            Location::Server(server) => Ok(server),
            Location::File(_) => Err(DdlError::Config(format!(
                "{} connection has no server location",
                self.kind
            ))),
        }
    }

    /// Human-readable target for log lines (never includes credentials).
    pub fn describe(&self) -> String {
        match &self.location {
            Location::File(path) => format!("{}:{}", self.kind, path.display()),
            Location::Server(s) => format!("{}://{}:{}/{}", self.kind, s.host, s.port, s.database),
        }
    }
}
