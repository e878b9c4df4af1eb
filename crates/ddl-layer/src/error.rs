//! Error types for the DDL layer.

use thiserror::Error;

use crate::core::schema::LogicalType;

/// Main error type for schema management operations.
#[derive(Error, Debug)]
pub enum DdlError {
    /// Configuration error (invalid YAML, missing fields, unknown backend, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Identifier rejected before it could be spliced into DDL
    #[error("Invalid identifier: {0}")]
    Identifier(String),

    /// Schema descriptor is malformed (no columns, duplicate names, etc.)
    #[error("Invalid schema descriptor: {0}")]
    Schema(String),

    /// Logical type has no token in the target dialect
    #[error("Logical type '{logical_type}' is not supported by the {dialect} dialect")]
    UnsupportedType {
        dialect: String,
        logical_type: LogicalType,
    },

    /// Capability exists conceptually but is not implemented for the backend
    #[error("{operation} is not supported by the {dialect} backend")]
    NotSupported {
        dialect: String,
        operation: &'static str,
    },

    /// IO error (storage unit files, config files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// SQLite or MySQL query failure
    #[error("Query error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// PostgreSQL query failure
    #[error("PostgreSQL query error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    /// SQL Server query failure
    #[error("SQL Server query error: {0}")]
    Mssql(#[from] tiberius::error::Error),

    /// Scalar query produced no row
    #[error("Scalar query returned no rows: {0}")]
    EmptyResult(String),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DdlError {
    /// Create an UnsupportedType error for a dialect.
    pub fn unsupported_type(dialect: impl Into<String>, logical_type: LogicalType) -> Self {
        DdlError::UnsupportedType {
            dialect: dialect.into(),
            logical_type,
        }
    }

    /// Create a NotSupported error for a backend operation.
    pub fn not_supported(dialect: impl Into<String>, operation: &'static str) -> Self {
        DdlError::NotSupported {
            dialect: dialect.into(),
            operation,
        }
    }

    /// Whether the error came from the underlying query primitive.
    pub fn is_query_error(&self) -> bool {
        matches!(
            self,
            DdlError::Sqlx(_) | DdlError::Postgres(_) | DdlError::Mssql(_) | DdlError::EmptyResult(_)
        )
    }

    /// Process exit code for the CLI.
    pub fn exit_code(&self) -> u8 {
        match self {
            DdlError::Config(_) | DdlError::Yaml(_) | DdlError::Json(_) => 2,
            DdlError::Identifier(_) | DdlError::Schema(_) => 3,
            DdlError::UnsupportedType { .. } | DdlError::NotSupported { .. } => 4,
            DdlError::Io(_) => 5,
            DdlError::Sqlx(_)
            | DdlError::Postgres(_)
            | DdlError::Mssql(_)
            | DdlError::EmptyResult(_) => 6,
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for DDL operations.
pub type Result<T> = std::result::Result<T, DdlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_type_message() {
        let err = DdlError::unsupported_type("sqlite", LogicalType::Interval);
        assert_eq!(
            err.to_string(),
            "Logical type 'interval' is not supported by the sqlite dialect"
        );
        assert_eq!(err.exit_code(), 4);
        assert!(!err.is_query_error());
    }

    #[test]
    fn test_not_supported_message() {
        let err = DdlError::not_supported("mssql", "create_storage_unit");
        assert_eq!(
            err.to_string(),
            "create_storage_unit is not supported by the mssql backend"
        );
    }

    #[test]
    fn test_io_error_is_not_query_error() {
        let err: DdlError =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into();
        assert!(!err.is_query_error());
        assert_eq!(err.exit_code(), 5);
    }

    #[test]
    fn test_empty_result_is_query_error() {
        let err = DdlError::EmptyResult("SELECT COUNT(*) FROM t".into());
        assert!(err.is_query_error());
        assert_eq!(err.exit_code(), 6);
    }

    #[test]
    fn test_format_detailed_includes_header() {
        let err = DdlError::Config("connection.type is required".into());
        let detailed = err.format_detailed();
        assert!(detailed.starts_with("Error: Configuration error: connection.type is required"));
    }
}
