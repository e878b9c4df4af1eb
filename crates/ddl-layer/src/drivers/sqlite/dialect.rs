//! SQLite SQL dialect (Strategy pattern).
//!
//! SQLite uses type affinity rather than strict column types, so most
//! logical types collapse onto one of INTEGER, REAL, NUMERIC, TEXT or BLOB.

use crate::core::identifier::quote_double;
use crate::core::schema::LogicalType;
use crate::core::traits::Dialect;
use crate::error::{DdlError, Result};

/// SQLite dialect implementation.
#[derive(Debug, Clone, Default)]
pub struct SqliteDialect;

impl SqliteDialect {
    /// Create a new SQLite dialect instance.
    pub fn new() -> Self {
        Self
    }
}

impl Dialect for SqliteDialect {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn quote_ident(&self, name: &str) -> Result<String> {
        quote_double(name)
    }

    fn param_placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn type_token(&self, logical_type: &LogicalType) -> Result<String> {
        let token = match logical_type {
            LogicalType::Boolean
            | LogicalType::Byte
            | LogicalType::Int16
            | LogicalType::Int32
            | LogicalType::Int64 => "INTEGER",
            LogicalType::Float32 | LogicalType::Float64 => "REAL",
            LogicalType::Decimal { .. } => "NUMERIC",
            LogicalType::Char
            | LogicalType::String { .. }
            | LogicalType::Uuid
            | LogicalType::Json => "TEXT",
            LogicalType::Timestamp => "DATETIME",
            LogicalType::Bytes => "BLOB",
            LogicalType::Interval => {
                return Err(DdlError::unsupported_type(self.name(), *logical_type));
            }
        };
        Ok(token.to_string())
    }

    /// Only an `INTEGER PRIMARY KEY` column aliases the rowid, so the base
    /// type is ignored.
    fn auto_type(&self, _base: &LogicalType) -> Result<String> {
        Ok("INTEGER PRIMARY KEY AUTOINCREMENT".to_string())
    }

    fn auto_type_includes_primary_key(&self) -> bool {
        true
    }

    fn supports_sequences(&self) -> bool {
        false
    }
}
