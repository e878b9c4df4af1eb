//! PostgreSQL SQL dialect (Strategy pattern).
//!
//! Provides PostgreSQL-specific identifier quoting, parameter placeholders
//! and type tokens. PostgreSQL has a native token for every logical type.

use crate::core::identifier::{check_identifier_length, quote_double};
use crate::core::schema::LogicalType;
use crate::core::traits::Dialect;
use crate::error::{DdlError, Result};

/// PostgreSQL dialect implementation.
#[derive(Debug, Clone, Default)]
pub struct PostgresDialect;

impl PostgresDialect {
    /// Create a new PostgreSQL dialect instance.
    pub fn new() -> Self {
        Self
    }
}

impl Dialect for PostgresDialect {
    fn name(&self) -> &str {
        "postgres"
    }

    fn quote_ident(&self, name: &str) -> Result<String> {
        check_identifier_length(name, self.max_identifier_length())?;
        quote_double(name)
    }

    fn max_identifier_length(&self) -> usize {
        63
    }

    fn param_placeholder(&self, index: usize) -> String {
        format!("${}", index)
    }

    fn type_token(&self, logical_type: &LogicalType) -> Result<String> {
        let token = match logical_type {
            LogicalType::Boolean => "BOOLEAN".to_string(),
            // No unsigned tinyint; SMALLINT holds 0..=255.
            LogicalType::Byte | LogicalType::Int16 => "SMALLINT".to_string(),
            LogicalType::Int32 => "INTEGER".to_string(),
            LogicalType::Int64 => "BIGINT".to_string(),
            LogicalType::Float32 => "REAL".to_string(),
            LogicalType::Float64 => "DOUBLE PRECISION".to_string(),
            LogicalType::Decimal { precision, scale } => {
                format!("NUMERIC({},{})", precision, scale)
            }
            LogicalType::Char => "CHAR(1)".to_string(),
            LogicalType::String { max_length: None } => "TEXT".to_string(),
            LogicalType::String {
                max_length: Some(len),
            } => format!("VARCHAR({})", len),
            LogicalType::Timestamp => "TIMESTAMP".to_string(),
            LogicalType::Bytes => "BYTEA".to_string(),
            LogicalType::Uuid => "UUID".to_string(),
            LogicalType::Json => "JSONB".to_string(),
            LogicalType::Interval => "INTERVAL".to_string(),
        };
        Ok(token)
    }

    fn auto_type(&self, base: &LogicalType) -> Result<String> {
        if !base.is_integer() {
            return Err(DdlError::Schema(format!(
                "autonumber column must be an integer type, got {}",
                base
            )));
        }
        Ok(format!(
            "{} GENERATED BY DEFAULT AS IDENTITY",
            self.type_token(base)?
        ))
    }

    fn supports_sequences(&self) -> bool {
        true
    }
}
