//! MSSQL SQL dialect (Strategy pattern).
//!
//! Provides MSSQL-specific identifier quoting, parameter placeholders and
//! type tokens. String types are Unicode (`NCHAR`/`NVARCHAR`).

use crate::core::identifier::quote_bracket;
use crate::core::schema::LogicalType;
use crate::core::traits::Dialect;
use crate::error::{DdlError, Result};

/// Longest NVARCHAR that can be declared with an explicit length.
const MAX_NVARCHAR_LENGTH: u32 = 4000;

/// Microsoft SQL Server dialect implementation.
#[derive(Debug, Clone, Default)]
pub struct MssqlDialect;

impl MssqlDialect {
    /// Create a new MSSQL dialect instance.
    pub fn new() -> Self {
        Self
    }
}

impl Dialect for MssqlDialect {
    fn name(&self) -> &str {
        "mssql"
    }

    fn quote_ident(&self, name: &str) -> Result<String> {
        quote_bracket(name)
    }

    fn param_placeholder(&self, index: usize) -> String {
        format!("@P{}", index)
    }

    fn type_token(&self, logical_type: &LogicalType) -> Result<String> {
        let token = match logical_type {
            LogicalType::Boolean => "BIT".to_string(),
            LogicalType::Byte => "TINYINT".to_string(),
            LogicalType::Int16 => "SMALLINT".to_string(),
            LogicalType::Int32 => "INT".to_string(),
            LogicalType::Int64 => "BIGINT".to_string(),
            LogicalType::Float32 => "REAL".to_string(),
            LogicalType::Float64 => "FLOAT".to_string(),
            LogicalType::Decimal { precision, scale } => {
                format!("DECIMAL({},{})", precision, scale)
            }
            LogicalType::Char => "NCHAR(1)".to_string(),
            LogicalType::String {
                max_length: Some(len),
            } if *len <= MAX_NVARCHAR_LENGTH => format!("NVARCHAR({})", len),
            LogicalType::String { .. } => "NVARCHAR(MAX)".to_string(),
            LogicalType::Timestamp => "DATETIME2".to_string(),
            LogicalType::Bytes => "VARBINARY(MAX)".to_string(),
            LogicalType::Uuid => "UNIQUEIDENTIFIER".to_string(),
            LogicalType::Json | LogicalType::Interval => {
                return Err(DdlError::unsupported_type(self.name(), *logical_type));
            }
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
        Ok(format!("{} IDENTITY(1,1)", self.type_token(base)?))
    }

    fn supports_sequences(&self) -> bool {
        true
    }
}
