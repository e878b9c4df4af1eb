//! MySQL/MariaDB SQL dialect (Strategy pattern).
//!
//! Provides MySQL-specific identifier quoting, parameter placeholders and
//! type tokens. Tables are created as InnoDB with utf8mb4 so string columns
//! hold the full Unicode range.

use crate::core::identifier::{check_identifier_length, quote_backtick};
use crate::core::schema::LogicalType;
use crate::core::traits::Dialect;
use crate::error::{DdlError, Result};

/// MySQL/MariaDB dialect implementation.
#[derive(Debug, Clone, Default)]
pub struct MysqlDialect;

impl MysqlDialect {
    /// Create a new MySQL dialect instance.
    pub fn new() -> Self {
        Self
    }
}

impl Dialect for MysqlDialect {
    fn name(&self) -> &str {
        "mysql"
    }

    fn quote_ident(&self, name: &str) -> Result<String> {
        check_identifier_length(name, self.max_identifier_length())?;
        quote_backtick(name)
    }

    fn max_identifier_length(&self) -> usize {
        64
    }

    fn param_placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn type_token(&self, logical_type: &LogicalType) -> Result<String> {
        let token = match logical_type {
            LogicalType::Boolean => "TINYINT(1)".to_string(),
            LogicalType::Byte => "TINYINT UNSIGNED".to_string(),
            LogicalType::Int16 => "SMALLINT".to_string(),
            LogicalType::Int32 => "INT".to_string(),
            LogicalType::Int64 => "BIGINT".to_string(),
            LogicalType::Float32 => "FLOAT".to_string(),
            LogicalType::Float64 => "DOUBLE".to_string(),
            LogicalType::Decimal { precision, scale } => {
                format!("DECIMAL({},{})", precision, scale)
            }
            LogicalType::Char => "CHAR(1)".to_string(),
            LogicalType::String { max_length: None } => "LONGTEXT".to_string(),
            LogicalType::String {
                max_length: Some(len),
            } => format!("VARCHAR({})", len),
            LogicalType::Timestamp => "DATETIME".to_string(),
            LogicalType::Bytes => "LONGBLOB".to_string(),
            LogicalType::Uuid => "CHAR(36)".to_string(),
            LogicalType::Json => "JSON".to_string(),
            LogicalType::Interval => {
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
        Ok(format!("{} AUTO_INCREMENT", self.type_token(base)?))
    }

    fn supports_sequences(&self) -> bool {
        false
    }

    fn table_options(&self) -> Option<&str> {
        Some("ENGINE=InnoDB DEFAULT CHARSET=utf8mb4")
    }
}
