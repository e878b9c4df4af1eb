//! Schema descriptor types: tables, columns and logical column types.
//!
//! These types provide a backend-independent description of a container
//! (table). They are built by the caller and read by the DDL layer; nothing
//! in this crate mutates a descriptor while composing or executing DDL.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DdlError, Result};

/// Backend-independent column type.
///
/// Each dialect maps these onto its own type tokens. A dialect that has no
/// equivalent for a variant reports [`DdlError::UnsupportedType`] rather
/// than falling back to a default token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LogicalType {
    Boolean,
    /// Unsigned 8-bit integer.
    Byte,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    Decimal {
        precision: u8,
        scale: u8,
    },
    /// Single character.
    Char,
    /// Variable-length string, unbounded when `max_length` is `None`.
    String {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_length: Option<u32>,
    },
    Timestamp,
    /// Byte array.
    Bytes,
    Uuid,
    Json,
    Interval,
}

impl LogicalType {
    /// One representative of every logical type, used to enumerate dialect
    /// coverage.
    pub fn all() -> Vec<LogicalType> {
        vec![
            LogicalType::Boolean,
            LogicalType::Byte,
            LogicalType::Int16,
            LogicalType::Int32,
            LogicalType::Int64,
            LogicalType::Float32,
            LogicalType::Float64,
            LogicalType::Decimal {
                precision: 18,
                scale: 2,
            },
            LogicalType::Char,
            LogicalType::String { max_length: None },
            LogicalType::String {
                max_length: Some(255),
            },
            LogicalType::Timestamp,
            LogicalType::Bytes,
            LogicalType::Uuid,
            LogicalType::Json,
            LogicalType::Interval,
        ]
    }

    /// Whether this is an integer type usable as an autonumber base.
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            LogicalType::Byte | LogicalType::Int16 | LogicalType::Int32 | LogicalType::Int64
        )
    }
}

impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalType::Boolean => write!(f, "boolean"),
            LogicalType::Byte => write!(f, "byte"),
            LogicalType::Int16 => write!(f, "int16"),
            LogicalType::Int32 => write!(f, "int32"),
            LogicalType::Int64 => write!(f, "int64"),
            LogicalType::Float32 => write!(f, "float32"),
            LogicalType::Float64 => write!(f, "float64"),
            LogicalType::Decimal { precision, scale } => {
                write!(f, "decimal({},{})", precision, scale)
            }
            LogicalType::Char => write!(f, "char"),
            LogicalType::String { max_length: None } => write!(f, "string"),
            LogicalType::String {
                max_length: Some(len),
            } => write!(f, "string({})", len),
            LogicalType::Timestamp => write!(f, "timestamp"),
            LogicalType::Bytes => write!(f, "bytes"),
            LogicalType::Uuid => write!(f, "uuid"),
            LogicalType::Json => write!(f, "json"),
            LogicalType::Interval => write!(f, "interval"),
        }
    }
}

/// Column definition.
///
/// Deserialized columns get the same flag rules as the builder: an
/// autonumber column is a NOT NULL primary key, and so is any key column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ColumnDef")]
pub struct Column {
    /// Column name.
    pub name: String,

    /// Logical type of the column.
    #[serde(flatten)]
    pub logical_type: LogicalType,

    /// Whether the column accepts NULL. Primary key columns never do.
    pub is_nullable: bool,

    /// Whether the column is part of the primary key.
    pub is_primary_key: bool,

    /// Whether the backend generates the value (auto-increment / identity).
    pub is_autonumber: bool,
}

/// Column as written in configuration files.
#[derive(Deserialize)]
struct ColumnDef {
    name: String,
    #[serde(flatten)]
    logical_type: LogicalType,
    #[serde(default = "default_true")]
    is_nullable: bool,
    #[serde(default, alias = "primary_key")]
    is_primary_key: bool,
    #[serde(default, alias = "autonumber")]
    is_autonumber: bool,
}

fn default_true() -> bool {
    true
}

impl From<ColumnDef> for Column {
    fn from(def: ColumnDef) -> Self {
        let mut column = Column::new(def.name, def.logical_type);
        if !def.is_nullable {
            column = column.not_null();
        }
        if def.is_autonumber {
            column = column.autonumber();
        } else if def.is_primary_key {
            column = column.primary_key();
        }
        column
    }
}

impl Column {
    /// Create a nullable, non-key column.
    pub fn new(name: impl Into<String>, logical_type: LogicalType) -> Self {
        Self {
            name: name.into(),
            logical_type,
            is_nullable: true,
            is_primary_key: false,
            is_autonumber: false,
        }
    }

    /// Mark the column NOT NULL.
    pub fn not_null(mut self) -> Self {
        self.is_nullable = false;
        self
    }

    /// Mark the column as (part of) the primary key.
    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self.is_nullable = false;
        self
    }

    /// Mark the column as a generated primary key.
    pub fn autonumber(mut self) -> Self {
        self.is_autonumber = true;
        self.primary_key()
    }
}

/// Table (container) metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Table name, unqualified. The backend decides the namespace.
    pub name: String,

    /// Column definitions, in DDL order.
    pub columns: Vec<Column>,
}

impl Table {
    /// Create a table with no columns.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Append a column.
    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Primary key columns in declaration order.
    pub fn primary_key_columns(&self) -> Vec<&Column> {
        self.columns.iter().filter(|c| c.is_primary_key).collect()
    }

    /// The autonumber column, if any.
    pub fn autonumber_column(&self) -> Option<&Column> {
        self.columns.iter().find(|c| c.is_autonumber)
    }

    /// Check the descriptor is composable into DDL.
    ///
    /// An autonumber column must be the table's only primary key column;
    /// every supported backend ties generated values to a single-column key.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(DdlError::Schema("table name cannot be empty".into()));
        }
        if self.columns.is_empty() {
            return Err(DdlError::Schema(format!(
                "table '{}' has no columns",
                self.name
            )));
        }

        let mut seen = HashSet::new();
        for col in &self.columns {
            if col.name.trim().is_empty() {
                return Err(DdlError::Schema(format!(
                    "table '{}' has a column with an empty name",
                    self.name
                )));
            }
            if !seen.insert(col.name.to_lowercase()) {
                return Err(DdlError::Schema(format!(
                    "table '{}' declares column '{}' more than once",
                    self.name, col.name
                )));
            }
        }

        let autonumbers: Vec<&Column> = self.columns.iter().filter(|c| c.is_autonumber).collect();
        if autonumbers.len() > 1 {
            return Err(DdlError::Schema(format!(
                "table '{}' has {} autonumber columns, at most one is allowed",
                self.name,
                autonumbers.len()
            )));
        }
        if let Some(auto) = autonumbers.first() {
            let pk = self.primary_key_columns();
            if !auto.is_primary_key || pk.len() != 1 {
                return Err(DdlError::Schema(format!(
                    "autonumber column '{}' must be the only primary key column of '{}'",
                    auto.name, self.name
                )));
            }
        }

        Ok(())
    }
}
