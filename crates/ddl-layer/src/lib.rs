//! # ddl-layer
//!
//! Backend-agnostic schema management for relational databases.
//!
//! One contract ([`DdlLayer`]) covers what a data-access layer needs before
//! it can store anything:
//!
//! - **Type tokens**: logical column types mapped onto each dialect's DDL
//! - **Existence probes**: is the table, sequence or storage unit there?
//! - **Storage units**: create and delete the outermost container
//!   (a file, a schema, or a database depending on the backend)
//! - **Containers**: compose and run CREATE/DROP TABLE from a descriptor
//!
//! Backends: SQLite, PostgreSQL, MySQL/MariaDB and SQL Server.
//!
//! ## Example
//!
//! ```rust,no_run
//! use ddl_layer::{Column, ConnectionIdentity, DdlLayer, DriverCatalog, LogicalType, Table};
//!
//! #[tokio::main]
//! async fn main() -> ddl_layer::Result<()> {
//!     let catalog = DriverCatalog::with_builtins();
//!     let layer = catalog.create_layer(&ConnectionIdentity::sqlite("inventory.db"))?;
//!
//!     if layer.storage_unit_missing().await? {
//!         layer.create_storage_unit().await?;
//!     }
//!
//!     let items = Table::new("Items")
//!         .column(Column::new("Id", LogicalType::Int64).autonumber())
//!         .column(Column::new("Payload", LogicalType::Bytes));
//!     if layer.container_missing(&items).await? {
//!         layer.create_container(&items).await?;
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod drivers;
pub mod error;

// Re-exports for convenient access
pub use crate::config::{Config, ConnectionConfig};
pub use crate::core::{
    BackendKind, Column, ConnectionIdentity, DdlLayer, Dialect, DriverCatalog, Location,
    LogicalType, QueryExecutor, ServerLocation, Table,
};
pub use drivers::DialectImpl;
pub use error::{DdlError, Result};
