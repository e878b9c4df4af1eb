//! Core abstractions for backend-agnostic schema management.
//!
//! This module provides the foundational types and traits used throughout
//! the crate:
//!
//! - [`schema`]: Table, column and logical type descriptors
//! - [`connection`]: Backend kind and storage-unit location
//! - [`identifier`]: Identifier validation and quoting
//! - [`traits`]: Query executor, dialect and DDL layer contracts
//! - [`catalog`]: Driver registry for dependency injection
//!
//! # Architecture
//!
//! The core module defines backend-independent contracts that are implemented
//! by driver modules (`drivers/sqlite`, `drivers/postgres`, etc.). Generic
//! orchestration (statement composition, container create/drop) lives in
//! provided trait methods, so a driver only supplies dialect specifics.

pub mod catalog;
pub mod connection;
pub mod identifier;
pub mod schema;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;

pub use catalog::DriverCatalog;
pub use connection::{BackendKind, ConnectionIdentity, Location, ServerLocation};
pub use schema::{Column, LogicalType, Table};
pub use traits::{DdlLayer, Dialect, QueryExecutor};
