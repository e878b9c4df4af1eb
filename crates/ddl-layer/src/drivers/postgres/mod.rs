//! PostgreSQL driver.
//!
//! - [`PostgresDialect`]: SQL syntax strategy for PostgreSQL
//! - [`PostgresExecutor`]: tokio-postgres query primitive, one connection per call
//! - [`PostgresDdlLayer`]: storage unit is a schema inside the database

mod dialect;
mod executor;
mod layer;

pub use dialect::PostgresDialect;
pub use executor::PostgresExecutor;
pub use layer::PostgresDdlLayer;
