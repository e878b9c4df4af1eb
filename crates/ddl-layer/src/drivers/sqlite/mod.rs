//! SQLite driver.
//!
//! - [`SqliteDialect`]: SQL syntax strategy for SQLite
//! - [`SqliteExecutor`]: sqlx-backed query primitive, one connection per call
//! - [`SqliteDdlLayer`]: storage unit is the database file itself

mod dialect;
mod executor;
mod layer;

pub use dialect::SqliteDialect;
pub use executor::SqliteExecutor;
pub use layer::SqliteDdlLayer;
