//! Microsoft SQL Server driver.
//!
//! - [`MssqlDialect`]: SQL syntax strategy for MSSQL
//! - [`MssqlExecutor`]: Tiberius query primitive, one connection per call
//! - [`MssqlDdlLayer`]: storage unit is a database; tables live in a schema
//!   inside it (`dbo` by default)

mod dialect;
mod executor;
mod layer;

pub use dialect::MssqlDialect;
pub use executor::MssqlExecutor;
pub use layer::MssqlDdlLayer;
