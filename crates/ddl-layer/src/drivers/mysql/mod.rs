//! MySQL/MariaDB driver.
//!
//! - [`MysqlDialect`]: SQL syntax strategy
//! - [`MysqlExecutor`]: sqlx query primitive, one connection per call
//! - [`MysqlDdlLayer`]: storage unit is a database on the server
//!
//! # Supported Versions
//!
//! - MySQL 5.7+, 8.0+
//! - MariaDB 10.2+

mod dialect;
mod executor;
mod layer;

pub use dialect::MysqlDialect;
pub use executor::MysqlExecutor;
pub use layer::MysqlDdlLayer;
