//! Configuration validation.

use std::collections::HashSet;

use super::Config;
use crate::core::traits::Dialect;
use crate::drivers::{DialectImpl, SslMode};
use crate::error::{DdlError, Result};

/// Validate the configuration.
pub fn validate(config: &Config) -> Result<()> {
    let conn = &config.connection;
    let kind = conn.kind()?;

    if kind.is_file_based() {
        match &conn.path {
            Some(path) if !path.as_os_str().is_empty() => {}
            _ => {
                return Err(DdlError::Config(format!(
                    "connection.path is required for {}",
                    kind
                )))
            }
        }
    } else {
        if conn.host.is_empty() {
            return Err(DdlError::Config("connection.host is required".into()));
        }
        if conn.database.is_empty() {
            return Err(DdlError::Config("connection.database is required".into()));
        }
        if conn.user.is_empty() {
            return Err(DdlError::Config("connection.user is required".into()));
        }
        if let Some(0) = conn.port {
            return Err(DdlError::Config(
                "connection.port must be between 1 and 65535".into(),
            ));
        }
        SslMode::parse(&conn.ssl_mode)?;
    }

    // Descriptors must be composable for this backend before anything runs.
    let dialect = DialectImpl::from_kind(kind);
    let mut names = HashSet::new();
    for table in &config.tables {
        if !names.insert(table.name.to_lowercase()) {
            return Err(DdlError::Config(format!(
                "table '{}' is declared more than once",
                table.name
            )));
        }
        dialect.build_create_table(&dialect.quote_ident(&table.name)?, table)?;
    }

    Ok(())
}
