//! Identifier validation and quoting for generated DDL.
//!
//! Catalog probes bind container and sequence names as parameters. DDL
//! statements (`CREATE TABLE`, `CREATE SCHEMA`, ...) cannot take identifiers
//! as parameters, so every identifier spliced into DDL goes through this
//! module:
//!
//! 1. Validate (non-empty, no null bytes, bounded length)
//! 2. Wrap in the dialect's quote characters
//! 3. Escape the closing quote character inside the name by doubling it

use crate::error::{DdlError, Result};

/// Default identifier length limit in bytes.
///
/// Dialects with a tighter limit override
/// [`Dialect::max_identifier_length`](crate::core::traits::Dialect::max_identifier_length):
/// - PostgreSQL: 63 bytes (longer names are silently truncated by the server)
/// - MySQL: 64 characters
/// - SQL Server: 128 characters
/// - SQLite: unlimited
pub const MAX_IDENTIFIER_LENGTH: usize = 128;

/// Validate an identifier before it is quoted into DDL.
///
/// # Errors
///
/// Returns `DdlError::Identifier` for empty names, names containing a null
/// byte, and names longer than 128 bytes.
pub fn validate_identifier(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(DdlError::Identifier(
            "Identifier cannot be empty".to_string(),
        ));
    }

    if name.contains('\0') {
        return Err(DdlError::Identifier(format!(
            "Identifier contains null byte: {:?}",
            name
        )));
    }

    check_identifier_length(name, MAX_IDENTIFIER_LENGTH)
}

/// Reject identifiers longer than `max_len` bytes.
pub fn check_identifier_length(name: &str, max_len: usize) -> Result<()> {
    if name.len() > max_len {
        return Err(DdlError::Identifier(format!(
            "Identifier exceeds maximum length of {} bytes (got {} bytes): {:?}",
            max_len,
            name.len(),
            name
        )));
    }
    Ok(())
}

/// Quote with ANSI double quotes (PostgreSQL, SQLite).
///
/// ```ignore
/// assert_eq!(quote_double("users")?, "\"users\"");
/// assert_eq!(quote_double("table\"name")?, "\"table\"\"name\"");
/// ```
pub fn quote_double(name: &str) -> Result<String> {
    validate_identifier(name)?;
    Ok(format!("\"{}\"", name.replace('"', "\"\"")))
}

/// Quote with backticks (MySQL/MariaDB).
///
/// ```ignore
/// assert_eq!(quote_backtick("users")?, "`users`");
/// ```
pub fn quote_backtick(name: &str) -> Result<String> {
    validate_identifier(name)?;
    Ok(format!("`{}`", name.replace('`', "``")))
}

/// Quote with square brackets (SQL Server).
///
/// ```ignore
/// assert_eq!(quote_bracket("table]name")?, "[table]]name]");
/// ```
pub fn quote_bracket(name: &str) -> Result<String> {
    validate_identifier(name)?;
    Ok(format!("[{}]", name.replace(']', "]]")))
}
