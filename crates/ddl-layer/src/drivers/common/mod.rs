//! Utilities shared across database drivers.
//!
//! - [`tls`]: TLS mode parsing and rustls configuration

pub mod tls;

pub use tls::{SslMode, TlsBuilder};
