//! Index catalog error types.

use thiserror::Error;

/// Errors that can occur while reading the index catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The catalog source could not be read.
    #[error("Catalog read error: {0}")]
    ReadError(String),

    /// The catalog source was read but could not be parsed.
    #[error("Catalog parse error: {0}")]
    ParseError(String),

    /// The catalog backend is not available.
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),
}

impl CatalogError {
    /// Create a read error.
    pub fn read(msg: impl Into<String>) -> Self {
        Self::ReadError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create an unavailable error.
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}
