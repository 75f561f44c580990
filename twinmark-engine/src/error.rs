//! Error types for handler registration and format operations

use thiserror::Error;

/// Errors raised while configuring a [`HandlerRegistry`](crate::registry::HandlerRegistry).
///
/// Registration is the only fallible operation of the Markdown engine: parsing, serialization and
/// history operations degrade gracefully instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// The handler was registered with an empty (or whitespace-only) name
    #[error("Handler must have a non-empty name")]
    MissingName,
    /// A handler with the same name is already registered
    #[error("Handler '{0}' is already registered")]
    DuplicateName(String),
}

/// Errors that can occur during format operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Format not found in registry
    #[error("Format '{0}' not found")]
    FormatNotFound(String),
    /// Error during parsing
    #[error("Parse error: {0}")]
    ParseError(String),
    /// Error during serialization
    #[error("Serialization error: {0}")]
    SerializationError(String),
    /// Format does not support the requested direction
    #[error("Operation not supported: {0}")]
    NotSupported(String),
}
