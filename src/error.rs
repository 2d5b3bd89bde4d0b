//! Error types for proxima.

use thiserror::Error;

/// Errors that can occur while configuring or building an index.
///
/// Searches themselves are infallible: a query always terminates with a
/// well-defined (possibly empty) result. Internal invariant violations
/// indicate bugs and panic instead of returning a variant here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    /// A parameter the method requires was absent from the bag.
    #[error("missing required parameter: {0}")]
    MissingParameter(String),

    /// A parameter was present but its value could not be interpreted.
    #[error("invalid value '{value}' for parameter {name}")]
    InvalidParameter { name: String, value: String },

    /// No index family is registered under this name.
    #[error("unknown method: {0}")]
    UnknownMethod(String),

    /// No distance space is registered under this name.
    #[error("unknown space: {0}")]
    UnknownSpace(String),

    /// A method or space name was registered twice.
    #[error("already registered: {0}")]
    DuplicateRegistration(String),

    /// Other error (for extensibility).
    #[error("{0}")]
    Other(String),
}

/// Result type alias for proxima operations.
pub type Result<T> = std::result::Result<T, IndexError>;
