//! Application error types.
//!
//! All errors use `thiserror` for automatic Error trait derivation. Each variant
//! belongs to one [`ErrorKind`], which decides whether it aborts startup or is
//! reported back to the agent as a tool-error result.

use thiserror::Error;

/// Application result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Broad classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad startup configuration. Fatal: the process must not start serving.
    Configuration,
    /// Bad input to a single tool call. Reported to the agent; session continues.
    Invocation,
    /// A wrapped remote call failed. Reported to the agent; never retried here.
    Collaborator,
    /// Serialization or I/O failure inside this crate.
    Internal,
}

/// Main error enum for the toolsets core.
#[derive(Error, Debug)]
pub enum Error {
    /// Unknown toolset at startup, duplicate registration, invalid config.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A required argument was not supplied.
    #[error("missing required parameter: {0}")]
    MissingParameter(String),

    /// An argument was supplied with the wrong JSON type.
    #[error("parameter {name} is not of type {expected}")]
    WrongType {
        name: String,
        expected: &'static str,
    },

    /// A required string argument was supplied as `""`.
    #[error("parameter {0} must not be empty")]
    EmptyValue(String),

    /// Unknown toolset or tool name at runtime.
    #[error("not found: {0}")]
    NotFound(String),

    /// The remote collaborator behind a tool handler failed.
    #[error("{0}")]
    Collaborator(String),

    /// Serialization/deserialization errors.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Configuration(_) => ErrorKind::Configuration,
            Error::MissingParameter(_)
            | Error::WrongType { .. }
            | Error::EmptyValue(_)
            | Error::NotFound(_) => ErrorKind::Invocation,
            Error::Collaborator(_) => ErrorKind::Collaborator,
            Error::Serialization(_) | Error::Io(_) => ErrorKind::Internal,
        }
    }

    /// Whether the session can keep going after this error.
    pub fn is_recoverable(&self) -> bool {
        self.kind() != ErrorKind::Configuration
    }

    /// Stable error code for structured tool-error payloads.
    pub fn to_error_code(&self) -> &'static str {
        match self {
            Error::Configuration(_) => "FAILED_PRECONDITION",
            Error::MissingParameter(_) | Error::WrongType { .. } | Error::EmptyValue(_) => {
                "INVALID_ARGUMENT"
            }
            Error::NotFound(_) => "NOT_FOUND",
            Error::Collaborator(_) => "UNAVAILABLE",
            Error::Serialization(_) | Error::Io(_) => "INTERNAL",
        }
    }
}

// Convenience constructors
impl Error {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn missing_parameter(name: impl Into<String>) -> Self {
        Self::MissingParameter(name.into())
    }

    pub fn wrong_type(name: impl Into<String>, expected: &'static str) -> Self {
        Self::WrongType {
            name: name.into(),
            expected,
        }
    }

    pub fn empty_value(name: impl Into<String>) -> Self {
        Self::EmptyValue(name.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn collaborator(msg: impl Into<String>) -> Self {
        Self::Collaborator(msg.into())
    }
}
