//! Error types for the router.
//!
//! This module provides an opaque `Error` struct paired with an `ErrorKind` enum,
//! following the `std::io::Error` pattern. Internal error sources can change
//! without breaking consumers, who match on [`Error::kind()`].
//!
//! Routing configuration mistakes (an invalid path, a handler with an unusable
//! arity) are never reported as errors: the registration is simply declined.
//! Errors are reserved for handler failures, control-flow violations inside the
//! stack, and configuration files that cannot be loaded.
//!
//! # Example
//!
//! ```rust
//! use edge_router::{Error, ErrorKind};
//!
//! let error = Error::handler("upstream lookup failed");
//!
//! match error.kind() {
//!     ErrorKind::Handler => println!("Handler error: {}", error),
//!     ErrorKind::ControlFlow => println!("Stack misuse: {}", error),
//!     _ => println!("Other error: {}", error),
//! }
//!
//! use http::StatusCode;
//! assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
//! ```

use http::StatusCode;
use std::fmt;
use thiserror::Error;

/// The kind of error that occurred.
///
/// This enum is marked `#[non_exhaustive]`, so new variants may be added
/// without breaking existing code. Always include a wildcard arm when matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A route, resource, middleware or fallback handler failed.
    #[error("handler error")]
    Handler,

    /// A handler used the stack continuation in a way the driver does not allow,
    /// such as calling `next()` from an asynchronous stage.
    #[error("control flow violation")]
    ControlFlow,

    /// Configuration error (invalid TOML, invalid prefix, missing values).
    #[error("configuration error")]
    Configuration,

    /// I/O error (reading configuration files).
    #[error("I/O error")]
    Io,

    /// Invalid input (malformed event envelope or request data).
    #[error("invalid input")]
    InvalidInput,

    /// A value could not be serialized into a response body.
    #[error("serialization error")]
    Serialization,
}

/// An error that can occur while configuring or executing a router.
///
/// Use [`Error::kind()`] to determine the category of error for matching,
/// and the `Display` implementation to get a human-readable message.
///
/// ```rust
/// use edge_router::{Error, ErrorKind};
///
/// let err = Error::handler("database unavailable");
/// let err = Error::config("prefix must start with '/'");
///
/// let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
/// let err = Error::new(ErrorKind::Io, io_err);
/// assert_eq!(err.kind(), ErrorKind::Io);
/// ```
pub struct Error {
    kind: ErrorKind,
    source: Box<dyn std::error::Error + Send + Sync + 'static>,
}

impl Error {
    /// Creates a new error with the given kind and source.
    pub fn new<E>(kind: ErrorKind, error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        Self {
            kind,
            source: error.into(),
        }
    }

    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns a stable identifier for this error, suitable for logs and
    /// for adapters that render error payloads.
    pub fn error_code(&self) -> &'static str {
        match self.kind {
            ErrorKind::Handler => "HANDLER_ERROR",
            ErrorKind::ControlFlow => "CONTROL_FLOW_VIOLATION",
            ErrorKind::Configuration => "CONFIG_ERROR",
            ErrorKind::Io => "IO_ERROR",
            ErrorKind::InvalidInput => "INVALID_INPUT",
            ErrorKind::Serialization => "SERIALIZATION_ERROR",
        }
    }

    /// Returns the HTTP status code an adapter should use if it chooses to turn
    /// this error into a response. The router itself never does so.
    pub fn status_code(&self) -> StatusCode {
        match self.kind {
            ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Consumes the error and returns the inner error source.
    pub fn into_inner(self) -> Box<dyn std::error::Error + Send + Sync + 'static> {
        self.source
    }
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl Error {
    /// Creates a handler error.
    pub fn handler(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Handler, msg.into())
    }

    /// Creates a control flow violation error.
    pub fn control_flow(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::ControlFlow, msg.into())
    }

    /// Creates a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, msg.into())
    }

    /// Creates an I/O error from a message.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io, msg.into())
    }

    /// Creates an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, msg.into())
    }

    /// Creates a serialization error wrapping the underlying serializer failure.
    pub fn serialization<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        Self::new(ErrorKind::Serialization, err)
    }
}

// ============================================================================
// Trait implementations
// ============================================================================

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Error")
            .field("kind", &self.kind)
            .field("source", &self.source)
            .finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&*self.source)
    }
}

// ============================================================================
// From implementations
// ============================================================================

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::new(ErrorKind::Io, err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::new(ErrorKind::Configuration, err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        let kind = if err.is_io() {
            ErrorKind::Io
        } else {
            ErrorKind::InvalidInput
        };
        Self::new(kind, err)
    }
}

impl From<std::env::VarError> for Error {
    fn from(err: std::env::VarError) -> Self {
        Self::new(ErrorKind::Configuration, err)
    }
}

// ============================================================================
// Tests
// ============================================================================
