//! Error types for treeprobe
//!
//! Failures raised inside a test action are caught by the runner and turned
//! into a failing test result, so their messages end up verbatim in reports.
//! Keep them short and self-describing.

use std::io;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for treeprobe
#[derive(Error, Debug)]
pub enum Error {
    // === Resolution Errors ===
    #[error("Could not find component with a test hook of '{identifier}' after {wait_ms}ms")]
    ComponentNotFound { identifier: String, wait_ms: u64 },

    #[error("Component '{0}' was present, expected it to be absent")]
    ComponentPresent(String),

    // === Capability Errors ===
    #[error("Component '{0}' has no native component to measure. Hook it to a host view")]
    NoNativeComponent(String),

    #[error("Component '{identifier}' does not support {capability}")]
    MissingCapability {
        identifier: String,
        capability: &'static str,
    },

    // === Test Errors ===
    #[error("{0}")]
    TestFailed(String),

    #[error("Assertion failed: {0}")]
    Assertion(String),

    #[error("Test panicked: {0}")]
    Panicked(String),

    // === Host Errors ===
    #[error("Host reset failed: {0}")]
    HostReset(String),

    // === Reporting / Observer Errors ===
    #[error("Failed to connect to report observer at '{path}': {source}")]
    ObserverConnectionFailed {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Report transport error: {0}")]
    Transport(String),

    #[error("No report received within {0} seconds")]
    ObserverTimeout(u64),

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Internal Errors ===
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse classification of an [`Error`]
///
/// Interaction primitives branch on the kind rather than on individual
/// variants; absence of a component is the one kind `not_exists` treats as
/// success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The resolver gave up waiting for an identifier
    NotFound,
    /// The element lacks a capability the operation needs
    MissingCapability,
    /// A test condition evaluated false
    AssertionFailed,
    /// Anything else
    Other,
}

impl Error {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::ComponentNotFound { .. } => ErrorKind::NotFound,
            Error::NoNativeComponent(_) | Error::MissingCapability { .. } => {
                ErrorKind::MissingCapability
            }
            Error::TestFailed(_) | Error::Assertion(_) | Error::ComponentPresent(_) => {
                ErrorKind::AssertionFailed
            }
            Error::Panicked(_)
            | Error::HostReset(_)
            | Error::ObserverConnectionFailed { .. }
            | Error::Transport(_)
            | Error::ObserverTimeout(_)
            | Error::Config(_)
            | Error::ConfigParse(_)
            | Error::Io(_)
            | Error::FileRead { .. }
            | Error::Json(_)
            | Error::Internal(_) => ErrorKind::Other,
        }
    }

    /// Create a component not found error
    pub fn component_not_found(identifier: &str, wait_ms: u64) -> Self {
        Self::ComponentNotFound {
            identifier: identifier.to_string(),
            wait_ms,
        }
    }

    /// Create a missing capability error
    pub fn missing_capability(identifier: &str, capability: &'static str) -> Self {
        Self::MissingCapability {
            identifier: identifier.to_string(),
            capability,
        }
    }

    /// Create a test failure with the given message
    pub fn test_failed<S: Into<String>>(message: S) -> Self {
        Self::TestFailed(message.into())
    }
}
