/// Facade Error Module
///
/// This module defines the error type shared by every operation of the
/// facade. Driver failures are classified into connection and query errors;
/// misuse of the facade (querying before connecting, counting an empty
/// result) gets its own typed variant.
use thiserror::Error;

/// Error type for the database facade.
///
/// Nothing in the crate recovers from these locally. Every variant is
/// returned unchanged to the caller of the failing operation.
#[derive(Error, Debug)]
pub enum FacadeError {
    /// The driver could not establish a session (bad credentials,
    /// unreachable host, unknown database)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Statement preparation, execution or fetching failed (syntax,
    /// constraint violation, placeholder mismatch)
    #[error("Query error: {0}")]
    Query(String),

    /// A statement was issued before a session was opened
    #[error("Not connected: call connect() before running statements")]
    NotConnected,

    /// `count` was run against a statement that returned no rows
    #[error("Empty result: statement returned no rows: {0}")]
    EmptyResult(String),

    /// Configuration loading and validation errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File system and I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON rendering errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The state mutex was poisoned by a panicking thread
    #[error("Failed to acquire database lock")]
    Lock,
}

/// Type alias for Result to use FacadeError as the error type.
pub type Result<T> = std::result::Result<T, FacadeError>;
