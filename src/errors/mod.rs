//! # Error Handling
//!
//! Error taxonomy for the Lockbox secret store, defined with `thiserror`.
//! Caller-facing kinds (`Unauthorized`, `NotFound`, `Expired`, `Validation`)
//! surface directly with no retry; `CorruptEnvelope` is an internal-fault
//! signal and is logged where it is raised.

/// Custom result type for Lockbox operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the Lockbox secret store
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Caller's scopes do not satisfy the required scope for an operation
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// No record exists for the requested name
    #[error("{0}")]
    NotFound(String),

    /// Record exists but has passed its expiration and is not yet purged
    #[error("{0}")]
    Expired(String),

    /// Malformed caller input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Storage returned a record the codec cannot decode. Indicates a bug
    /// or storage tampering, never caller misuse.
    #[error("Corrupt envelope: {0}")]
    CorruptEnvelope(String),

    /// Database and storage errors
    #[error("Database error: {context}")]
    Database {
        #[source]
        source: sqlx::Error,
        context: String,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new unauthorized error
    pub fn unauthorized<S: Into<String>>(message: S) -> Self {
        Self::Unauthorized(message.into())
    }

    /// Create a new not-found error
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a new expired error
    pub fn expired<S: Into<String>>(message: S) -> Self {
        Self::Expired(message.into())
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    /// Create a new corrupt-envelope error
    pub fn corrupt_envelope<S: Into<String>>(message: S) -> Self {
        Self::CorruptEnvelope(message.into())
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Get the HTTP status code that should be returned for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Unauthorized(_) => 403,
            Error::NotFound(_) => 404,
            Error::Expired(_) => 410,
            Error::Validation(_) => 400,
            Error::CorruptEnvelope(_) => 500,
            Error::Database { .. } => 500,
            Error::Config(_) => 500,
            Error::Io(_) => 500,
            Error::Internal(_) => 500,
        }
    }
}
