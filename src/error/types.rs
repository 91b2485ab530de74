//! Error types
//!
//! Defines domain-specific error types for each module of the file server.

use std::fmt;
use std::io;

use crate::storage::EntryKind;

/// Storage module errors
#[derive(Debug)]
pub enum StorageError {
    /// The resolved location would leave the storage root.
    Confinement(String),
    NotFound(String),
    WrongKind { path: String, expected: EntryKind },
    InvalidInput(String),
    Fault(io::Error),
}

impl StorageError {
    /// Maps an I/O error raised while touching `path`, keeping a vanished
    /// target distinguishable from a real fault.
    pub fn from_io(error: io::Error, path: &str) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::NotADirectory => {
                StorageError::NotFound(path.to_string())
            }
            _ => StorageError::Fault(error),
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Confinement(p) => write!(f, "Path escapes storage root: {}", p),
            StorageError::NotFound(p) => write!(f, "Not found: {}", p),
            StorageError::WrongKind {
                path,
                expected: EntryKind::File,
            } => write!(f, "Not a file: {}", path),
            StorageError::WrongKind {
                path,
                expected: EntryKind::Directory,
            } => write!(f, "Not a directory: {}", path),
            StorageError::InvalidInput(s) => write!(f, "Invalid input: {}", s),
            StorageError::Fault(e) => write!(f, "Storage failure: {}", e),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Fault(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for StorageError {
    fn from(error: io::Error) -> Self {
        StorageError::Fault(error)
    }
}

/// Authentication module errors
#[derive(Debug)]
pub enum AuthError {
    MissingCredentials,
    InvalidCredentials(String),
    MissingToken,
    InvalidToken(String),
    TokenSigning(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::MissingCredentials => write!(f, "Missing credentials"),
            AuthError::InvalidCredentials(_) => write!(f, "Invalid credentials"),
            AuthError::MissingToken => write!(f, "Authorization token required"),
            AuthError::InvalidToken(_) => write!(f, "Invalid or expired token"),
            AuthError::TokenSigning(_) => write!(f, "Could not generate token"),
        }
    }
}

impl std::error::Error for AuthError {}

/// Errors surfaced by the HTTP layer
#[derive(Debug)]
pub enum ApiError {
    Storage(StorageError),
    Auth(AuthError),
    /// The request itself is malformed (missing multipart field, bad body, ...).
    BadRequest(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Storage(e) => write!(f, "{}", e),
            ApiError::Auth(e) => write!(f, "{}", e),
            ApiError::BadRequest(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<StorageError> for ApiError {
    fn from(error: StorageError) -> Self {
        ApiError::Storage(error)
    }
}

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        ApiError::Auth(error)
    }
}

/// Startup failures that abort the server
#[derive(Debug)]
pub enum ServerError {
    Config(config::ConfigError),
    Storage(StorageError),
    IoError(io::Error),
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::Config(e) => write!(f, "Configuration error: {}", e),
            ServerError::Storage(e) => write!(f, "Storage root error: {}", e),
            ServerError::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for ServerError {}

impl From<config::ConfigError> for ServerError {
    fn from(error: config::ConfigError) -> Self {
        ServerError::Config(error)
    }
}

impl From<StorageError> for ServerError {
    fn from(error: StorageError) -> Self {
        ServerError::Storage(error)
    }
}

impl From<io::Error> for ServerError {
    fn from(error: io::Error) -> Self {
        ServerError::IoError(error)
    }
}
