use std::fmt;

use sea_orm::DbErr;
use warp::http::StatusCode;

use crate::model::PostId;

#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    TomlError(String),
    InvalidValue(String),
    ResolveFailed(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::TomlError(e) => write!(f, "TOML parsing error: {}", e),
            ConfigError::InvalidValue(e) => write!(f, "Invalid configuration value: {}", e),
            ConfigError::ResolveFailed(e) => write!(f, "Cannot resolve listen address: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError(err)
    }
}

/// Failures surfaced by a [`Storage`](crate::storage::storage_trait::Storage) backend.
#[derive(Debug)]
pub enum StorageError {
    /// The backend could not be opened.
    ConnectionFailed(String),
    /// A lookup by id matched no row.
    NotFound(PostId),
    /// A statement failed to run; `operation` says which one.
    Query {
        operation: &'static str,
        source: DbErr,
    },
    /// The execution context was cancelled or its deadline passed.
    Cancelled,
}

impl StorageError {
    pub(crate) fn query(operation: &'static str) -> impl FnOnce(DbErr) -> StorageError {
        move |source| StorageError::Query { operation, source }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::ConnectionFailed(e) => write!(f, "Storage connection failed: {}", e),
            StorageError::NotFound(id) => write!(f, "record not found by id: {}", id),
            StorageError::Query { operation, source } => write!(f, "{}: {}", operation, source),
            StorageError::Cancelled => write!(f, "Storage operation cancelled"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Query { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum WebError {
    MissingId,
    Validation(String),
    MissingField(&'static str),
    Storage(StorageError),
    Bind(String),
}

impl WebError {
    /// HTTP status the client sees for this failure.
    pub fn status(&self) -> StatusCode {
        match self {
            WebError::MissingId | WebError::Validation(_) => StatusCode::NOT_FOUND,
            WebError::MissingField(_) => StatusCode::BAD_REQUEST,
            WebError::Storage(StorageError::NotFound(_)) => StatusCode::NOT_FOUND,
            WebError::Storage(StorageError::Cancelled) => StatusCode::SERVICE_UNAVAILABLE,
            WebError::Storage(_) | WebError::Bind(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WebError::MissingId => write!(f, "id not found in request"),
            WebError::Validation(e) => write!(f, "Invalid request: {}", e),
            WebError::MissingField(name) => write!(f, "Missing form field: {}", name),
            WebError::Storage(e) => write!(f, "Storage error: {}", e),
            WebError::Bind(e) => write!(f, "Cannot bind web server: {}", e),
        }
    }
}

impl std::error::Error for WebError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WebError::Storage(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StorageError> for WebError {
    fn from(err: StorageError) -> Self {
        WebError::Storage(err)
    }
}
