//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Malformed input record: {line:?}")]
    MalformedRecord { line: String },

    #[error("Failed to read manifest {path}: {message}")]
    ManifestRead { path: String, message: String },

    #[error("Failed to read version catalog {path}: {message}")]
    CatalogRead { path: String, message: String },

    #[error("Failed to serialize JSON: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
