//! Error types for crudforge

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias for crudforge operations
pub type Result<T> = std::result::Result<T, CodegenError>;

/// Errors that can occur during generation, patching or cleanup
#[derive(Error, Debug)]
pub enum CodegenError {
    /// The table exists but cannot be generated (e.g. it has no columns)
    #[error("{0}")]
    SchemaError(String),

    #[error("Schema discovery failed: {0}")]
    Discovery(String),

    #[error("Invalid table name: {0}")]
    InvalidTableName(String),

    #[error("IO error on {}: {source}", path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Anchor `{anchor}` not found in {}", file.display())]
    PatchAnchorNotFound { file: PathBuf, anchor: String },

    /// Two tables in one run resolve to the same output file
    #[error("{} is already generated for table {owner}", path.display())]
    PathCollision { path: PathBuf, owner: String },

    #[error("Failed to parse SQL schema: {0}")]
    ParseError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl CodegenError {
    /// Attach a path to an IO error
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        CodegenError::IoError {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Errors that only affect a single table or file.
    ///
    /// The orchestrator records these and keeps going; anything else aborts
    /// the whole batch.
    pub fn is_table_scoped(&self) -> bool {
        matches!(
            self,
            CodegenError::SchemaError(_)
                | CodegenError::Discovery(_)
                | CodegenError::InvalidTableName(_)
                | CodegenError::IoError { .. }
                | CodegenError::PatchAnchorNotFound { .. }
                | CodegenError::PathCollision { .. }
        )
    }
}

impl From<std::io::Error> for CodegenError {
    fn from(err: std::io::Error) -> Self {
        CodegenError::IoError {
            path: PathBuf::new(),
            source: err,
        }
    }
}

impl From<sqlparser::parser::ParserError> for CodegenError {
    fn from(err: sqlparser::parser::ParserError) -> Self {
        CodegenError::ParseError(err.to_string())
    }
}

impl From<config::ConfigError> for CodegenError {
    fn from(err: config::ConfigError) -> Self {
        CodegenError::ConfigError(err.to_string())
    }
}

impl From<serde_json::Error> for CodegenError {
    fn from(err: serde_json::Error) -> Self {
        CodegenError::ConfigError(err.to_string())
    }
}
