//! Error types for model loading and resolution

use std::{
    io,
    path::{Path, PathBuf},
};

use thiserror::Error;

/// Result type for model operations
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors that can occur while loading, merging or resolving a model
#[derive(Debug, Error)]
pub enum ModelError {
    /// A configured model file does not exist
    #[error("Model file not found: {}", path.display())]
    FileNotFound {
        /// Path of the missing file
        path: PathBuf,
    },

    /// A model file exists but could not be read
    #[error("Failed to read model file {}: {source}", path.display())]
    Unreadable {
        /// Path of the unreadable file
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// A model file could not be parsed
    #[error("Malformed model file {}:{line}: {message}", path.display())]
    Malformed {
        /// Path of the malformed file
        path: PathBuf,
        /// Line reported by the parser (0 when unknown)
        line: usize,
        /// Parser message
        message: String,
    },

    /// The execution context was used out of order
    #[error("Build sequence error: {0}")]
    BuildSequence(String),

    /// A resolver could not interpret a section it recognizes
    #[error("Resolver {resolver} failed on key '{key}': {message}")]
    Resolve {
        /// Name of the failing resolver
        resolver: String,
        /// Document key being resolved
        key: String,
        /// Error message
        message: String,
    },

    /// A discovery glob could not be compiled
    #[error("Invalid model file pattern '{pattern}': {message}")]
    InvalidPattern {
        /// The offending pattern
        pattern: String,
        /// Compiler message
        message: String,
    },

    /// Walking a model directory failed
    #[error("Model discovery failed under {}: {message}", root.display())]
    Discovery {
        /// Directory being walked
        root: PathBuf,
        /// Error message
        message: String,
    },

    /// A model entry could not be projected for rendering
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error outside of file loading
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl ModelError {
    /// Whether this error means a model file is missing, unreadable or malformed
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            ModelError::FileNotFound { .. }
                | ModelError::Unreadable { .. }
                | ModelError::Malformed { .. }
        )
    }

    /// The file this error is about, if any
    pub fn path(&self) -> Option<&Path> {
        match self {
            ModelError::FileNotFound { path }
            | ModelError::Unreadable { path, .. }
            | ModelError::Malformed { path, .. } => Some(path),
            _ => None,
        }
    }

    pub(crate) fn resolve(
        resolver: impl Into<String>,
        key: impl Into<String>,
        message: impl ToString,
    ) -> Self {
        ModelError::Resolve {
            resolver: resolver.into(),
            key: key.into(),
            message: message.to_string(),
        }
    }
}
