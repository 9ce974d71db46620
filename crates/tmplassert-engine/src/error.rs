//! Error types for rendering and assertions

use std::{io, path::PathBuf};

use thiserror::Error;
use tmplassert_model::ModelError;

/// Result type for assertion operations
pub type AssertionResult<T> = Result<T, AssertionError>;

/// Errors raised while setting up, rendering or comparing
///
/// [`Mismatch`](AssertionError::Mismatch) and
/// [`NotContained`](AssertionError::NotContained) are the expected failures of a
/// broken generator; everything else is a setup or template defect.
#[derive(Debug, Error)]
pub enum AssertionError {
    /// Loading or resolving the model failed
    #[error(transparent)]
    Model(#[from] ModelError),

    /// An assertion ran before a template was selected
    #[error("No template selected; call with_template() first")]
    TemplateNotSelected,

    /// The selected template could not be read
    #[error("Failed to read template {}: {source}", path.display())]
    TemplateUnreadable {
        /// Template path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// The template engine rejected the template or the context
    #[error("Failed to render template {template}: {message}")]
    Render {
        /// Template reference
        template: String,
        /// Engine message
        message: String,
    },

    /// The expected output file could not be read
    #[error("Failed to read expected output {}: {source}", path.display())]
    ExpectedUnreadable {
        /// Expected file path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// A comment delimiter is empty or cannot be compiled
    #[error("Invalid comment delimiter: {0}")]
    InvalidCommentDelimiter(String),

    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// A supplemental value could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Rendered output differs from the expected file
    #[error(
        "Generated content does not match {}\n{diff}\n--- expected ---\n{expected}\n--- actual ---\n{actual}",
        expected_path.display()
    )]
    Mismatch {
        /// Expected file path
        expected_path: PathBuf,
        /// Normalized expected content
        expected: String,
        /// Normalized rendered content
        actual: String,
        /// Unified diff from expected to actual
        diff: String,
    },

    /// Rendered output does not contain the expected fragment
    #[error(
        "\n---\n{fragment}\n---\nThe above content should be included in the following generated code:\n---\n{actual}"
    )]
    NotContained {
        /// Normalized expected fragment
        fragment: String,
        /// Normalized rendered content
        actual: String,
    },
}

impl AssertionError {
    /// Whether this is a content mismatch rather than a setup or render defect
    pub fn is_assertion_failure(&self) -> bool {
        matches!(
            self,
            AssertionError::Mismatch { .. } | AssertionError::NotContained { .. }
        )
    }
}
