//! Harness configuration
//!
//! Settings are layered: serde defaults, then an optional file (format chosen by
//! extension), then `TMPLASSERT_*` environment variables.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tmplassert_model::{DEFAULT_MODEL_GLOB, DEFAULT_SCRATCH_PREFIX};
use tracing::debug;

use crate::{
    error::{AssertionError, AssertionResult},
    logging,
    normalizer::CommentDelimiter,
};

/// Environment variable prefix
pub const ENV_PREFIX: &str = "TMPLASSERT";

/// Project-wide model file prepended to every model when present
pub const DEFAULT_PROJECT_MODEL_FILE: &str = "module.yml";

/// Settings shared by every assertion built from them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Glob used by `with_model_dir` when none is given
    pub model_glob: String,
    /// Model file loaded ahead of the explicit ones if it exists
    pub project_model_file: Option<PathBuf>,
    /// Comment spans removed before comparison
    pub comment_delimiters: Vec<CommentDelimiter>,
    /// Fail rendering on missing fields
    pub strict_templates: bool,
    /// File name prefix for inline model text
    pub scratch_prefix: String,
    /// Level for `logging::init_test_logging`
    pub log_level: String,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            model_glob: DEFAULT_MODEL_GLOB.to_string(),
            project_model_file: Some(PathBuf::from(DEFAULT_PROJECT_MODEL_FILE)),
            comment_delimiters: vec![CommentDelimiter::doc_block()],
            strict_templates: false,
            scratch_prefix: DEFAULT_SCRATCH_PREFIX.to_string(),
            log_level: "warn".to_string(),
        }
    }
}

impl HarnessConfig {
    /// Load configuration from an optional file and the environment
    ///
    /// A missing file is not an error; the defaults apply.
    pub fn load(path: Option<&Path>) -> AssertionResult<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            debug!("Loading harness configuration from {}", path.display());
            builder = builder.add_source(File::from(path.to_path_buf()).required(false));
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let config: HarnessConfig = builder
            .build()
            .and_then(Config::try_deserialize)
            .map_err(|e| AssertionError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the settings are usable
    pub fn validate(&self) -> AssertionResult<()> {
        if self.model_glob.trim().is_empty() {
            return Err(AssertionError::Config(
                "model_glob must not be empty".to_string(),
            ));
        }
        if self.comment_delimiters.is_empty() {
            return Err(AssertionError::Config(
                "comment_delimiters must list at least one delimiter".to_string(),
            ));
        }
        if logging::parse_level(&self.log_level).is_none() {
            return Err(AssertionError::Config(format!(
                "Unknown log level: {}",
                self.log_level
            )));
        }
        Ok(())
    }

    /// Set the discovery glob
    pub fn with_model_glob(mut self, glob: impl Into<String>) -> Self {
        self.model_glob = glob.into();
        self
    }

    /// Set or clear the project model file
    pub fn with_project_model_file(mut self, path: Option<PathBuf>) -> Self {
        self.project_model_file = path;
        self
    }

    /// Replace the comment delimiters
    pub fn with_comment_delimiters(mut self, delimiters: Vec<CommentDelimiter>) -> Self {
        self.comment_delimiters = delimiters;
        self
    }

    /// Enable or disable strict template rendering
    pub fn with_strict_templates(mut self, strict: bool) -> Self {
        self.strict_templates = strict;
        self
    }
}
