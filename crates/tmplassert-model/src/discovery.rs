//! Discovery of model files under a directory

use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{ModelError, ModelResult};

/// Pattern used when the caller does not choose one
pub const DEFAULT_MODEL_GLOB: &str = "**/*.{yml,yaml}";

/// Finds model files below a root directory
///
/// The pattern is matched against paths relative to the root, with `/` as separator
/// and `*` not crossing directories.
#[derive(Debug, Clone)]
pub struct ModelFileDiscovery {
    pattern: String,
    matcher: GlobMatcher,
}

impl ModelFileDiscovery {
    /// Compile a discovery pattern
    pub fn new(pattern: &str) -> ModelResult<Self> {
        let glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .map_err(|e| ModelError::InvalidPattern {
                pattern: pattern.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            pattern: pattern.to_string(),
            matcher: glob.compile_matcher(),
        })
    }

    /// Discovery with [`DEFAULT_MODEL_GLOB`]
    pub fn with_default_pattern() -> ModelResult<Self> {
        Self::new(DEFAULT_MODEL_GLOB)
    }

    /// The pattern this discovery matches
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Whether `relative` (a path relative to the root) matches
    pub fn matches(&self, relative: &Path) -> bool {
        self.matcher.is_match(relative)
    }

    /// Every matching file under `root`, sorted by path
    ///
    /// A missing root is an error: callers asked for models that are not there.
    pub fn discover(&self, root: &Path) -> ModelResult<Vec<PathBuf>> {
        if !root.is_dir() {
            return Err(ModelError::Discovery {
                root: root.to_path_buf(),
                message: "not a directory".to_string(),
            });
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry.map_err(|e| ModelError::Discovery {
                root: root.to_path_buf(),
                message: e.to_string(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
            if self.matches(relative) {
                files.push(entry.into_path());
            }
        }

        files.sort();
        debug!(
            "Discovered {} model files under {} matching {}",
            files.len(),
            root.display(),
            self.pattern
        );
        Ok(files)
    }
}
