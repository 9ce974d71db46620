//! Scratch files for model text given inline

use std::{io::Write, path::Path};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::ModelResult;

/// Prefix used when the caller does not choose one
pub const DEFAULT_SCRATCH_PREFIX: &str = "tmplassert-model-";

/// A uniquely named temporary model file
///
/// The file is removed when this value is dropped, on every exit path.
#[derive(Debug)]
pub struct ScratchModelFile {
    file: NamedTempFile,
}

impl ScratchModelFile {
    /// Write `text` to a new scratch file with the default prefix
    pub fn write(text: &str) -> ModelResult<Self> {
        Self::write_with_prefix(DEFAULT_SCRATCH_PREFIX, text)
    }

    /// Write `text` to a new scratch file named `<prefix><random>.yml`
    pub fn write_with_prefix(prefix: &str, text: &str) -> ModelResult<Self> {
        let mut file = tempfile::Builder::new()
            .prefix(prefix)
            .suffix(".yml")
            .tempfile()?;
        file.write_all(text.as_bytes())?;
        file.flush()?;
        debug!("Wrote inline model to {}", file.path().display());
        Ok(Self { file })
    }

    /// Path of the scratch file
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_scratch_file_holds_text() {
        let scratch = ScratchModelFile::write("services: []\n").unwrap();
        assert_eq!(fs::read_to_string(scratch.path()).unwrap(), "services: []\n");
        assert_eq!(scratch.path().extension().unwrap(), "yml");
    }

    #[test]
    fn test_scratch_file_removed_on_drop() {
        let scratch = ScratchModelFile::write_with_prefix("drop-check-", "a: 1\n").unwrap();
        let path = scratch.path().to_path_buf();
        assert!(path.exists());

        drop(scratch);
        assert!(!path.exists());
    }

    #[test]
    fn test_scratch_files_are_unique() {
        let a = ScratchModelFile::write("a: 1\n").unwrap();
        let b = ScratchModelFile::write("a: 1\n").unwrap();
        assert_ne!(a.path(), b.path());
    }
}
