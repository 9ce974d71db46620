//! Shared helpers for the end-to-end template assertion tests

use std::path::{Path, PathBuf};

/// Root of the on-disk test fixtures
pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

/// Path of a fixture relative to [`fixtures_dir`]
pub fn fixture(relative: impl AsRef<Path>) -> PathBuf {
    fixtures_dir().join(relative)
}
