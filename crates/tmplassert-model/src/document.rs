//! Raw configuration documents and the loader that reads them

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::error::{ModelError, ModelResult};

/// The untyped content of one model file
///
/// The root of a document is always a mapping with string keys. Key order is the
/// order in which the keys appear in the file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawDocument {
    root: Mapping,
}

impl RawDocument {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing mapping
    pub fn from_mapping(root: Mapping) -> Self {
        Self { root }
    }

    /// Parse YAML text into a document
    ///
    /// `path` is only used to name the source in errors. An empty text yields an
    /// empty document; any root other than a mapping is malformed.
    pub fn parse(content: &str, path: &Path) -> ModelResult<Self> {
        let value: Value = serde_yaml::from_str(content).map_err(|e| ModelError::Malformed {
            path: path.to_path_buf(),
            line: e.location().map(|l| l.line()).unwrap_or(0),
            message: e.to_string(),
        })?;

        match value {
            Value::Null => Ok(Self::new()),
            Value::Mapping(root) => {
                if let Some(key) = root.keys().find(|k| !k.is_string()) {
                    return Err(ModelError::Malformed {
                        path: path.to_path_buf(),
                        line: 0,
                        message: format!("top-level keys must be strings, found {:?}", key),
                    });
                }
                Ok(Self { root })
            }
            other => Err(ModelError::Malformed {
                path: path.to_path_buf(),
                line: 0,
                message: format!(
                    "top-level value must be a mapping, found {}",
                    value_kind(&other)
                ),
            }),
        }
    }

    /// Look up a top-level key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.root.get(key)
    }

    /// Whether a top-level key is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.root.contains_key(key)
    }

    /// Insert or replace a top-level key
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.root.insert(Value::String(key.into()), value)
    }

    /// Top-level keys in document order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.root.keys().filter_map(Value::as_str)
    }

    /// Number of top-level keys
    pub fn len(&self) -> usize {
        self.root.len()
    }

    /// Whether the document has no keys
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Borrow the root mapping
    pub fn as_mapping(&self) -> &Mapping {
        &self.root
    }

    pub(crate) fn root_mut(&mut self) -> &mut Mapping {
        &mut self.root
    }

    /// Consume the document and return its root mapping
    pub fn into_mapping(self) -> Mapping {
        self.root
    }
}

/// Reads one model file into a [`RawDocument`]
pub trait DocumentLoader: Send + Sync {
    /// Load the document at `path`
    ///
    /// Implementations report missing, unreadable and malformed files as load errors
    /// naming `path`.
    fn load(&self, path: &Path) -> ModelResult<RawDocument>;
}

/// Loads model files written in YAML
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlDocumentLoader;

impl YamlDocumentLoader {
    /// Create a new YAML loader
    pub fn new() -> Self {
        Self
    }
}

impl DocumentLoader for YamlDocumentLoader {
    fn load(&self, path: &Path) -> ModelResult<RawDocument> {
        let content = fs::read_to_string(path).map_err(|e| load_error(path, e))?;
        let document = RawDocument::parse(&content, path)?;
        debug!(
            "Loaded model file {} ({} top-level keys)",
            path.display(),
            document.len()
        );
        Ok(document)
    }
}

fn load_error(path: &Path, error: io::Error) -> ModelError {
    let path: PathBuf = path.to_path_buf();
    if error.kind() == io::ErrorKind::NotFound {
        ModelError::FileNotFound { path }
    } else {
        ModelError::Unreadable {
            path,
            source: error,
        }
    }
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}
