//! Per-render context: the built model plus supplemental values

use serde::Serialize;
use serde_json::{Map, Value};
use tmplassert_model::Model;
use tracing::debug;

use crate::error::AssertionResult;

/// Values supplied for a single assertion
///
/// Supplemental keys shadow model keys of the same name for that render only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Supplemental {
    values: Map<String, Value>,
}

impl Supplemental {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a value, returning the one it replaced
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(key.into(), value.into())
    }

    /// Insert any serializable value
    pub fn insert_serialized<T>(&mut self, key: impl Into<String>, value: &T) -> AssertionResult<()>
    where
        T: Serialize + ?Sized,
    {
        self.values.insert(key.into(), serde_json::to_value(value)?);
        Ok(())
    }

    /// Look up a value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Number of values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no value was supplied
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<Map<String, Value>> for Supplemental {
    fn from(values: Map<String, Value>) -> Self {
        Self { values }
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Supplemental {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// The model layered under supplemental values
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    model: &'a Model,
    supplemental: &'a Supplemental,
}

impl<'a> RenderContext<'a> {
    /// Combine a model and supplemental values
    pub fn new(model: &'a Model, supplemental: &'a Supplemental) -> Self {
        Self {
            model,
            supplemental,
        }
    }

    /// Model keys hidden by supplemental values
    pub fn shadowed_keys(&self) -> Vec<&'a str> {
        self.supplemental
            .keys()
            .filter(|key| self.model.contains_key(key))
            .collect()
    }

    /// The JSON object templates are rendered against
    pub fn to_json(&self) -> Value {
        let mut root = self.model.to_json();
        for (key, value) in &self.supplemental.values {
            root.insert(key.clone(), value.clone());
        }

        let shadowed = self.shadowed_keys();
        if !shadowed.is_empty() {
            debug!("Supplemental values shadow model keys {:?}", shadowed);
        }
        Value::Object(root)
    }
}
