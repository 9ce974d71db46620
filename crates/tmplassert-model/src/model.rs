//! The resolved model consumed by template rendering

use std::{
    any::Any,
    collections::BTreeMap,
    fmt,
    sync::Arc,
};

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::ModelResult;

/// One named model entry
///
/// Keeps the value a resolver stored, for typed access, next to its JSON projection,
/// which is what templates see.
#[derive(Clone)]
pub struct ModelEntry {
    typed: Arc<dyn Any + Send + Sync>,
    json: Value,
}

impl ModelEntry {
    /// Build an entry from a serializable value
    pub fn new<T>(value: T) -> ModelResult<Self>
    where
        T: Serialize + Send + Sync + 'static,
    {
        let json = serde_json::to_value(&value)?;
        Ok(Self {
            typed: Arc::new(value),
            json,
        })
    }

    /// Build an untyped entry from JSON
    pub fn from_json(json: Value) -> Self {
        Self {
            typed: Arc::new(json.clone()),
            json,
        }
    }

    /// The stored value, if it has type `T`
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.typed.downcast_ref::<T>()
    }

    /// The JSON projection of the value
    pub fn json(&self) -> &Value {
        &self.json
    }
}

impl fmt::Debug for ModelEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelEntry").field("json", &self.json).finish()
    }
}

impl PartialEq for ModelEntry {
    fn eq(&self, other: &Self) -> bool {
        self.json == other.json
    }
}

/// Named collections contributed by entry resolvers
///
/// Only resolvers get mutable access, and only while a context is building; every
/// other consumer sees `&Model`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    entries: BTreeMap<String, ModelEntry>,
}

impl Model {
    /// Create an empty model
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a typed value under `key`
    ///
    /// An existing entry with the same key is replaced, so among resolvers that write
    /// the same key the last registered one wins.
    pub fn insert<T>(&mut self, key: impl Into<String>, value: T) -> ModelResult<()>
    where
        T: Serialize + Send + Sync + 'static,
    {
        let entry = ModelEntry::new(value)?;
        self.insert_entry(key.into(), entry);
        Ok(())
    }

    /// Store a raw JSON value under `key`
    pub fn insert_json(&mut self, key: impl Into<String>, value: Value) {
        self.insert_entry(key.into(), ModelEntry::from_json(value));
    }

    fn insert_entry(&mut self, key: String, entry: ModelEntry) {
        if self.entries.contains_key(&key) {
            warn!("Model entry '{}' overwritten by a later resolver", key);
        }
        self.entries.insert(key, entry);
    }

    /// The typed value under `key`, if present and of type `T`
    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        self.entries.get(key).and_then(|entry| entry.downcast_ref::<T>())
    }

    /// The JSON projection of the value under `key`
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.entries.get(key).map(ModelEntry::json)
    }

    /// The entry under `key`
    pub fn entry(&self, key: &str) -> Option<&ModelEntry> {
        self.entries.get(key)
    }

    /// Whether `key` is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Entry keys in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the model has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The JSON view of the whole model, used as the root rendering context
    pub fn to_json(&self) -> Map<String, Value> {
        self.entries
            .iter()
            .map(|(key, entry)| (key.clone(), entry.json.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Widget {
        name: String,
    }

    #[test]
    fn test_typed_round_trip() {
        let mut model = Model::new();
        model
            .insert("widgets", vec![Widget { name: "a".into() }])
            .unwrap();

        let widgets = model.get::<Vec<Widget>>("widgets").unwrap();
        assert_eq!(widgets[0].name, "a");
        assert!(model.get::<String>("widgets").is_none());
        assert_eq!(
            model.value("widgets").unwrap(),
            &serde_json::json!([{ "name": "a" }])
        );
    }

    #[test]
    fn test_last_insert_wins() {
        let mut model = Model::new();
        model.insert("k", 1u32).unwrap();
        model.insert("k", 2u32).unwrap();

        assert_eq!(model.get::<u32>("k"), Some(&2));
        assert_eq!(model.len(), 1);
    }

    #[test]
    fn test_json_entries_are_typed_as_value() {
        let mut model = Model::new();
        model.insert_json("flags", serde_json::json!({"on": true}));
        assert!(model.get::<Value>("flags").is_some());
        assert_eq!(model.to_json()["flags"]["on"], Value::Bool(true));
    }

    #[test]
    fn test_equality_uses_json_projection() {
        let mut a = Model::new();
        let mut b = Model::new();
        a.insert("n", vec!["x".to_string()]).unwrap();
        b.insert_json("n", serde_json::json!(["x"]));
        assert_eq!(a, b);
    }
}
