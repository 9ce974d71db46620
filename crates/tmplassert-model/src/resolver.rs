//! Entry resolvers and the registry that runs them
//!
//! A resolver reads the sections of the merged document it understands and writes
//! named collections into the [`Model`]. The registry knows nothing about what those
//! sections mean; it only runs resolvers in the order they were registered.

use std::{fmt, marker::PhantomData, sync::Arc};

use serde::{de::DeserializeOwned, Serialize};
use serde_yaml::Value;
use tracing::debug;

use crate::{
    document::RawDocument,
    error::{ModelError, ModelResult},
    model::Model,
};

/// Turns raw document sections into typed model entries
pub trait ModelEntryResolver: Send + Sync {
    /// Name used in logs and errors
    fn name(&self) -> &str;

    /// Read recognized keys from `document` and store entries in `model`
    ///
    /// A recognized key that is absent from the document contributes an empty
    /// collection rather than an error.
    fn resolve(&self, document: &RawDocument, model: &mut Model) -> ModelResult<()>;
}

/// Ordered set of resolvers
///
/// Registration order is preserved and duplicates are each invoked.
#[derive(Clone, Default)]
pub struct ResolverRegistry {
    resolvers: Vec<Arc<dyn ModelEntryResolver>>,
}

impl ResolverRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a resolver
    pub fn register<R>(&mut self, resolver: R) -> &mut Self
    where
        R: ModelEntryResolver + 'static,
    {
        self.resolvers.push(Arc::new(resolver));
        self
    }

    /// Append an already shared resolver
    pub fn register_shared(&mut self, resolver: Arc<dyn ModelEntryResolver>) -> &mut Self {
        self.resolvers.push(resolver);
        self
    }

    /// Builder-style [`register`](Self::register)
    pub fn with<R>(mut self, resolver: R) -> Self
    where
        R: ModelEntryResolver + 'static,
    {
        self.register(resolver);
        self
    }

    /// Append every resolver of `other`, keeping its order
    pub fn extend(&mut self, other: &ResolverRegistry) -> &mut Self {
        self.resolvers.extend(other.resolvers.iter().cloned());
        self
    }

    /// Number of registered resolvers
    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    /// Whether no resolver is registered
    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }

    /// Resolver names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.resolvers.iter().map(|r| r.name()).collect()
    }

    /// Run every resolver in order against `document`, producing a new model
    pub fn resolve_all(&self, document: &RawDocument) -> ModelResult<Model> {
        let mut model = Model::new();
        for resolver in &self.resolvers {
            debug!("Running model entry resolver {}", resolver.name());
            resolver.resolve(document, &mut model)?;
        }
        Ok(model)
    }
}

impl fmt::Debug for ResolverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverRegistry")
            .field("resolvers", &self.names())
            .finish()
    }
}

/// Deserialize the sequence under `key`, treating an absent or null key as empty
pub fn read_sequence<T>(document: &RawDocument, key: &str, resolver: &str) -> ModelResult<Vec<T>>
where
    T: DeserializeOwned,
{
    match document.get(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(value @ Value::Sequence(_)) => serde_yaml::from_value(value.clone())
            .map_err(|e| ModelError::resolve(resolver, key, e)),
        Some(other) => Err(ModelError::resolve(
            resolver,
            key,
            format!(
                "expected a sequence, found {}",
                crate::document::value_kind(other)
            ),
        )),
    }
}

/// Deserialize the section under `key`, returning `None` when it is absent or null
pub fn read_section<T>(document: &RawDocument, key: &str, resolver: &str) -> ModelResult<Option<T>>
where
    T: DeserializeOwned,
{
    match document.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_yaml::from_value(value.clone())
            .map(Some)
            .map_err(|e| ModelError::resolve(resolver, key, e)),
    }
}

/// Resolves one document sequence into a typed `Vec<T>` model entry
pub struct CollectionResolver<T> {
    name: String,
    document_key: String,
    model_key: String,
    _item: PhantomData<fn() -> T>,
}

impl<T> CollectionResolver<T>
where
    T: DeserializeOwned + Serialize + Send + Sync + 'static,
{
    /// Resolve document key `key` into model key `key`
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            name: format!("collection:{}", key),
            document_key: key.clone(),
            model_key: key,
            _item: PhantomData,
        }
    }

    /// Store the collection under a different model key
    pub fn with_model_key(mut self, model_key: impl Into<String>) -> Self {
        self.model_key = model_key.into();
        self
    }
}

impl<T> ModelEntryResolver for CollectionResolver<T>
where
    T: DeserializeOwned + Serialize + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn resolve(&self, document: &RawDocument, model: &mut Model) -> ModelResult<()> {
        let items: Vec<T> = read_sequence(document, &self.document_key, &self.name)?;
        debug!(
            "Resolved {} entries for '{}'",
            items.len(),
            self.model_key
        );
        model.insert(self.model_key.clone(), items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::path::Path;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Named {
        name: String,
    }

    fn doc(yaml: &str) -> RawDocument {
        RawDocument::parse(yaml, Path::new("test.yml")).unwrap()
    }

    struct Constant(&'static str, u32);

    impl ModelEntryResolver for Constant {
        fn name(&self) -> &str {
            self.0
        }

        fn resolve(&self, _document: &RawDocument, model: &mut Model) -> ModelResult<()> {
            model.insert("constant", self.1)
        }
    }

    /// Counts its own invocations in the model
    struct Counter;

    impl ModelEntryResolver for Counter {
        fn name(&self) -> &str {
            "counter"
        }

        fn resolve(&self, _document: &RawDocument, model: &mut Model) -> ModelResult<()> {
            let seen = model.get::<u32>("invocations").copied().unwrap_or(0);
            model.insert("invocations", seen + 1)
        }
    }

    #[test]
    fn test_collection_resolver_reads_items() {
        let registry = ResolverRegistry::new().with(CollectionResolver::<Named>::new("services"));
        let model = registry
            .resolve_all(&doc("services:\n  - name: Orders\n  - name: Users\n"))
            .unwrap();

        let services = model.get::<Vec<Named>>("services").unwrap();
        assert_eq!(services.len(), 2);
        assert_eq!(services[1].name, "Users");
    }

    #[test]
    fn test_absent_key_is_empty_collection() {
        let registry =
            ResolverRegistry::new().with(CollectionResolver::<Named>::new("datasources"));
        let model = registry.resolve_all(&doc("services: []\n")).unwrap();

        assert_eq!(model.get::<Vec<Named>>("datasources").unwrap().len(), 0);
        assert_eq!(model.value("datasources").unwrap(), &serde_json::json!([]));
    }

    #[test]
    fn test_wrong_shape_is_a_resolve_error() {
        let registry = ResolverRegistry::new().with(CollectionResolver::<Named>::new("services"));
        let err = registry.resolve_all(&doc("services: Orders\n")).unwrap_err();

        match err {
            ModelError::Resolve { resolver, key, .. } => {
                assert_eq!(resolver, "collection:services");
                assert_eq!(key, "services");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_registration_order_breaks_ties() {
        let registry = ResolverRegistry::new()
            .with(Constant("first", 1))
            .with(Constant("second", 2));
        assert_eq!(registry.names(), vec!["first", "second"]);

        let model = registry.resolve_all(&RawDocument::new()).unwrap();
        assert_eq!(model.get::<u32>("constant"), Some(&2));
    }

    #[test]
    fn test_duplicates_are_each_invoked() {
        let mut registry = ResolverRegistry::new();
        registry.register(Counter).register(Counter);
        assert_eq!(registry.names(), vec!["counter", "counter"]);

        let model = registry.resolve_all(&RawDocument::new()).unwrap();
        assert_eq!(model.get::<u32>("invocations"), Some(&2));
    }

    #[test]
    fn test_model_key_override() {
        let registry = ResolverRegistry::new()
            .with(CollectionResolver::<Named>::new("rest-resources").with_model_key("rest_resources"));
        let model = registry
            .resolve_all(&doc("rest-resources:\n  - name: orders\n"))
            .unwrap();
        assert!(model.contains_key("rest_resources"));
        assert!(!model.contains_key("rest-resources"));
    }
}
