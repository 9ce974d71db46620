//! Typed service API entities

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Entities looked up by name
pub trait Named {
    /// Entity name
    fn name(&self) -> &str;
}

/// A datasource backing data accesses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Datasource {
    /// Datasource name
    pub name: String,
    /// Datasource type, e.g. `postgres` (`type` in the document)
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Attributes not modelled above, passed through to templates
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A deployable service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    /// Service name
    pub name: String,
    /// Namespace of generated sources
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Service version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Attributes not modelled above, passed through to templates
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A REST resource exposed by a service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestResource {
    /// Resource name
    pub name: String,
    /// Name of the owning service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    /// URL path, e.g. `/orders`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Attributes not modelled above, passed through to templates
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A data access bound to a datasource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataAccess {
    /// Data access name
    pub name: String,
    /// Name of the datasource used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datasource: Option<String>,
    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Attributes not modelled above, passed through to templates
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Named for Datasource {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Service {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for RestResource {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for DataAccess {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Ordered entities of one kind
///
/// Serializes as a plain sequence so templates iterate it with `{{#each}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityList<T> {
    items: Vec<T>,
}

impl<T: Named> EntityList<T> {
    /// Wrap items, keeping their order
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    /// First entity named `name`
    pub fn find(&self, name: &str) -> Option<&T> {
        self.items.iter().find(|item| item.name() == name)
    }

    /// Entity names in order
    pub fn names(&self) -> Vec<&str> {
        self.items.iter().map(Named::name).collect()
    }

    /// Iterate over the entities
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Number of entities
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the list is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> EntityList<T> {
    /// A list with no entities
    pub const fn empty() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> Default for EntityList<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<'a, T> IntoIterator for &'a EntityList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// All datasources
pub type DatasourceList = EntityList<Datasource>;
/// All services
pub type ServiceList = EntityList<Service>;
/// All REST resources
pub type RestResourceList = EntityList<RestResource>;
/// All data accesses
pub type DataAccessList = EntityList<DataAccess>;

impl RestResource {
    /// The owning service, if declared and present in `services`
    pub fn service_in<'a>(&self, services: &'a ServiceList) -> Option<&'a Service> {
        self.service.as_deref().and_then(|name| services.find(name))
    }
}

impl DataAccess {
    /// The datasource used, if declared and present in `datasources`
    pub fn datasource_in<'a>(&self, datasources: &'a DatasourceList) -> Option<&'a Datasource> {
        self.datasource
            .as_deref()
            .and_then(|name| datasources.find(name))
    }
}
