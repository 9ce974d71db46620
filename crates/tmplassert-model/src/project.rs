//! The `project` section shared by every model domain

use serde::{Deserialize, Serialize};

use crate::{
    document::RawDocument,
    error::ModelResult,
    model::Model,
    resolver::{read_section, ModelEntryResolver},
};

/// Model key under which the project is stored
pub const PROJECT_KEY: &str = "project";

/// Project metadata declared in the module file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Artifact group, e.g. `com.example`
    #[serde(default)]
    pub group: Option<String>,
    /// Project name
    #[serde(default)]
    pub name: String,
    /// Project type (`type` in the document)
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// Base namespace of generated sources
    #[serde(default)]
    pub namespace: Option<String>,
    /// Project version
    #[serde(default)]
    pub version: Option<String>,
    /// Free-form description
    #[serde(default)]
    pub description: Option<String>,
}

impl Project {
    /// `namespace` if set, otherwise `group`
    pub fn effective_namespace(&self) -> Option<&str> {
        self.namespace.as_deref().or(self.group.as_deref())
    }
}

/// Stores the `project` section as a [`Project`]
///
/// Nothing is stored when the section is absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectEntryResolver;

impl ProjectEntryResolver {
    /// Create the resolver
    pub fn new() -> Self {
        Self
    }
}

impl ModelEntryResolver for ProjectEntryResolver {
    fn name(&self) -> &str {
        "project"
    }

    fn resolve(&self, document: &RawDocument, model: &mut Model) -> ModelResult<()> {
        if let Some(project) = read_section::<Project>(document, PROJECT_KEY, self.name())? {
            model.insert(PROJECT_KEY, project)?;
        }
        Ok(())
    }
}
