#![warn(missing_docs)]

//! Model loading for template assertions
//!
//! Loads YAML model files, merges them into one document, and runs pluggable entry
//! resolvers over the result to build a read-only [`Model`].

pub mod context;
pub mod discovery;
pub mod document;
pub mod error;
pub mod merge;
pub mod model;
pub mod project;
pub mod resolver;
pub mod scratch;

// Re-export public API
pub use context::ExecutionContext;
pub use discovery::{ModelFileDiscovery, DEFAULT_MODEL_GLOB};
pub use document::{DocumentLoader, RawDocument, YamlDocumentLoader};
pub use error::{ModelError, ModelResult};
pub use merge::{merge_documents, merge_into, merge_value};
pub use model::{Model, ModelEntry};
pub use project::{Project, ProjectEntryResolver, PROJECT_KEY};
pub use resolver::{
    read_section, read_sequence, CollectionResolver, ModelEntryResolver, ResolverRegistry,
};
pub use scratch::{ScratchModelFile, DEFAULT_SCRATCH_PREFIX};
