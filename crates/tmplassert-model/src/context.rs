//! Build-once owner of model files, resolvers and the resulting model

use std::{
    fmt,
    path::{Path, PathBuf},
};

use tracing::{debug, info};

use crate::{
    document::{DocumentLoader, RawDocument, YamlDocumentLoader},
    error::{ModelError, ModelResult},
    merge::merge_documents,
    model::Model,
    resolver::{ModelEntryResolver, ResolverRegistry},
};

#[derive(Debug)]
enum BuildState {
    Pending,
    Built(Model),
    Failed(String),
}

/// Collects model files and resolvers, then builds the model exactly once
///
/// ```no_run
/// use tmplassert_model::{CollectionResolver, ExecutionContext};
///
/// let mut context = ExecutionContext::new();
/// context
///     .add_model_file("model/services.yml")?
///     .add_resolver(CollectionResolver::<serde_json::Value>::new("services"))?;
/// context.build()?;
/// let services = context.current_model()?.value("services");
/// # Ok::<(), tmplassert_model::ModelError>(())
/// ```
pub struct ExecutionContext {
    model_files: Vec<PathBuf>,
    resolvers: ResolverRegistry,
    loader: Box<dyn DocumentLoader>,
    state: BuildState,
}

impl ExecutionContext {
    /// Create an empty context that reads YAML files
    pub fn new() -> Self {
        Self::with_loader(YamlDocumentLoader::new())
    }

    /// Create an empty context with a custom document loader
    pub fn with_loader<L>(loader: L) -> Self
    where
        L: DocumentLoader + 'static,
    {
        Self {
            model_files: Vec::new(),
            resolvers: ResolverRegistry::new(),
            loader: Box::new(loader),
            state: BuildState::Pending,
        }
    }

    fn ensure_pending(&self, action: &str) -> ModelResult<()> {
        match self.state {
            BuildState::Pending => Ok(()),
            _ => Err(ModelError::BuildSequence(format!(
                "cannot {} after build()",
                action
            ))),
        }
    }

    /// Append a model file
    pub fn add_model_file(&mut self, path: impl Into<PathBuf>) -> ModelResult<&mut Self> {
        self.ensure_pending("add model files")?;
        self.model_files.push(path.into());
        Ok(self)
    }

    /// Append model files in iteration order
    pub fn add_model_files<I, P>(&mut self, paths: I) -> ModelResult<&mut Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.ensure_pending("add model files")?;
        self.model_files.extend(paths.into_iter().map(Into::into));
        Ok(self)
    }

    /// Append a resolver
    pub fn add_resolver<R>(&mut self, resolver: R) -> ModelResult<&mut Self>
    where
        R: ModelEntryResolver + 'static,
    {
        self.ensure_pending("add resolvers")?;
        self.resolvers.register(resolver);
        Ok(self)
    }

    /// Append every resolver of `registry`
    pub fn add_resolvers(&mut self, registry: &ResolverRegistry) -> ModelResult<&mut Self> {
        self.ensure_pending("add resolvers")?;
        self.resolvers.extend(registry);
        Ok(self)
    }

    /// Model files in load order
    pub fn model_files(&self) -> &[PathBuf] {
        &self.model_files
    }

    /// Registered resolvers
    pub fn resolvers(&self) -> &ResolverRegistry {
        &self.resolvers
    }

    /// Whether `build()` completed successfully
    pub fn is_built(&self) -> bool {
        matches!(self.state, BuildState::Built(_))
    }

    /// Load, merge and resolve the configured files
    ///
    /// May be called once. On failure nothing is stored and the context stays
    /// unusable; [`current_model`](Self::current_model) reports the failure.
    pub fn build(&mut self) -> ModelResult<&Model> {
        self.ensure_pending("call build() again")?;

        match self.load_and_resolve() {
            Ok(model) => {
                info!(
                    "Built model with {} entries from {} files using {} resolvers",
                    model.len(),
                    self.model_files.len(),
                    self.resolvers.len()
                );
                self.state = BuildState::Built(model);
                self.current_model()
            }
            Err(e) => {
                self.state = BuildState::Failed(e.to_string());
                Err(e)
            }
        }
    }

    fn load_and_resolve(&self) -> ModelResult<Model> {
        let documents = self
            .model_files
            .iter()
            .map(|path| self.load(path))
            .collect::<ModelResult<Vec<RawDocument>>>()?;

        let merged = merge_documents(documents);
        debug!("Merged model document has {} top-level keys", merged.len());

        self.resolvers.resolve_all(&merged)
    }

    fn load(&self, path: &Path) -> ModelResult<RawDocument> {
        debug!("Loading model file {}", path.display());
        self.loader.load(path)
    }

    /// The built model
    pub fn current_model(&self) -> ModelResult<&Model> {
        match &self.state {
            BuildState::Built(model) => Ok(model),
            BuildState::Pending => Err(ModelError::BuildSequence(
                "model accessed before build()".to_string(),
            )),
            BuildState::Failed(reason) => Err(ModelError::BuildSequence(format!(
                "model unavailable, build failed: {}",
                reason
            ))),
        }
    }
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("model_files", &self.model_files)
            .field("resolvers", &self.resolvers)
            .field("state", &self.state)
            .finish()
    }
}
