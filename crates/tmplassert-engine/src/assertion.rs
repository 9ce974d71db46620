//! Template assertions
//!
//! A [`TemplateAssertion`] owns one model build and one selected template. Each
//! assertion renders the template against the model plus per-call supplemental values,
//! normalizes both sides and compares them.

use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use similar::{ChangeTag, TextDiff};
use tmplassert_model::{
    ExecutionContext, Model, ModelError, ModelFileDiscovery, ResolverRegistry, ScratchModelFile,
};
use tracing::debug;

use crate::{
    config::HarnessConfig,
    context::{RenderContext, Supplemental},
    error::{AssertionError, AssertionResult},
    normalizer::ContentNormalizer,
    renderer::{HandlebarsRenderer, TemplateRenderer},
};

/// Renders a template against a built model and checks the output
///
/// # Example
///
/// ```no_run
/// use tmplassert_engine::{Supplemental, TemplateAssertion};
/// use tmplassert_model::{CollectionResolver, ResolverRegistry};
///
/// let registry = ResolverRegistry::new()
///     .with(CollectionResolver::<serde_json::Value>::new("services"));
/// let mut assertion = TemplateAssertion::new(registry);
/// assertion
///     .with_model_text("services:\n  - name: Orders\n")?
///     .with_template("templates/service.hbs");
/// assertion.check_contains("name: Orders", |_| Supplemental::new())?;
/// # Ok::<(), tmplassert_engine::AssertionError>(())
/// ```
pub struct TemplateAssertion {
    config: HarnessConfig,
    resolvers: ResolverRegistry,
    renderer: Box<dyn TemplateRenderer>,
    normalizer: ContentNormalizer,
    context: Option<ExecutionContext>,
    template: Option<PathBuf>,
    // Backs the current context; deleted once a new model replaces it
    scratch_file: Option<ScratchModelFile>,
}

impl TemplateAssertion {
    /// Create an assertion with default settings
    pub fn new(resolvers: ResolverRegistry) -> Self {
        Self {
            config: HarnessConfig::default(),
            resolvers,
            renderer: Box::new(HandlebarsRenderer::new()),
            normalizer: ContentNormalizer::default(),
            context: None,
            template: None,
            scratch_file: None,
        }
    }

    /// Create an assertion from validated settings
    pub fn with_config(resolvers: ResolverRegistry, config: HarnessConfig) -> AssertionResult<Self> {
        config.validate()?;
        let normalizer = ContentNormalizer::new(&config.comment_delimiters)?;
        let renderer = HandlebarsRenderer::new().with_strict_mode(config.strict_templates);

        Ok(Self {
            config,
            resolvers,
            renderer: Box::new(renderer),
            normalizer,
            context: None,
            template: None,
            scratch_file: None,
        })
    }

    /// Replace the template renderer
    pub fn with_renderer<R>(mut self, renderer: R) -> Self
    where
        R: TemplateRenderer + 'static,
    {
        self.renderer = Box::new(renderer);
        self
    }

    /// Settings in use
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Resolvers applied to every model build
    pub fn resolvers(&self) -> &ResolverRegistry {
        &self.resolvers
    }

    /// Normalizer applied to both sides of a comparison
    pub fn normalizer(&self) -> &ContentNormalizer {
        &self.normalizer
    }

    /// Build a fresh model from `files`
    ///
    /// The configured project model file is loaded first when it exists. A failed
    /// build is kept, so [`model`](Self::model) keeps reporting it afterwards.
    pub fn with_model<I, P>(&mut self, files: I) -> AssertionResult<&mut Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.build_model(files.into_iter().map(Into::into).collect(), None)?;
        Ok(self)
    }

    fn build_model(
        &mut self,
        files: Vec<PathBuf>,
        scratch: Option<ScratchModelFile>,
    ) -> AssertionResult<()> {
        let mut paths = Vec::with_capacity(files.len() + 1);
        if let Some(project_file) = &self.config.project_model_file {
            if project_file.is_file() && !files.contains(project_file) {
                debug!("Prepending project model file {}", project_file.display());
                paths.push(project_file.clone());
            }
        }
        paths.extend(files);

        let mut context = ExecutionContext::new();
        context
            .add_model_files(paths)?
            .add_resolvers(&self.resolvers)?;
        let built = context.build().map(|model| model.len());
        self.context = Some(context);
        self.scratch_file = scratch;

        let entries = built?;
        debug!("Model ready with {} entries", entries);
        Ok(())
    }

    /// Build a model from every file under `dir` matching `glob`
    ///
    /// Falls back to the configured glob when `glob` is `None`.
    pub fn with_model_dir(
        &mut self,
        dir: impl AsRef<Path>,
        glob: Option<&str>,
    ) -> AssertionResult<&mut Self> {
        let pattern = glob.unwrap_or(&self.config.model_glob);
        let files = ModelFileDiscovery::new(pattern)?.discover(dir.as_ref())?;
        self.with_model(files)
    }

    /// Build a model from inline YAML text
    pub fn with_model_text(&mut self, text: &str) -> AssertionResult<&mut Self> {
        let scratch = ScratchModelFile::write_with_prefix(&self.config.scratch_prefix, text)?;
        let path = scratch.path().to_path_buf();
        self.build_model(vec![path], Some(scratch))?;
        Ok(self)
    }

    /// Select the template used by later assertions
    pub fn with_template(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.template = Some(path.into());
        self
    }

    /// The execution context of the last model build
    pub fn context(&self) -> Option<&ExecutionContext> {
        self.context.as_ref()
    }

    /// The built model
    pub fn model(&self) -> AssertionResult<&Model> {
        let context = self.context.as_ref().ok_or_else(|| {
            ModelError::BuildSequence("No model loaded; call with_model() first".to_string())
        })?;
        Ok(context.current_model()?)
    }

    /// The selected template
    pub fn template(&self) -> Option<&Path> {
        self.template.as_deref()
    }

    /// Render the selected template
    ///
    /// `handle_model` supplies values layered over the model for this render only.
    pub fn render<F>(&self, handle_model: F) -> AssertionResult<String>
    where
        F: FnOnce(&TemplateAssertion) -> Supplemental,
    {
        let template_path = self
            .template
            .as_ref()
            .ok_or(AssertionError::TemplateNotSelected)?;
        let model = self.model()?;
        let supplemental = handle_model(self);

        let template = fs::read_to_string(template_path).map_err(|source| {
            AssertionError::TemplateUnreadable {
                path: template_path.clone(),
                source,
            }
        })?;
        let context = RenderContext::new(model, &supplemental).to_json();

        self.renderer
            .render(&template_path.display().to_string(), &template, &context)
    }

    /// Check the rendered output equals the file at `expected_path`
    pub fn check_same_content<F>(
        &self,
        expected_path: impl AsRef<Path>,
        handle_model: F,
    ) -> AssertionResult<()>
    where
        F: FnOnce(&TemplateAssertion) -> Supplemental,
    {
        let expected_path = expected_path.as_ref();
        let actual = self.render(handle_model)?;
        let expected = fs::read_to_string(expected_path).map_err(|source| {
            AssertionError::ExpectedUnreadable {
                path: expected_path.to_path_buf(),
                source,
            }
        })?;

        let expected = self.normalizer.normalize(&expected);
        let actual = self.normalizer.normalize(&actual);
        if expected == actual {
            debug!("Output matches {}", expected_path.display());
            return Ok(());
        }

        Err(AssertionError::Mismatch {
            expected_path: expected_path.to_path_buf(),
            diff: line_diff(&expected, &actual),
            expected,
            actual,
        })
    }

    /// Check the rendered output contains `fragment`, ignoring indentation
    pub fn check_contains<F>(&self, fragment: &str, handle_model: F) -> AssertionResult<()>
    where
        F: FnOnce(&TemplateAssertion) -> Supplemental,
    {
        let actual = self.render(handle_model)?;
        let actual =
            ContentNormalizer::collapse_line_indentation(&self.normalizer.normalize(&actual));
        let fragment =
            ContentNormalizer::collapse_line_indentation(&self.normalizer.normalize(fragment));

        if actual.contains(&fragment) {
            Ok(())
        } else {
            Err(AssertionError::NotContained { fragment, actual })
        }
    }

    /// Panic unless the output equals the file at `expected_path`
    #[track_caller]
    pub fn assert_same_content(&self, expected_path: impl AsRef<Path>) {
        self.assert_same_content_with(expected_path, |_| Supplemental::new());
    }

    /// Like [`assert_same_content`](Self::assert_same_content) with supplemental values
    #[track_caller]
    pub fn assert_same_content_with<F>(&self, expected_path: impl AsRef<Path>, handle_model: F)
    where
        F: FnOnce(&TemplateAssertion) -> Supplemental,
    {
        if let Err(e) = self.check_same_content(expected_path, handle_model) {
            panic!("{}", e);
        }
    }

    /// Panic unless the output contains `fragment`
    #[track_caller]
    pub fn assert_contains(&self, fragment: &str) {
        self.assert_contains_with(fragment, |_| Supplemental::new());
    }

    /// Like [`assert_contains`](Self::assert_contains) with supplemental values
    #[track_caller]
    pub fn assert_contains_with<F>(&self, fragment: &str, handle_model: F)
    where
        F: FnOnce(&TemplateAssertion) -> Supplemental,
    {
        if let Err(e) = self.check_contains(fragment, handle_model) {
            panic!("{}", e);
        }
    }
}

impl fmt::Debug for TemplateAssertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateAssertion")
            .field("config", &self.config)
            .field("resolvers", &self.resolvers)
            .field("context", &self.context)
            .field("template", &self.template)
            .field("scratch_file", &self.scratch_file.as_ref().map(ScratchModelFile::path))
            .finish()
    }
}

/// Line diff from expected to actual, one prefixed line per change
fn line_diff(expected: &str, actual: &str) -> String {
    let diff = TextDiff::from_lines(expected, actual);
    let mut out = String::new();
    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => '-',
            ChangeTag::Insert => '+',
            ChangeTag::Equal => ' ',
        };
        out.push(sign);
        out.push_str(change.value().trim_end_matches('\n'));
        out.push('\n');
    }
    out
}
