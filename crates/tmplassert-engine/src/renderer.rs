//! Template rendering
//!
//! Provides Handlebars rendering for generated source code with:
//! - HTML escaping disabled
//! - Optional strict mode for missing fields
//! - Case conversion helpers (`lower-camel`, `upper-snake`, ...)

use handlebars::{no_escape, Handlebars};
use serde_json::Value;
use tracing::debug;

use crate::error::{AssertionError, AssertionResult};

/// Renders template text against a JSON context
pub trait TemplateRenderer: Send + Sync {
    /// Render `template` with `context`
    ///
    /// `name` identifies the template in errors.
    fn render(&self, name: &str, template: &str, context: &Value) -> AssertionResult<String>;
}

mod case_helpers {
    use handlebars::handlebars_helper;
    use heck::{
        ToKebabCase, ToLowerCamelCase, ToShoutyKebabCase, ToShoutySnakeCase, ToSnakeCase,
        ToUpperCamelCase,
    };

    handlebars_helper!(lower_camel: |s: str| s.to_lower_camel_case());
    handlebars_helper!(upper_camel: |s: str| s.to_upper_camel_case());
    handlebars_helper!(lower_snake: |s: str| s.to_snake_case());
    handlebars_helper!(upper_snake: |s: str| s.to_shouty_snake_case());
    handlebars_helper!(lower_hyphen: |s: str| s.to_kebab_case());
    handlebars_helper!(upper_hyphen: |s: str| s.to_shouty_kebab_case());
    handlebars_helper!(lower: |s: str| s.to_lowercase());
    handlebars_helper!(upper: |s: str| s.to_uppercase());
}

/// Handlebars-backed renderer
pub struct HandlebarsRenderer {
    registry: Handlebars<'static>,
}

impl HandlebarsRenderer {
    /// Create a renderer with escaping disabled and case helpers registered
    pub fn new() -> Self {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(no_escape);
        registry.register_helper("lower-camel", Box::new(case_helpers::lower_camel));
        registry.register_helper("upper-camel", Box::new(case_helpers::upper_camel));
        registry.register_helper("lower-snake", Box::new(case_helpers::lower_snake));
        registry.register_helper("upper-snake", Box::new(case_helpers::upper_snake));
        registry.register_helper("lower-hyphen", Box::new(case_helpers::lower_hyphen));
        registry.register_helper("upper-hyphen", Box::new(case_helpers::upper_hyphen));
        registry.register_helper("lower", Box::new(case_helpers::lower));
        registry.register_helper("upper", Box::new(case_helpers::upper));
        Self { registry }
    }

    /// Fail on references to missing fields instead of rendering them empty
    pub fn with_strict_mode(mut self, strict: bool) -> Self {
        self.registry.set_strict_mode(strict);
        self
    }

    /// Register a partial usable as `{{> name}}`
    pub fn register_partial(&mut self, name: &str, template: &str) -> AssertionResult<()> {
        self.registry
            .register_partial(name, template)
            .map_err(|e| AssertionError::Render {
                template: name.to_string(),
                message: e.to_string(),
            })
    }

    /// Access the underlying registry, e.g. to add helpers
    pub fn registry_mut(&mut self) -> &mut Handlebars<'static> {
        &mut self.registry
    }
}

impl Default for HandlebarsRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer for HandlebarsRenderer {
    fn render(&self, name: &str, template: &str, context: &Value) -> AssertionResult<String> {
        debug!("Rendering template {}", name);
        self.registry
            .render_template(template, context)
            .map_err(|e| AssertionError::Render {
                template: name.to_string(),
                message: e.to_string(),
            })
    }
}
