#![warn(missing_docs)]

//! Template rendering and content assertions
//!
//! Renders a template against a model built by `tmplassert-model`, normalizes the
//! output and the expected text, and checks for an exact match or containment.

pub mod assertion;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod normalizer;
pub mod renderer;

// Re-export public API
pub use assertion::TemplateAssertion;
pub use config::{HarnessConfig, DEFAULT_PROJECT_MODEL_FILE, ENV_PREFIX};
pub use context::{RenderContext, Supplemental};
pub use error::{AssertionError, AssertionResult};
pub use logging::{init_test_logging, parse_level};
pub use normalizer::{CommentDelimiter, ContentNormalizer};
pub use renderer::{HandlebarsRenderer, TemplateRenderer};
