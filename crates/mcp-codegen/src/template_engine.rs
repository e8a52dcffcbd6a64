//! Template engine for skill package files using Handlebars.
//!
//! Provides a wrapper around Handlebars with the built-in skill templates
//! pre-registered. Output is TypeScript and Markdown, so HTML escaping is
//! disabled.
//!
//! # Examples
//!
//! ```
//! use mcp_codegen::template_engine::TemplateEngine;
//! use serde_json::json;
//!
//! let engine = TemplateEngine::new().unwrap();
//! let index = engine
//!     .render(
//!         "skill/index",
//!         &json!({
//!             "generator_version": "0.1.0",
//!             "server_name": "demo",
//!             "categories": [{"key": "runs"}]
//!         }),
//!     )
//!     .unwrap();
//! assert!(index.contains("export * from './runs';"));
//! ```

use handlebars::Handlebars;
use mcp_core::{Error, Result};
use serde::Serialize;

/// Built-in templates: (name, source).
const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    (
        "skill/manifest",
        include_str!("../templates/skill/manifest.md.hbs"),
    ),
    ("skill/types", include_str!("../templates/skill/types.ts.hbs")),
    ("skill/index", include_str!("../templates/skill/index.ts.hbs")),
    (
        "skill/category-index",
        include_str!("../templates/skill/category-index.ts.hbs"),
    ),
    ("skill/tool", include_str!("../templates/skill/tool.ts.hbs")),
];

/// Template engine for skill package generation.
///
/// # Thread Safety
///
/// This type is `Send` and `Sync`, allowing it to be used across
/// thread boundaries safely.
#[derive(Debug)]
pub struct TemplateEngine<'a> {
    handlebars: Handlebars<'a>,
}

impl<'a> TemplateEngine<'a> {
    /// Creates a new template engine with the built-in templates registered.
    ///
    /// # Errors
    ///
    /// Returns error if template registration fails (should not happen
    /// with valid built-in templates).
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();

        // Strict mode: fail on missing variables
        handlebars.set_strict_mode(true);
        handlebars.register_escape_fn(handlebars::no_escape);

        let mut engine = Self { handlebars };
        for (name, source) in BUILTIN_TEMPLATES {
            engine.register_template_string(name, source)?;
        }

        Ok(engine)
    }

    /// Renders a template with the given context.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Template name is not registered
    /// - Context cannot be serialized
    /// - The context lacks a variable the template uses
    pub fn render<T: Serialize>(&self, template_name: &str, context: &T) -> Result<String> {
        self.handlebars
            .render(template_name, context)
            .map_err(|e| Error::SerializationError {
                message: format!("Template rendering failed: {e}"),
                source: None,
            })
    }

    /// Registers a custom template, replacing any template of the same name.
    ///
    /// # Errors
    ///
    /// Returns error if template string is invalid.
    ///
    /// # Examples
    ///
    /// ```
    /// use mcp_codegen::template_engine::TemplateEngine;
    ///
    /// let mut engine = TemplateEngine::new().unwrap();
    /// engine.register_template_string(
    ///     "custom",
    ///     "// Custom template: {{name}}"
    /// ).unwrap();
    /// ```
    pub fn register_template_string(&mut self, name: &str, template: &str) -> Result<()> {
        self.handlebars
            .register_template_string(name, template)
            .map_err(|e| Error::SerializationError {
                message: format!("Failed to register template '{name}': {e}"),
                source: None,
            })
    }

    /// Returns `true` if a template with this name is registered.
    #[must_use]
    pub fn has_template(&self, name: &str) -> bool {
        self.handlebars.has_template(name)
    }
}
