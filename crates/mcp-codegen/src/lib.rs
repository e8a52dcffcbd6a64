//! Tool classification and TypeScript generation for MCP tools.
//!
//! The pipeline stages after discovery live here:
//!
//! - [`categorize`]: ordered, rule-based partition of tools into categories
//! - [`schema`]: tolerant parsing of tool input schemas into a typed tree
//! - [`typescript`]: identifier derivation and TypeScript rendering
//! - [`generator`]: one [`GeneratedInterface`] per tool, grouped by category
//! - [`template_engine`]: Handlebars templates for the skill package files

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod categorize;
pub mod generator;
pub mod schema;
pub mod template_engine;
pub mod types;
pub mod typescript;

pub use categorize::{Categorization, Category, CategoryTemplate, ClassificationRule, Classifier, RuleSpec};
pub use generator::{
    CollisionPolicy, GeneratedCategory, GeneratedInterface, GenerationConfig, InterfaceGenerator,
};
pub use schema::{SchemaNode, SchemaWarning};
pub use template_engine::TemplateEngine;
pub use types::{GeneratedCode, GeneratedFile};
