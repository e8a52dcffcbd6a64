//! Interface generation: joins classification and schema translation.
//!
//! For every tool the generator allocates a type identifier, translates the
//! input schema and produces a [`GeneratedInterface`]. Results are grouped
//! per category so the package assembler can key them by
//! `(category key, tool name)`.
//!
//! # Examples
//!
//! ```
//! use mcp_codegen::categorize::Classifier;
//! use mcp_codegen::generator::{GenerationConfig, InterfaceGenerator};
//! use mcp_introspector::ToolInfo;
//! use serde_json::json;
//!
//! let tools = vec![ToolInfo::new(
//!     "get_run",
//!     Some("Fetch a run"),
//!     json!({"type": "object", "properties": {"run_id": {"type": "string"}}, "required": ["run_id"]}),
//! )];
//! let categorization = Classifier::with_default_rules()?.classify(tools);
//!
//! let generator = InterfaceGenerator::new(GenerationConfig::default());
//! let categories = generator.generate(&categorization)?;
//!
//! let interface = &categories[0].interfaces[0];
//! assert_eq!(interface.input_type_name, "GetRunInput");
//! assert_eq!(interface.function_name, "getRun");
//! assert!(interface.source_text.contains("run_id: string;"));
//! # Ok::<(), mcp_core::Error>(())
//! ```

use crate::categorize::{Categorization, Category};
use crate::schema::{SchemaNode, SchemaWarning};
use crate::typescript::{doc_comment, lower_first, render_interface, tool_identifier};
use mcp_core::{Error, Result, ToolName};
use mcp_introspector::ToolInfo;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, warn};

/// Name of the shared output envelope type declared in `types.ts`.
pub const RESULT_TYPE: &str = "ToolResult";

/// What to do when two tool names map to the same identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Append `2`, `3`, ... to later tools, in discovery order
    #[default]
    Suffix,
    /// Fail with `Error::NameCollision`
    Reject,
}

impl CollisionPolicy {
    /// Returns the policy name as used in configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Suffix => "suffix",
            Self::Reject => "reject",
        }
    }
}

impl fmt::Display for CollisionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollisionPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "suffix" => Ok(Self::Suffix),
            "reject" => Ok(Self::Reject),
            _ => Err(Error::InvalidArgument(format!(
                "invalid collision policy '{s}', expected 'suffix' or 'reject'"
            ))),
        }
    }
}

/// Code generation settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Identifier collision handling
    pub collision_policy: CollisionPolicy,
}

/// Generated TypeScript declarations for one tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedInterface {
    /// Tool name as the server reports it
    pub tool_name: ToolName,
    /// Tool description, if any
    pub description: Option<String>,
    /// PascalCase base identifier, unique within the run
    pub identifier: String,
    /// Name of the input interface, `{identifier}Input`
    pub input_type_name: String,
    /// Name of the output type, `{identifier}Output`
    pub output_type_name: String,
    /// camelCase function name; also the file stem
    pub function_name: String,
    /// Input interface and output type declarations
    pub source_text: String,
    /// Schema fragments that degraded to `unknown`
    pub warnings: Vec<SchemaWarning>,
}

/// Generated interfaces for one category, in discovery order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedCategory {
    /// Category slug
    pub key: String,
    /// Display name
    pub name: String,
    /// Description for the manifest
    pub description: String,
    /// One interface per tool
    pub interfaces: Vec<GeneratedInterface>,
}

/// Translates categorized tools into TypeScript declarations.
#[derive(Debug, Clone, Copy, Default)]
pub struct InterfaceGenerator {
    config: GenerationConfig,
}

impl InterfaceGenerator {
    /// Creates a generator.
    #[must_use]
    pub const fn new(config: GenerationConfig) -> Self {
        Self { config }
    }

    /// Generates declarations for every tool, grouped by category.
    ///
    /// Categories keep their order from the categorization. Schema problems
    /// are recorded as warnings on the affected interface and never fail
    /// the run.
    ///
    /// # Errors
    ///
    /// Returns `Error::NameCollision` under [`CollisionPolicy::Reject`] if two
    /// tool names map to the same identifier.
    pub fn generate(&self, categorization: &Categorization) -> Result<Vec<GeneratedCategory>> {
        let identifiers = self.allocate_identifiers(
            categorization
                .tools_in_discovery_order()
                .map(|(_, tool)| &tool.name),
        )?;

        let categories: Vec<GeneratedCategory> = categorization
            .categories()
            .iter()
            .map(|category| generate_category(category, &identifiers))
            .collect();

        let warnings: usize = categories
            .iter()
            .flat_map(|c| &c.interfaces)
            .map(|i| i.warnings.len())
            .sum();
        info!(
            "Generated {} interfaces in {} categories ({warnings} schema warnings)",
            categorization.tool_count(),
            categories.len()
        );

        Ok(categories)
    }

    /// Assigns a unique identifier to every tool name, in the given order.
    fn allocate_identifiers<'a>(
        &self,
        names: impl Iterator<Item = &'a ToolName>,
    ) -> Result<HashMap<ToolName, String>> {
        // keyed by lowercase so generated file names stay distinct on
        // case-insensitive filesystems
        let mut taken: HashMap<String, &'a ToolName> = HashMap::new();
        let mut assigned = HashMap::new();

        for name in names {
            let base = tool_identifier(name.as_str());

            let identifier = match taken.get(&base.to_lowercase()) {
                None => base,
                Some(first) => match self.config.collision_policy {
                    CollisionPolicy::Reject => {
                        return Err(Error::NameCollision {
                            identifier: base,
                            first: first.to_string(),
                            second: name.to_string(),
                        });
                    }
                    CollisionPolicy::Suffix => {
                        let mut n = 2;
                        let identifier = loop {
                            let candidate = format!("{base}{n}");
                            if !taken.contains_key(&candidate.to_lowercase()) {
                                break candidate;
                            }
                            n += 1;
                        };
                        warn!(
                            "Tools '{first}' and '{name}' both map to an identifier; using '{identifier}' for '{name}'"
                        );
                        identifier
                    }
                },
            };

            taken.insert(identifier.to_lowercase(), name);
            assigned.insert(name.clone(), identifier);
        }

        Ok(assigned)
    }
}

fn generate_category(
    category: &Category,
    identifiers: &HashMap<ToolName, String>,
) -> GeneratedCategory {
    let interfaces = category
        .tools
        .iter()
        .map(|tool| {
            let identifier = identifiers
                .get(&tool.name)
                .cloned()
                .unwrap_or_else(|| tool_identifier(tool.name.as_str()));
            generate_interface(tool, identifier)
        })
        .collect();

    GeneratedCategory {
        key: category.key.clone(),
        name: category.name.clone(),
        description: category.description.clone(),
        interfaces,
    }
}

/// Translates one tool under a pre-allocated identifier.
#[must_use]
pub fn generate_interface(tool: &ToolInfo, identifier: String) -> GeneratedInterface {
    let input_type_name = format!("{identifier}Input");
    let output_type_name = format!("{identifier}Output");

    let (shape, warnings) = SchemaNode::parse_input(&tool.input_schema);
    for warning in &warnings {
        warn!(tool = %tool.name, "Schema fragment degraded to unknown: {warning}");
    }

    let mut source_text = doc_comment(&format!("Parameters for `{}`.", tool.name), "");
    source_text.push_str(&render_interface(&input_type_name, &shape));
    source_text.push('\n');
    source_text.push_str(&doc_comment(&format!("Result of `{}`.", tool.name), ""));
    source_text.push_str(&format!("export type {output_type_name} = {RESULT_TYPE};\n"));

    debug!(tool = %tool.name, identifier = %identifier, "Generated interface");

    GeneratedInterface {
        tool_name: tool.name.clone(),
        description: tool.description.clone(),
        function_name: lower_first(&identifier),
        identifier,
        input_type_name,
        output_type_name,
        source_text,
        warnings,
    }
}
