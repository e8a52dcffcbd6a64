//! Package assembly: turns generated interfaces into the skill's files.
//!
//! The package layout is:
//!
//! ```text
//! SKILL.md                 manifest, tools grouped by category
//! types.ts                 shared output envelope and tool caller
//! index.ts                 re-exports every category
//! <category>/index.ts      re-exports the category's tools
//! <category>/<function>.ts one typed function per tool
//! ```

use crate::types::{SkillMetadata, sanitize_string, summary_line};
use mcp_codegen::typescript::doc_comment;
use mcp_codegen::{GeneratedCategory, GeneratedCode, GeneratedFile, GeneratedInterface, TemplateEngine};
use mcp_core::{Error, Result};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, info};

/// Manifest file name.
pub const MANIFEST_FILE: &str = "SKILL.md";

#[derive(Debug, Serialize)]
struct ManifestContext<'a> {
    skill_name: &'a str,
    description: String,
    server_name: String,
    server_version: String,
    server_command: &'a str,
    generator_version: &'a str,
    generated_at: String,
    tool_count: usize,
    category_count: usize,
    categories: Vec<ManifestCategory>,
}

#[derive(Debug, Serialize)]
struct ManifestCategory {
    name: String,
    description: String,
    tools: Vec<ManifestTool>,
}

#[derive(Debug, Serialize)]
struct ManifestTool {
    tool_name: String,
    function_name: String,
    path: String,
    summary: String,
}

#[derive(Debug, Serialize)]
struct HeaderContext<'a> {
    generator_version: &'a str,
    server_name: String,
}

#[derive(Debug, Serialize)]
struct IndexContext<'a> {
    generator_version: &'a str,
    server_name: String,
    categories: &'a [GeneratedCategory],
}

#[derive(Debug, Serialize)]
struct CategoryIndexContext<'a> {
    generator_version: &'a str,
    name: &'a str,
    summary: String,
    tools: &'a [GeneratedInterface],
}

#[derive(Debug, Serialize)]
struct ToolContext<'a> {
    generator_version: &'a str,
    server_id_literal: String,
    tool_name_literal: String,
    source_text: &'a str,
    doc: String,
    function_name: &'a str,
    input_type_name: &'a str,
    output_type_name: &'a str,
}

/// Renders skill packages from generated interfaces.
///
/// # Examples
///
/// ```no_run
/// use mcp_skill_generator::{SkillAssembler, SkillMetadata};
/// use mcp_codegen::GeneratedCategory;
///
/// # fn example(metadata: SkillMetadata, categories: Vec<GeneratedCategory>) -> mcp_core::Result<()> {
/// let assembler = SkillAssembler::new()?;
/// let code = assembler.assemble(&metadata, &categories)?;
/// println!("{} files", code.file_count());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SkillAssembler<'a> {
    engine: TemplateEngine<'a>,
}

impl<'a> SkillAssembler<'a> {
    /// Creates an assembler with the built-in templates.
    ///
    /// # Errors
    ///
    /// Returns error if template registration fails.
    pub fn new() -> Result<Self> {
        Ok(Self {
            engine: TemplateEngine::new()?,
        })
    }

    /// Renders every file of the package.
    ///
    /// Each tool appears exactly once, under its category's directory.
    ///
    /// # Errors
    ///
    /// Returns `Error::SerializationError` if a template fails to render and
    /// `Error::ValidationError` if two files would share a path.
    pub fn assemble(
        &self,
        metadata: &SkillMetadata,
        categories: &[GeneratedCategory],
    ) -> Result<GeneratedCode> {
        let version = metadata.generator_version.as_str();
        let server_name = summary_line(&metadata.server_name);
        let mut code = GeneratedCode::new();

        code.add_file(GeneratedFile::new(
            MANIFEST_FILE,
            self.engine.render("skill/manifest", &manifest_context(metadata, categories))?,
        ));
        code.add_file(GeneratedFile::new(
            "types.ts",
            self.engine.render(
                "skill/types",
                &HeaderContext {
                    generator_version: version,
                    server_name: server_name.clone(),
                },
            )?,
        ));
        code.add_file(GeneratedFile::new(
            "index.ts",
            self.engine.render(
                "skill/index",
                &IndexContext {
                    generator_version: version,
                    server_name,
                    categories,
                },
            )?,
        ));

        for category in categories {
            code.add_file(GeneratedFile::new(
                format!("{}/index.ts", category.key),
                self.engine.render(
                    "skill/category-index",
                    &CategoryIndexContext {
                        generator_version: version,
                        name: &category.name,
                        summary: summary_line(&category.description),
                        tools: &category.interfaces,
                    },
                )?,
            ));

            for interface in &category.interfaces {
                let context = ToolContext {
                    generator_version: version,
                    server_id_literal: Value::from(metadata.server_id.as_str()).to_string(),
                    tool_name_literal: Value::from(interface.tool_name.as_str()).to_string(),
                    source_text: &interface.source_text,
                    doc: interface
                        .description
                        .as_deref()
                        .map(|d| doc_comment(&sanitize_string(d), ""))
                        .unwrap_or_default(),
                    function_name: &interface.function_name,
                    input_type_name: &interface.input_type_name,
                    output_type_name: &interface.output_type_name,
                };
                let path = tool_path(&category.key, interface);
                debug!("Rendered {path}");
                code.add_file(GeneratedFile::new(path, self.engine.render("skill/tool", &context)?));
            }
        }

        ensure_unique_paths(&code)?;

        info!(
            "Assembled skill '{}': {} files for {} tools",
            metadata.name,
            code.file_count(),
            metadata.tool_count
        );
        Ok(code)
    }
}

fn tool_path(category_key: &str, interface: &GeneratedInterface) -> String {
    format!("{category_key}/{}.ts", interface.function_name)
}

fn manifest_context<'a>(
    metadata: &'a SkillMetadata,
    categories: &[GeneratedCategory],
) -> ManifestContext<'a> {
    ManifestContext {
        skill_name: metadata.name.as_str(),
        description: summary_line(&metadata.description),
        server_name: summary_line(&metadata.server_name),
        server_version: summary_line(&metadata.server_version),
        server_command: &metadata.server_command,
        generator_version: &metadata.generator_version,
        generated_at: metadata.generated_at.to_rfc3339(),
        tool_count: categories.iter().map(|c| c.interfaces.len()).sum(),
        category_count: categories.len(),
        categories: categories
            .iter()
            .map(|category| ManifestCategory {
                name: summary_line(&category.name),
                description: summary_line(&category.description),
                tools: category
                    .interfaces
                    .iter()
                    .map(|interface| ManifestTool {
                        tool_name: summary_line(interface.tool_name.as_str()),
                        function_name: interface.function_name.clone(),
                        path: tool_path(&category.key, interface),
                        summary: summary_line(interface.description.as_deref().unwrap_or_default()),
                    })
                    .collect(),
            })
            .collect(),
    }
}

fn ensure_unique_paths(code: &GeneratedCode) -> Result<()> {
    let mut seen = HashSet::new();
    for file in code.files() {
        // compared case-insensitively; packages are often checked out on
        // case-insensitive filesystems
        if !seen.insert(file.path().to_lowercase()) {
            return Err(Error::ValidationError {
                field: "package layout".to_string(),
                reason: format!("two generated files share the path '{}'", file.path()),
            });
        }
    }
    Ok(())
}
