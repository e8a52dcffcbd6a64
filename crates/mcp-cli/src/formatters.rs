//! Output formatters for CLI commands.
//!
//! Every command builds a serializable report and hands it to
//! [`format_output`]. JSON is for machines, text is an uncolored outline for
//! scripts and logs, pretty is the same outline with colors.

use anyhow::Result;
use colored::Colorize;
use mcp_core::cli::OutputFormat;
use serde::Serialize;
use serde_json::Value;

/// Formats data according to the specified output format.
///
/// # Errors
///
/// Returns an error if the data cannot be serialized.
///
/// # Examples
///
/// ```
/// use mcp_skill_cli::formatters::format_output;
/// use mcp_core::cli::OutputFormat;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Summary {
///     skill: String,
///     tool_count: usize,
/// }
///
/// let summary = Summary { skill: "terraform".to_string(), tool_count: 24 };
///
/// let output = format_output(&summary, OutputFormat::Json)?;
/// assert!(output.contains("\"tool_count\": 24"));
///
/// let output = format_output(&summary, OutputFormat::Text)?;
/// assert_eq!(output, "skill: terraform\ntool_count: 24");
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn format_output<T: Serialize>(data: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => json::format(data),
        OutputFormat::Text => text::format(data),
        OutputFormat::Pretty => pretty::format(data),
    }
}

/// JSON output formatting.
pub mod json {
    use super::{Result, Serialize};

    /// Formats data as JSON with 2-space indentation.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(data)?)
    }
}

/// Plain text output formatting.
pub mod text {
    use super::{Result, Serialize, outline};

    /// Formats data as an uncolored `key: value` outline.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        let value = serde_json::to_value(data)?;
        Ok(outline(&value, false))
    }
}

/// Pretty (human-readable) output formatting.
pub mod pretty {
    use super::{Result, Serialize, outline};

    /// Formats data as a colored `key: value` outline.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        let value = serde_json::to_value(data)?;
        Ok(outline(&value, true))
    }
}

fn outline(value: &Value, color: bool) -> String {
    let mut lines = Vec::new();
    match value {
        Value::Object(_) | Value::Array(_) => write_nested(value, 0, color, &mut lines),
        scalar => lines.push(scalar_text(scalar, color)),
    }
    lines.join("\n")
}

fn write_nested(value: &Value, indent: usize, color: bool, lines: &mut Vec<String>) {
    let pad = "  ".repeat(indent);
    match value {
        Value::Object(map) => {
            for (key, item) in map {
                let key = if color {
                    key.blue().bold().to_string()
                } else {
                    key.clone()
                };
                if is_leaf(item) {
                    lines.push(format!("{pad}{key}: {}", scalar_text(item, color)));
                } else {
                    lines.push(format!("{pad}{key}:"));
                    write_nested(item, indent + 1, color, lines);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                if is_leaf(item) {
                    lines.push(format!("{pad}- {}", scalar_text(item, color)));
                } else {
                    lines.push(format!("{pad}-"));
                    write_nested(item, indent + 1, color, lines);
                }
            }
        }
        scalar => lines.push(format!("{pad}{}", scalar_text(scalar, color))),
    }
}

// Empty containers print inline as `[]` / `{}`.
fn is_leaf(value: &Value) -> bool {
    match value {
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => true,
    }
}

fn scalar_text(value: &Value, color: bool) -> String {
    let plain = match value {
        Value::String(s) => s.clone(),
        Value::Array(_) => "[]".to_string(),
        Value::Object(_) => "{}".to_string(),
        other => other.to_string(),
    };
    if !color {
        return plain;
    }
    match value {
        Value::Null => plain.dimmed().to_string(),
        Value::Bool(_) => plain.yellow().to_string(),
        Value::Number(_) => plain.cyan().to_string(),
        Value::String(_) => plain.green().to_string(),
        _ => plain,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Category {
        key: String,
        tools: Vec<String>,
    }

    #[derive(Serialize)]
    struct Report {
        server: String,
        tool_count: usize,
        fallback_used: bool,
        version: Option<String>,
        categories: Vec<Category>,
    }

    fn report() -> Report {
        Report {
            server: "terraform".to_string(),
            tool_count: 2,
            fallback_used: false,
            version: None,
            categories: vec![
                Category {
                    key: "runs".to_string(),
                    tools: vec!["get_run".to_string(), "list_runs".to_string()],
                },
                Category {
                    key: "other".to_string(),
                    tools: Vec::new(),
                },
            ],
        }
    }

    #[test]
    fn test_json_format() {
        let output = json::format(&report()).unwrap();
        let parsed: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["tool_count"], 2);
        assert_eq!(parsed["categories"][0]["tools"][1], "list_runs");
    }

    #[test]
    fn test_text_format_is_outline() {
        let output = text::format(&report()).unwrap();
        let expected = "\
server: terraform
tool_count: 2
fallback_used: false
version: null
categories:
  -
    key: runs
    tools:
      - get_run
      - list_runs
  -
    key: other
    tools: []";
        assert_eq!(output, expected);
    }

    #[test]
    fn test_pretty_contains_values() {
        let output = pretty::format(&report()).unwrap();
        assert!(output.contains("terraform"));
        assert!(output.contains("list_runs"));
        assert!(output.contains("tool_count"));
    }

    #[test]
    fn test_scalar_top_level() {
        assert_eq!(text::format(&"hello").unwrap(), "hello");
        assert_eq!(text::format(&42).unwrap(), "42");
    }

    #[test]
    fn test_format_output_dispatch() {
        assert!(
            format_output(&report(), OutputFormat::Json)
                .unwrap()
                .starts_with('{')
        );
        assert!(
            format_output(&report(), OutputFormat::Text)
                .unwrap()
                .starts_with("server: terraform")
        );
    }
}
