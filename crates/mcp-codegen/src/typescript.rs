//! TypeScript rendering for schema trees and tool names.
//!
//! # Examples
//!
//! ```
//! use mcp_codegen::schema::SchemaNode;
//! use mcp_codegen::typescript::{render_type, to_camel_case, to_pascal_case};
//! use serde_json::json;
//!
//! assert_eq!(to_pascal_case("list_workspace-variables"), "ListWorkspaceVariables");
//! assert_eq!(to_camel_case("list_workspace-variables"), "listWorkspaceVariables");
//!
//! let (node, _) = SchemaNode::parse(&json!({"type": "string", "enum": ["plan", "apply"]}));
//! assert_eq!(render_type(&node, 0), r#""plan" | "apply""#);
//! ```

use crate::schema::{ObjectShape, SchemaNode};
use serde_json::Value;

const INDENT: &str = "  ";

/// Identifier used when a tool name contains no alphanumerics.
pub const FALLBACK_IDENTIFIER: &str = "Tool";

/// Index signature added to every structural type.
pub const INDEX_SIGNATURE: &str = "[key: string]: unknown;";

fn words(name: &str) -> impl Iterator<Item = &str> {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
}

/// Converts a tool name to a PascalCase type identifier.
///
/// The name is split on every non-alphanumeric character and the parts are
/// joined with their first letter capitalized. Names with no alphanumerics
/// become `Tool`; names starting with a digit are prefixed with `Tool`.
///
/// # Examples
///
/// ```
/// use mcp_codegen::typescript::to_pascal_case;
///
/// assert_eq!(to_pascal_case("send_message"), "SendMessage");
/// assert_eq!(to_pascal_case("get-run"), "GetRun");
/// assert_eq!(to_pascal_case("getUserData"), "GetUserData");
/// assert_eq!(to_pascal_case("3d.render"), "Tool3dRender");
/// assert_eq!(to_pascal_case("--"), "Tool");
/// ```
#[must_use]
pub fn to_pascal_case(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    for word in words(name) {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            result.push(first.to_ascii_uppercase());
            result.push_str(chars.as_str());
        }
    }

    if result.is_empty() {
        FALLBACK_IDENTIFIER.to_string()
    } else if result.starts_with(|c: char| c.is_ascii_digit()) {
        format!("{FALLBACK_IDENTIFIER}{result}")
    } else {
        result
    }
}

/// Words that cannot name a function declaration in a TypeScript module.
const RESERVED_WORDS: &[&str] = &[
    "arguments", "await", "break", "case", "catch", "class", "const", "continue", "debugger",
    "default", "delete", "do", "else", "enum", "eval", "export", "extends", "false", "finally",
    "for", "function", "if", "implements", "import", "in", "instanceof", "interface", "let",
    "new", "null", "package", "private", "protected", "public", "return", "static", "super",
    "switch", "this", "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield",
];

/// Returns `true` if `identifier` is a reserved word in TypeScript strict mode.
#[must_use]
pub fn is_reserved_word(identifier: &str) -> bool {
    RESERVED_WORDS.contains(&identifier)
}

/// Converts a tool name to the PascalCase identifier its generated code is
/// named after.
///
/// Same as [`to_pascal_case`], except that `Tool` is appended when the
/// camelCase form would be a reserved word.
///
/// # Examples
///
/// ```
/// use mcp_codegen::typescript::tool_identifier;
///
/// assert_eq!(tool_identifier("get_run"), "GetRun");
/// assert_eq!(tool_identifier("delete"), "DeleteTool");
/// ```
#[must_use]
pub fn tool_identifier(name: &str) -> String {
    let base = to_pascal_case(name);
    if is_reserved_word(&lower_first(&base)) {
        format!("{base}{FALLBACK_IDENTIFIER}")
    } else {
        base
    }
}

/// Converts a tool name to a camelCase function identifier.
///
/// # Examples
///
/// ```
/// use mcp_codegen::typescript::to_camel_case;
///
/// assert_eq!(to_camel_case("send_message"), "sendMessage");
/// assert_eq!(to_camel_case("hello"), "hello");
/// assert_eq!(to_camel_case("new"), "newTool");
/// ```
#[must_use]
pub fn to_camel_case(name: &str) -> String {
    lower_first(&tool_identifier(name))
}

/// Lowercases the first character of an identifier.
#[must_use]
pub fn lower_first(identifier: &str) -> String {
    let mut chars = identifier.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
    }
}

/// Returns `true` if `name` can be used unquoted as a property name.
#[must_use]
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Renders a property name, quoting it when it is not an identifier.
#[must_use]
pub fn property_key(name: &str) -> String {
    if is_identifier(name) {
        name.to_string()
    } else {
        string_literal(name)
    }
}

fn string_literal(value: &str) -> String {
    Value::String(value.to_string()).to_string()
}

/// Renders a `/** ... */` doc comment at the given indentation.
///
/// `*/` inside the text is escaped so the comment cannot be closed early.
/// Returns an empty string for blank text.
///
/// # Examples
///
/// ```
/// use mcp_codegen::typescript::doc_comment;
///
/// assert_eq!(doc_comment("Run ID", "  "), "  /** Run ID */\n");
/// assert_eq!(doc_comment("a */ b", ""), "/** a *\\/ b */\n");
/// ```
#[must_use]
pub fn doc_comment(text: &str, indent: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        return String::new();
    }

    let escaped = text.replace("*/", "*\\/");
    let lines: Vec<&str> = escaped.lines().map(str::trim_end).collect();
    if lines.len() == 1 {
        return format!("{indent}/** {} */\n", lines[0]);
    }

    let mut out = format!("{indent}/**\n");
    for line in lines {
        if line.is_empty() {
            out.push_str(&format!("{indent} *\n"));
        } else {
            out.push_str(&format!("{indent} * {line}\n"));
        }
    }
    out.push_str(&format!("{indent} */\n"));
    out
}

/// Renders a schema node as a TypeScript type expression.
///
/// `depth` is the indentation level of the line the expression starts on;
/// nested object literals are indented one level deeper.
#[must_use]
pub fn render_type(node: &SchemaNode, depth: usize) -> String {
    match node {
        SchemaNode::String => "string".to_string(),
        SchemaNode::Number => "number".to_string(),
        SchemaNode::Boolean => "boolean".to_string(),
        SchemaNode::Null => "null".to_string(),
        SchemaNode::Unknown => "unknown".to_string(),
        SchemaNode::Literal(value) => value.to_string(),
        SchemaNode::Array(item) => {
            let inner = render_type(item, depth);
            if item.is_compound() {
                format!("({inner})[]")
            } else {
                format!("{inner}[]")
            }
        }
        SchemaNode::Union(members) => join_operands(members, " | ", depth),
        SchemaNode::Intersection(members) => join_operands(members, " & ", depth),
        SchemaNode::Object(shape) => format!(
            "{{\n{}{}}}",
            render_members(shape, depth + 1),
            INDENT.repeat(depth)
        ),
    }
}

fn join_operands(members: &[SchemaNode], separator: &str, depth: usize) -> String {
    members
        .iter()
        .map(|member| {
            let rendered = render_type(member, depth);
            if member.is_compound() {
                format!("({rendered})")
            } else {
                rendered
            }
        })
        .collect::<Vec<_>>()
        .join(separator)
}

/// Renders the member lines of an object type, ending with the index
/// signature, each on its own line at the given indentation level.
#[must_use]
pub fn render_members(shape: &ObjectShape, depth: usize) -> String {
    let indent = INDENT.repeat(depth);
    let mut out = String::new();

    for property in &shape.properties {
        if let Some(description) = &property.description {
            out.push_str(&doc_comment(description, &indent));
        }
        out.push_str(&format!(
            "{indent}{}{}: {};\n",
            property_key(&property.name),
            if property.required { "" } else { "?" },
            render_type(&property.schema, depth)
        ));
    }

    out.push_str(&format!("{indent}{INDEX_SIGNATURE}\n"));
    out
}

/// Renders an exported interface declaration for an object shape.
///
/// # Examples
///
/// ```
/// use mcp_codegen::schema::SchemaNode;
/// use mcp_codegen::typescript::render_interface;
/// use serde_json::json;
///
/// let (shape, _) = SchemaNode::parse_input(&json!({
///     "type": "object",
///     "properties": {"x": {"type": "string"}, "y": {"type": "number"}},
///     "required": ["x"]
/// }));
///
/// let ts = render_interface("PointInput", &shape);
/// assert!(ts.contains("  x: string;"));
/// assert!(ts.contains("  y?: number;"));
/// ```
#[must_use]
pub fn render_interface(name: &str, shape: &ObjectShape) -> String {
    format!("export interface {name} {{\n{}}}\n", render_members(shape, 1))
}
