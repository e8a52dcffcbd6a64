//! Typed view of the JSON Schema subset used by MCP tool inputs.
//!
//! Tool schemas arrive as arbitrary JSON. [`SchemaNode::parse`] turns a
//! schema into a tagged tree and never fails: every fragment it cannot type
//! becomes [`SchemaNode::Unknown`] and leaves a [`SchemaWarning`] behind.
//!
//! # Examples
//!
//! ```
//! use mcp_codegen::schema::SchemaNode;
//! use serde_json::json;
//!
//! let (node, warnings) = SchemaNode::parse(&json!({
//!     "type": "object",
//!     "properties": {
//!         "org": {"type": "string"},
//!         "mode": {"type": "frobnicate"}
//!     }
//! }));
//!
//! let SchemaNode::Object(shape) = node else { panic!("expected object") };
//! assert_eq!(shape.properties.len(), 2);
//! assert_eq!(shape.properties[1].schema, SchemaNode::Unknown);
//! assert_eq!(warnings.len(), 1);
//! ```

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

/// Nesting depth past which nodes degrade to [`SchemaNode::Unknown`].
pub const MAX_DEPTH: usize = 32;

const ROOT_PATH: &str = "$";

/// Keywords that give a schema its own type.
const TYPE_KEYWORDS: [&str; 4] = ["type", "properties", "items", "enum"];

const COMBINATORS: [(&str, fn(Vec<SchemaNode>) -> SchemaNode); 3] = [
    ("anyOf", SchemaNode::Union),
    ("oneOf", SchemaNode::Union),
    ("allOf", SchemaNode::Intersection),
];

/// One schema fragment, reduced to the shapes the TypeScript renderer knows.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    /// `type: "string"`
    String,
    /// `type: "number"` or `type: "integer"`
    Number,
    /// `type: "boolean"`
    Boolean,
    /// `type: "null"`
    Null,
    /// A single scalar value from `const` or a one-element `enum`
    Literal(Value),
    /// Sequence of the item type
    Array(Box<SchemaNode>),
    /// Structural type with named members
    Object(ObjectShape),
    /// Any of the member types (`anyOf`, `oneOf`, `enum`, type arrays)
    Union(Vec<SchemaNode>),
    /// All of the member types (`allOf`)
    Intersection(Vec<SchemaNode>),
    /// Anything; used for missing, unrecognized or malformed fragments
    Unknown,
}

/// Members of an object schema, in authored order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectShape {
    /// Declared properties
    pub properties: Vec<Property>,
}

impl ObjectShape {
    /// Returns `true` if the object declares no properties.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

/// A named member of an object schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// Property name exactly as it appears in the schema
    pub name: String,
    /// Property type
    pub schema: SchemaNode,
    /// Whether the name is listed in the parent's `required`
    pub required: bool,
    /// Property `description`, if any
    pub description: Option<String>,
}

/// A schema fragment that could not be fully typed.
///
/// Warnings never abort generation. The fragment at `path` was rendered as
/// `unknown` instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaWarning {
    /// Location of the fragment, e.g. `$.filters[].kind`
    pub path: String,
    /// What was wrong with it
    pub message: String,
}

impl fmt::Display for SchemaWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

impl SchemaNode {
    /// Parses a schema fragment, collecting warnings for everything that
    /// degraded to `Unknown`.
    #[must_use]
    pub fn parse(schema: &Value) -> (Self, Vec<SchemaWarning>) {
        let mut parser = Parser::default();
        let node = parser.node(schema, ROOT_PATH, 0);
        (node, parser.warnings)
    }

    /// Parses a tool's top-level input schema.
    ///
    /// Anything other than an object schema means the tool takes no
    /// parameters, so the result is an empty shape. A nullable object
    /// (`type: ["object", "null"]`) and an `allOf` of objects both count as
    /// object schemas. Missing and `null` schemas are accepted silently;
    /// other non-object values produce a warning.
    #[must_use]
    pub fn parse_input(schema: &Value) -> (ObjectShape, Vec<SchemaWarning>) {
        if schema.is_null() {
            return (ObjectShape::default(), Vec::new());
        }

        let (node, mut warnings) = Self::parse(schema);
        let shape = match node {
            Self::Object(shape) => Some(shape),
            Self::Union(members) => nullable_object(members),
            Self::Intersection(members) if members.iter().all(is_object) => {
                Some(merge_members(ObjectShape::default(), members, true))
            }
            _ => None,
        };

        match shape {
            Some(shape) => (shape, warnings),
            None => {
                warnings.push(SchemaWarning {
                    path: ROOT_PATH.to_string(),
                    message: "input schema is not an object schema; treating as no parameters"
                        .to_string(),
                });
                (ObjectShape::default(), warnings)
            }
        }
    }

    /// Returns `true` for nodes that render as more than one type operand.
    #[must_use]
    pub const fn is_compound(&self) -> bool {
        matches!(self, Self::Union(_) | Self::Intersection(_))
    }
}

#[derive(Debug, Default)]
struct Parser {
    warnings: Vec<SchemaWarning>,
}

impl Parser {
    fn warn(&mut self, path: &str, message: impl Into<String>) -> SchemaNode {
        self.warnings.push(SchemaWarning {
            path: path.to_string(),
            message: message.into(),
        });
        SchemaNode::Unknown
    }

    fn node(&mut self, value: &Value, path: &str, depth: usize) -> SchemaNode {
        if depth > MAX_DEPTH {
            return self.warn(path, format!("nesting deeper than {MAX_DEPTH} levels"));
        }

        let obj = match value {
            Value::Object(obj) => obj,
            // `true` is the schema that accepts anything
            Value::Bool(true) => return SchemaNode::Unknown,
            other => return self.warn(path, format!("schema is not an object: {other}")),
        };

        if let Some(value) = obj.get("const") {
            return if is_scalar(value) {
                SchemaNode::Literal(value.clone())
            } else {
                self.warn(path, "const value is not a scalar")
            };
        }

        if !declares_type(obj) {
            for (key, build) in COMBINATORS {
                if let Some(variants) = obj.get(key) {
                    return self.combination(variants, &format!("{path}.{key}"), depth, build);
                }
            }
        }

        let node = self.own_type(obj, path, depth);
        self.refine(node, obj, path, depth)
    }

    /// Types a node from its `enum`, `type`, `properties` or `items`.
    fn own_type(&mut self, obj: &Map<String, Value>, path: &str, depth: usize) -> SchemaNode {
        if let Some(values) = obj.get("enum") {
            return self.enumeration(values, path);
        }

        match obj.get("type") {
            Some(Value::String(name)) => self.typed(name, obj, path, depth),
            Some(Value::Array(names)) => {
                let mut members = Vec::with_capacity(names.len());
                for name in names {
                    match name.as_str() {
                        Some(name) => members.push(self.typed(name, obj, path, depth)),
                        None => members.push(self.warn(path, format!("type entry is not a string: {name}"))),
                    }
                }
                collapse(members, SchemaNode::Union)
                    .unwrap_or_else(|| self.warn(path, "type array is empty"))
            }
            Some(other) => self.warn(path, format!("type must be a string or array, got {other}")),
            None if obj.contains_key("properties") => self.object(obj, path, depth),
            None if obj.contains_key("items") => self.array(obj, path, depth),
            None => self.warn(path, "no type given and none could be inferred"),
        }
    }

    /// Applies combinators found next to a declared type.
    ///
    /// Branches that only add constraints (`required`, `minLength`, ...) are
    /// skipped. Object branches of an object node contribute their members;
    /// members from `anyOf`/`oneOf` branches are optional. Any other typed
    /// branch is intersected with the node.
    fn refine(&mut self, mut node: SchemaNode, obj: &Map<String, Value>, path: &str, depth: usize) -> SchemaNode {
        for (key, build) in COMBINATORS {
            let variants = match obj.get(key) {
                None => continue,
                Some(Value::Array(variants)) => variants,
                Some(other) => {
                    self.warn(path, format!("{key} is not an array of schemas, ignored: {other}"));
                    continue;
                }
            };

            let branches: Vec<SchemaNode> = variants
                .iter()
                .enumerate()
                .filter(|(_, variant)| !is_constraint_only(variant))
                .map(|(i, variant)| self.node(variant, &format!("{path}.{key}[{i}]"), depth + 1))
                .collect();

            node = merge(node, branches, key == "allOf", build);
        }
        node
    }

    fn typed(&mut self, name: &str, obj: &Map<String, Value>, path: &str, depth: usize) -> SchemaNode {
        match name {
            "string" => SchemaNode::String,
            "number" | "integer" => SchemaNode::Number,
            "boolean" => SchemaNode::Boolean,
            "null" => SchemaNode::Null,
            "array" => self.array(obj, path, depth),
            "object" => self.object(obj, path, depth),
            other => self.warn(path, format!("unrecognized type '{other}'")),
        }
    }

    fn array(&mut self, obj: &Map<String, Value>, path: &str, depth: usize) -> SchemaNode {
        let item_path = format!("{path}[]");
        let item = match obj.get("items") {
            None => SchemaNode::Unknown,
            Some(items @ Value::Array(_)) => {
                self.warn(&item_path, format!("tuple-style items are not supported: {items}"))
            }
            Some(items) => self.node(items, &item_path, depth + 1),
        };
        SchemaNode::Array(Box::new(item))
    }

    fn object(&mut self, obj: &Map<String, Value>, path: &str, depth: usize) -> SchemaNode {
        let required: Vec<&str> = match obj.get("required") {
            None => Vec::new(),
            Some(Value::Array(names)) => names.iter().filter_map(Value::as_str).collect(),
            Some(other) => {
                self.warn(path, format!("required is not an array: {other}"));
                Vec::new()
            }
        };

        let properties = match obj.get("properties") {
            None => Vec::new(),
            Some(Value::Object(props)) => props
                .iter()
                .map(|(name, schema)| Property {
                    name: name.clone(),
                    schema: self.node(schema, &format!("{path}.{name}"), depth + 1),
                    required: required.contains(&name.as_str()),
                    description: schema
                        .get("description")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                })
                .collect(),
            Some(other) => {
                self.warn(path, format!("properties is not an object: {other}"));
                Vec::new()
            }
        };

        SchemaNode::Object(ObjectShape { properties })
    }

    fn enumeration(&mut self, values: &Value, path: &str) -> SchemaNode {
        let Value::Array(values) = values else {
            return self.warn(path, format!("enum is not an array: {values}"));
        };

        let mut literals: Vec<SchemaNode> = Vec::with_capacity(values.len());
        for value in values {
            if !is_scalar(value) {
                self.warn(path, format!("non-scalar enum value dropped: {value}"));
                continue;
            }
            let literal = SchemaNode::Literal(value.clone());
            if !literals.contains(&literal) {
                literals.push(literal);
            }
        }

        collapse(literals, SchemaNode::Union)
            .unwrap_or_else(|| self.warn(path, "enum has no usable values"))
    }

    fn combination(
        &mut self,
        variants: &Value,
        path: &str,
        depth: usize,
        build: fn(Vec<SchemaNode>) -> SchemaNode,
    ) -> SchemaNode {
        let Value::Array(variants) = variants else {
            return self.warn(path, format!("expected an array of schemas, got {variants}"));
        };

        let members: Vec<SchemaNode> = variants
            .iter()
            .enumerate()
            .map(|(i, variant)| self.node(variant, &format!("{path}[{i}]"), depth + 1))
            .collect();

        collapse(members, build).unwrap_or_else(|| self.warn(path, "no schemas to combine"))
    }
}

fn declares_type(obj: &Map<String, Value>) -> bool {
    TYPE_KEYWORDS.iter().any(|key| obj.contains_key(*key))
}

/// A branch like `{"required": ["a"]}` that narrows values without typing them.
fn is_constraint_only(value: &Value) -> bool {
    value.as_object().is_some_and(|obj| {
        !declares_type(obj)
            && !obj.contains_key("const")
            && COMBINATORS.iter().all(|(key, _)| !obj.contains_key(*key))
    })
}

const fn is_object(node: &SchemaNode) -> bool {
    matches!(node, SchemaNode::Object(_))
}

/// Combines a typed node with the typed branches of one combinator.
fn merge(
    node: SchemaNode,
    branches: Vec<SchemaNode>,
    all_required: bool,
    build: fn(Vec<SchemaNode>) -> SchemaNode,
) -> SchemaNode {
    if branches.is_empty() {
        return node;
    }

    match node {
        SchemaNode::Object(shape) if branches.iter().all(is_object) => {
            SchemaNode::Object(merge_members(shape, branches, all_required))
        }
        SchemaNode::Unknown => collapse(branches, build).unwrap_or(SchemaNode::Unknown),
        // `T & unknown` is `T`
        node => match collapse(branches, build) {
            None | Some(SchemaNode::Unknown) => node,
            Some(refinement) => SchemaNode::Intersection(vec![node, refinement]),
        },
    }
}

/// Appends the members of object branches to `shape`.
///
/// Members already declared keep their type. Required flags carry over only
/// when every branch applies (`allOf`).
fn merge_members(mut shape: ObjectShape, branches: Vec<SchemaNode>, all_required: bool) -> ObjectShape {
    for branch in branches {
        let SchemaNode::Object(extra) = branch else {
            continue;
        };
        for property in extra.properties {
            let required = all_required && property.required;
            match shape.properties.iter_mut().find(|p| p.name == property.name) {
                Some(existing) => existing.required |= required,
                None => shape.properties.push(Property { required, ..property }),
            }
        }
    }
    shape
}

/// Unwraps `Object | null`, the only union accepted as an input schema.
fn nullable_object(members: Vec<SchemaNode>) -> Option<ObjectShape> {
    let mut shape = None;
    for member in members {
        match member {
            SchemaNode::Null => {}
            SchemaNode::Object(object) if shape.is_none() => shape = Some(object),
            _ => return None,
        }
    }
    shape
}

fn is_scalar(value: &Value) -> bool {
    matches!(
        value,
        Value::String(_) | Value::Number(_) | Value::Bool(_) | Value::Null
    )
}

/// Builds a compound node, unwrapping single members.
///
/// A compound containing `Unknown` is itself `Unknown`, since `unknown`
/// absorbs every other operand.
fn collapse(mut members: Vec<SchemaNode>, build: fn(Vec<SchemaNode>) -> SchemaNode) -> Option<SchemaNode> {
    match members.len() {
        0 => None,
        1 => members.pop(),
        _ if members.contains(&SchemaNode::Unknown) => Some(SchemaNode::Unknown),
        _ => Some(build(members)),
    }
}
