//! Skill package metadata and text helpers.

use chrono::{DateTime, Utc};
use mcp_core::{Error, Result, ServerConfig, ServerId};
use mcp_introspector::ServerInfo;
use serde::{Deserialize, Serialize};
use std::fmt;

const MAX_NAME_LEN: usize = 64;
const DEFAULT_SKILL_NAME: &str = "mcp-skill";

/// Validated skill name (newtype over String).
///
/// Names must be 1-64 characters, contain only lowercase letters,
/// numbers, hyphens, and underscores, start with a letter, and
/// end with a letter or number.
///
/// # Examples
///
/// ```
/// use mcp_skill_generator::SkillName;
///
/// let name = SkillName::new("terraform")?;
/// assert_eq!(name.as_str(), "terraform");
///
/// assert!(SkillName::new("").is_err());              // Empty
/// assert!(SkillName::new("123start").is_err());      // Starts with number
/// assert!(SkillName::new("invalid-").is_err());      // Ends with hyphen
/// assert!(SkillName::new("Invalid").is_err());       // Uppercase
/// assert!(SkillName::new("a".repeat(65)).is_err());  // Too long
/// # Ok::<(), mcp_core::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SkillName(String);

impl SkillName {
    /// Creates a new validated skill name.
    ///
    /// # Errors
    ///
    /// Returns `Error::ValidationError` if the name doesn't match the
    /// naming rules.
    pub fn new(name: impl AsRef<str>) -> Result<Self> {
        let name = name.as_ref();
        let invalid = |reason: String| Error::ValidationError {
            field: "skill name".to_string(),
            reason: format!("'{name}': {reason}"),
        };

        if name.is_empty() {
            return Err(invalid("cannot be empty".to_string()));
        }
        if name.len() > MAX_NAME_LEN {
            return Err(invalid(format!(
                "too long ({} > {MAX_NAME_LEN} characters)",
                name.len()
            )));
        }
        if !name.starts_with(|c: char| c.is_ascii_lowercase()) {
            return Err(invalid("must start with a lowercase letter".to_string()));
        }
        if !name.ends_with(|c: char| c.is_ascii_lowercase() || c.is_ascii_digit()) {
            return Err(invalid("must end with a letter or number".to_string()));
        }
        if let Some(ch) = name
            .chars()
            .find(|&c| !c.is_ascii_lowercase() && !c.is_ascii_digit() && c != '-' && c != '_')
        {
            return Err(invalid(format!(
                "invalid character '{ch}'; only lowercase letters, numbers, hyphens, and underscores allowed"
            )));
        }

        Ok(Self(name.to_string()))
    }

    /// Derives a valid name from an arbitrary server identifier.
    ///
    /// Lowercases, replaces other characters with `-`, trims to the naming
    /// rules and falls back to `mcp-skill` when nothing usable remains.
    ///
    /// # Examples
    ///
    /// ```
    /// use mcp_core::ServerId;
    /// use mcp_skill_generator::SkillName;
    ///
    /// assert_eq!(SkillName::derive(&ServerId::new("Terraform MCP Server")).as_str(), "terraform-mcp-server");
    /// assert_eq!(SkillName::derive(&ServerId::new("2fa.server")).as_str(), "fa-server");
    /// assert_eq!(SkillName::derive(&ServerId::new("@@")).as_str(), "mcp-skill");
    /// ```
    #[must_use]
    pub fn derive(server_id: &ServerId) -> Self {
        let mut slug = String::with_capacity(server_id.as_str().len());
        for c in server_id.as_str().chars() {
            let c = c.to_ascii_lowercase();
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' {
                slug.push(c);
            } else if !slug.ends_with('-') {
                slug.push('-');
            }
        }

        let start = slug.find(|c: char| c.is_ascii_lowercase()).unwrap_or(slug.len());
        let mut slug = slug[start..].to_string();
        slug.truncate(MAX_NAME_LEN);
        let slug = slug.trim_end_matches(|c: char| !c.is_ascii_alphanumeric());

        Self::new(slug).unwrap_or_else(|_| Self(DEFAULT_SKILL_NAME.to_string()))
    }

    /// Returns the skill name as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `SkillName` and returns the inner `String`.
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for SkillName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for SkillName {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<SkillName> for String {
    fn from(name: SkillName) -> Self {
        name.0
    }
}

/// Everything the manifest says about where a package came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillMetadata {
    /// Package name
    pub name: SkillName,
    /// One-line package description
    pub description: String,
    /// Identifier used when calling tools
    pub server_id: ServerId,
    /// Self-reported server name
    pub server_name: String,
    /// Self-reported server version
    pub server_version: String,
    /// Launch command with credentials masked
    pub server_command: String,
    /// Number of tools in the package
    pub tool_count: usize,
    /// Version of the generator that produced the package
    pub generator_version: String,
    /// Generation time
    pub generated_at: DateTime<Utc>,
}

impl SkillMetadata {
    /// Builds metadata for a discovered server.
    ///
    /// The command is taken from [`ServerConfig::display`], so credentials
    /// never reach the generated files.
    #[must_use]
    pub fn new(name: SkillName, server: &ServerInfo, config: &ServerConfig) -> Self {
        let description = format!(
            "Typed TypeScript functions for the {} tools of the {} MCP server",
            server.tools.len(),
            server.name
        );

        Self {
            name,
            description,
            server_id: server.id.clone(),
            server_name: server.name.clone(),
            server_version: server.version.clone(),
            server_command: config.display(),
            tool_count: server.tools.len(),
            generator_version: env!("CARGO_PKG_VERSION").to_string(),
            generated_at: Utc::now(),
        }
    }

    /// Replaces the generated description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Removes control characters and unicode directional overrides.
///
/// Tool names and descriptions come from the server and end up in
/// Markdown and source files.
///
/// # Examples
///
/// ```
/// # use mcp_skill_generator::sanitize_string;
/// let sanitized = sanitize_string("Normal\u{202E}REVERSED\u{202D}");
/// assert!(!sanitized.contains('\u{202E}'));
/// ```
#[must_use]
pub fn sanitize_string(s: &str) -> String {
    s.chars()
        .filter(|c| {
            if matches!(*c, '\n' | '\t' | ' ') {
                return true;
            }
            if c.is_control() {
                return false;
            }
            // U+202A..U+202E and U+2066..U+2069
            let ch = *c as u32;
            !((0x202A..=0x202E).contains(&ch) || (0x2066..=0x2069).contains(&ch))
        })
        .collect()
}

/// Reduces free text to one line fit for a Markdown table cell or YAML
/// scalar.
///
/// Takes the first non-blank line, sanitizes it and escapes `|`.
///
/// # Examples
///
/// ```
/// # use mcp_skill_generator::summary_line;
/// assert_eq!(summary_line("List runs | paged\n\nMore detail"), "List runs \\| paged");
/// assert_eq!(summary_line(""), "");
/// ```
#[must_use]
pub fn summary_line(text: &str) -> String {
    let sanitized = sanitize_string(text);
    sanitized
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default()
        .replace('|', "\\|")
}
