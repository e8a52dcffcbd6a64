//! Rule-based tool classification.
//!
//! A [`Classifier`] holds an ordered list of [`ClassificationRule`]s. Each
//! tool is offered to the rules top to bottom; the first rule that matches
//! the tool's name or description, and whose exclusions do not, claims it.
//! Unclaimed tools land in the fallback category `other`.
//!
//! Rule order is part of the contract. More specific rules must come before
//! broader ones: with the built-in rules `list_workspace_variables` is a
//! variables tool because `variables` precedes `workspaces`.
//!
//! # Examples
//!
//! ```
//! use mcp_codegen::categorize::Classifier;
//! use mcp_introspector::ToolInfo;
//! use serde_json::json;
//!
//! let classifier = Classifier::with_default_rules()?;
//! let result = classifier.classify(vec![
//!     ToolInfo::new("list_workspace_variables", None, json!({})),
//!     ToolInfo::new("ping", None, json!({})),
//! ]);
//!
//! assert_eq!(result.category_of("list_workspace_variables").unwrap().key, "variables");
//! assert_eq!(result.category_of("ping").unwrap().key, "other");
//! # Ok::<(), mcp_core::Error>(())
//! ```

use mcp_core::{Error, Result, ToolName};
use mcp_introspector::ToolInfo;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::debug;

/// Key of the catch-all category.
pub const FALLBACK_KEY: &str = "other";

const FALLBACK_NAME: &str = "Other";
const FALLBACK_DESCRIPTION: &str = "Tools that did not match any category";

/// Display data for a category a rule creates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTemplate {
    /// Slug used for directory names and lookups; unique across rules
    pub key: String,
    /// Human-readable name
    pub name: String,
    /// One-line description for the manifest
    #[serde(default)]
    pub description: String,
}

impl CategoryTemplate {
    /// Creates a category template.
    #[must_use]
    pub fn new(key: &str, name: &str, description: &str) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            description: description.to_string(),
        }
    }

    fn fallback() -> Self {
        Self::new(FALLBACK_KEY, FALLBACK_NAME, FALLBACK_DESCRIPTION)
    }

    fn validate(&self) -> Result<()> {
        let valid_key = !self.key.is_empty()
            && self
                .key
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
        if !valid_key {
            return Err(Error::ConfigError {
                message: format!(
                    "category key '{}' must be non-empty lowercase letters, digits, '-' or '_'",
                    self.key
                ),
            });
        }
        if self.key == FALLBACK_KEY {
            return Err(Error::ConfigError {
                message: format!("category key '{FALLBACK_KEY}' is reserved for unmatched tools"),
            });
        }
        if self.name.trim().is_empty() {
            return Err(Error::ConfigError {
                message: format!("category '{}' has an empty name", self.key),
            });
        }
        Ok(())
    }
}

/// One entry of an ordered rule list.
#[derive(Debug, Clone)]
pub struct ClassificationRule {
    category: CategoryTemplate,
    match_patterns: Vec<Regex>,
    exclude_patterns: Vec<Regex>,
}

impl ClassificationRule {
    /// Compiles a rule. Patterns are case-insensitive regular expressions,
    /// so a plain word is a case-insensitive substring test.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if the template is invalid, there are no
    /// match patterns, or a pattern fails to compile.
    pub fn new<M, E>(category: CategoryTemplate, match_patterns: M, exclude_patterns: E) -> Result<Self>
    where
        M: IntoIterator,
        M::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        category.validate()?;

        let match_patterns = compile_all(&category.key, match_patterns)?;
        if match_patterns.is_empty() {
            return Err(Error::ConfigError {
                message: format!("rule '{}' has no match patterns", category.key),
            });
        }
        let exclude_patterns = compile_all(&category.key, exclude_patterns)?;

        Ok(Self {
            category,
            match_patterns,
            exclude_patterns,
        })
    }

    /// Returns the category this rule assigns.
    #[must_use]
    pub const fn category(&self) -> &CategoryTemplate {
        &self.category
    }

    /// Returns `true` if any match pattern hits the name or description.
    #[must_use]
    pub fn matches(&self, tool: &ToolInfo) -> bool {
        any_hit(&self.match_patterns, tool)
    }

    /// Returns `true` if any exclude pattern hits the name or description.
    #[must_use]
    pub fn excludes(&self, tool: &ToolInfo) -> bool {
        any_hit(&self.exclude_patterns, tool)
    }

    /// Returns `true` if this rule takes the tool.
    #[must_use]
    pub fn claims(&self, tool: &ToolInfo) -> bool {
        self.matches(tool) && !self.excludes(tool)
    }
}

fn compile_all<I>(key: &str, patterns: I) -> Result<Vec<Regex>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    patterns
        .into_iter()
        .map(|pattern| {
            let pattern = pattern.as_ref();
            RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .map_err(|e| Error::ConfigError {
                    message: format!("rule '{key}': invalid pattern '{pattern}': {e}"),
                })
        })
        .collect()
}

fn any_hit(patterns: &[Regex], tool: &ToolInfo) -> bool {
    patterns.iter().any(|re| {
        re.is_match(tool.name.as_str())
            || tool.description.as_deref().is_some_and(|d| re.is_match(d))
    })
}

/// Serializable form of a rule, as written in TOML rule files.
///
/// ```toml
/// [[rules]]
/// key = "variables"
/// name = "Variables"
/// description = "Workspace and variable set variables"
/// match = ["variable", "varset"]
/// exclude = ["workspace_settings"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSpec {
    /// Category slug
    pub key: String,
    /// Category display name
    pub name: String,
    /// Category description
    #[serde(default)]
    pub description: String,
    /// Patterns that claim a tool
    #[serde(rename = "match")]
    pub match_patterns: Vec<String>,
    /// Patterns that veto a claim
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl RuleSpec {
    /// Compiles this entry into a rule.
    ///
    /// # Errors
    ///
    /// Same as [`ClassificationRule::new`].
    pub fn compile(&self) -> Result<ClassificationRule> {
        ClassificationRule::new(
            CategoryTemplate::new(&self.key, &self.name, &self.description),
            &self.match_patterns,
            &self.exclude,
        )
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleFile {
    rules: Vec<RuleSpec>,
}

/// Built-in rules, most specific first.
const DEFAULT_RULES: &[(&str, &str, &str, &[&str], &[&str])] = &[
    (
        "variables",
        "Variables",
        "Variables and variable sets",
        &["variable", "varset", "var_set"],
        &[],
    ),
    (
        "runs",
        "Runs",
        "Plans, applies and run history",
        &["(^|[^a-z])runs?([^a-z]|$)", "(^|[^a-z])(plan|apply)s?([^a-z]|$)"],
        &[],
    ),
    (
        "workspaces",
        "Workspaces",
        "Workspace management",
        &["workspace"],
        &[],
    ),
    (
        "modules",
        "Modules",
        "Module registry lookups",
        &["module"],
        &[],
    ),
    (
        "providers",
        "Providers",
        "Provider registry lookups",
        &["provider"],
        &[],
    ),
    (
        "policies",
        "Policies",
        "Policies and policy sets",
        &["polic"],
        &[],
    ),
    (
        "pull-requests",
        "Pull Requests",
        "Pull requests and reviews",
        &["pull_request", "pull request", "(^|[^a-z])prs?([^a-z]|$)"],
        &[],
    ),
    (
        "issues",
        "Issues",
        "Issue tracking",
        &["issue"],
        &["debug"],
    ),
    (
        "repositories",
        "Repositories",
        "Repositories, branches and commits",
        &["repo", "branch", "commit"],
        &[],
    ),
    (
        "files",
        "Files",
        "File and directory operations",
        &["file", "director"],
        &["profile"],
    ),
    (
        "organizations",
        "Organizations",
        "Organizations and projects",
        &["organi[sz]ation", "(^|[^a-z])orgs?([^a-z]|$)", "project"],
        &[],
    ),
    (
        "users",
        "Users",
        "Users, teams and memberships",
        &["user", "member", "team", "profile"],
        &[],
    ),
    (
        "search",
        "Search",
        "Search and lookup",
        &["search", "find", "query"],
        &[],
    ),
];

/// Returns the built-in ordered rule list.
///
/// # Errors
///
/// Returns `Error::ConfigError` if a built-in pattern fails to compile.
pub fn default_rules() -> Result<Vec<ClassificationRule>> {
    DEFAULT_RULES
        .iter()
        .map(|(key, name, description, matches, excludes)| {
            ClassificationRule::new(
                CategoryTemplate::new(key, name, description),
                matches.iter(),
                excludes.iter(),
            )
        })
        .collect()
}

/// A group of tools sharing a category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    /// Unique slug
    pub key: String,
    /// Display name
    pub name: String,
    /// Description for the manifest
    pub description: String,
    /// Tools in discovery order
    pub tools: Vec<ToolInfo>,
}

impl Category {
    fn from_template(template: &CategoryTemplate) -> Self {
        Self {
            key: template.key.clone(),
            name: template.name.clone(),
            description: template.description.clone(),
            tools: Vec::new(),
        }
    }
}

/// Partition of a tool list into categories.
///
/// Categories appear in first-claim order. Every tool is in exactly one
/// category.
#[derive(Debug, Clone, Default)]
pub struct Categorization {
    categories: Vec<Category>,
    /// (category index, position in category) per tool, in discovery order
    order: Vec<(usize, usize)>,
    by_name: HashMap<ToolName, usize>,
    fallback: Option<usize>,
}

impl Categorization {
    /// Returns the categories in first-claim order.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Returns the category holding the named tool.
    #[must_use]
    pub fn category_of(&self, tool_name: &str) -> Option<&Category> {
        self.by_name
            .get(&ToolName::new(tool_name))
            .map(|&index| &self.categories[index])
    }

    /// Returns the total number of tools.
    #[must_use]
    pub fn tool_count(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if at least one tool matched no rule.
    #[must_use]
    pub const fn fallback_used(&self) -> bool {
        self.fallback.is_some()
    }

    /// Iterates tools in their original discovery order, with their category.
    pub fn tools_in_discovery_order(&self) -> impl Iterator<Item = (&Category, &ToolInfo)> {
        self.order.iter().map(|&(category, position)| {
            let category = &self.categories[category];
            (category, &category.tools[position])
        })
    }

    /// Consumes the partition, returning its categories.
    #[must_use]
    pub fn into_categories(self) -> Vec<Category> {
        self.categories
    }

    fn push(&mut self, template: &CategoryTemplate, tool: ToolInfo, fallback: bool) {
        let index = match self.categories.iter().position(|c| c.key == template.key) {
            Some(index) => index,
            None => {
                self.categories.push(Category::from_template(template));
                self.categories.len() - 1
            }
        };
        if fallback {
            self.fallback = Some(index);
        }

        let category = &mut self.categories[index];
        self.by_name.insert(tool.name.clone(), index);
        self.order.push((index, category.tools.len()));
        category.tools.push(tool);
    }
}

/// Ordered rule evaluator.
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<ClassificationRule>,
    fallback: CategoryTemplate,
}

impl Classifier {
    /// Creates a classifier over an ordered rule list.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if two rules share a category key.
    pub fn new(rules: Vec<ClassificationRule>) -> Result<Self> {
        let mut keys = HashSet::new();
        for rule in &rules {
            if !keys.insert(rule.category.key.as_str()) {
                return Err(Error::ConfigError {
                    message: format!("duplicate category key '{}'", rule.category.key),
                });
            }
        }

        Ok(Self {
            rules,
            fallback: CategoryTemplate::fallback(),
        })
    }

    /// Creates a classifier with the built-in rules.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if a built-in rule fails to compile.
    pub fn with_default_rules() -> Result<Self> {
        Self::new(default_rules()?)
    }

    /// Creates a classifier from rule entries, in the given order.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if any entry is invalid.
    pub fn from_specs(specs: &[RuleSpec]) -> Result<Self> {
        Self::new(specs.iter().map(RuleSpec::compile).collect::<Result<_>>()?)
    }

    /// Parses a TOML rule file (`[[rules]]` entries).
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if the TOML is malformed or a rule is
    /// invalid.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let file: RuleFile = toml::from_str(source).map_err(|e| Error::ConfigError {
            message: format!("invalid rule file: {e}"),
        })?;
        Self::from_specs(&file.rules)
    }

    /// Reads and parses a TOML rule file.
    ///
    /// # Errors
    ///
    /// Returns `Error::IoError` if the file cannot be read, otherwise as
    /// [`Classifier::from_toml_str`].
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path).map_err(|e| Error::IoError {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_toml_str(&source)
    }

    /// Returns the rules in evaluation order.
    #[must_use]
    pub fn rules(&self) -> &[ClassificationRule] {
        &self.rules
    }

    /// Returns the first rule that claims the tool, if any.
    #[must_use]
    pub fn rule_for(&self, tool: &ToolInfo) -> Option<&ClassificationRule> {
        self.rules.iter().find(|rule| rule.claims(tool))
    }

    /// Partitions tools into categories.
    ///
    /// Deterministic: the same tools in the same order always yield the same
    /// categories in the same order.
    #[must_use]
    pub fn classify(&self, tools: Vec<ToolInfo>) -> Categorization {
        let mut result = Categorization::default();

        for tool in tools {
            match self.rule_for(&tool) {
                Some(rule) => {
                    debug!(tool = %tool.name, category = %rule.category.key, "Classified tool");
                    result.push(&rule.category, tool, false);
                }
                None => {
                    debug!(tool = %tool.name, "No rule matched, using fallback category");
                    result.push(&self.fallback, tool, true);
                }
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tool(name: &str) -> ToolInfo {
        ToolInfo::new(name, None, json!({}))
    }

    fn described(name: &str, description: &str) -> ToolInfo {
        ToolInfo::new(name, Some(description), json!({}))
    }

    fn rule(key: &str, matches: &[&str], excludes: &[&str]) -> ClassificationRule {
        ClassificationRule::new(
            CategoryTemplate::new(key, &key.to_uppercase(), ""),
            matches,
            excludes,
        )
        .unwrap()
    }

    fn key_of<'a>(result: &'a Categorization, tool: &str) -> &'a str {
        &result.category_of(tool).unwrap().key
    }

    #[test]
    fn test_default_rules_compile() {
        let classifier = Classifier::with_default_rules().unwrap();
        assert!(!classifier.rules().is_empty());
    }

    #[test]
    fn test_precedence_first_rule_wins() {
        let classifier = Classifier::with_default_rules().unwrap();
        let result = classifier.classify(vec![tool("list_workspace_variables")]);
        assert_eq!(key_of(&result, "list_workspace_variables"), "variables");
    }

    #[test]
    fn test_precedence_follows_authored_order() {
        let a_first = Classifier::new(vec![
            rule("a", &["workspace"], &[]),
            rule("b", &["variable"], &[]),
        ])
        .unwrap();
        let b_first = Classifier::new(vec![
            rule("b", &["variable"], &[]),
            rule("a", &["workspace"], &[]),
        ])
        .unwrap();

        let tools = vec![tool("list_workspace_variables")];
        assert_eq!(key_of(&a_first.classify(tools.clone()), "list_workspace_variables"), "a");
        assert_eq!(key_of(&b_first.classify(tools), "list_workspace_variables"), "b");
    }

    #[test]
    fn test_exclusion_passes_tool_to_later_rule() {
        let classifier = Classifier::with_default_rules().unwrap();
        let result = classifier.classify(vec![tool("get_user_profile"), tool("read_file")]);

        assert_eq!(key_of(&result, "get_user_profile"), "users");
        assert_eq!(key_of(&result, "read_file"), "files");
    }

    #[test]
    fn test_issues_exclude_debug() {
        let classifier = Classifier::with_default_rules().unwrap();
        let result = classifier.classify(vec![tool("debug_issue_parser"), tool("get_issue")]);

        assert_eq!(key_of(&result, "get_issue"), "issues");
        assert_ne!(key_of(&result, "debug_issue_parser"), "issues");
    }

    #[test]
    fn test_description_match_counts() {
        let classifier = Classifier::new(vec![rule("runs", &["terraform run"], &[])]).unwrap();
        let result = classifier.classify(vec![described("cancel", "Cancel a Terraform run")]);
        assert_eq!(key_of(&result, "cancel"), "runs");
    }

    #[test]
    fn test_short_words_match_on_any_boundary() {
        let classifier = Classifier::with_default_rules().unwrap();
        let result = classifier.classify(vec![
            tool("list-runs"),
            described("cancel", "Cancel a run"),
            tool("get.org"),
            described("review", "Approve a PR"),
            tool("runtime_info"),
            tool("rerun"),
        ]);

        assert_eq!(key_of(&result, "list-runs"), "runs");
        assert_eq!(key_of(&result, "cancel"), "runs");
        assert_eq!(key_of(&result, "get.org"), "organizations");
        assert_eq!(key_of(&result, "review"), "pull-requests");
        assert_eq!(key_of(&result, "runtime_info"), FALLBACK_KEY);
        assert_eq!(key_of(&result, "rerun"), FALLBACK_KEY);
    }

    #[test]
    fn test_description_exclusion_counts() {
        let classifier = Classifier::new(vec![rule("files", &["file"], &["profile"])]).unwrap();
        let result = classifier.classify(vec![described("get_file", "Reads a profile picture")]);
        assert_eq!(key_of(&result, "get_file"), FALLBACK_KEY);
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let classifier = Classifier::new(vec![rule("ws", &["workspace"], &[])]).unwrap();
        let result = classifier.classify(vec![tool("ListWorkspaces")]);
        assert_eq!(key_of(&result, "ListWorkspaces"), "ws");
    }

    #[test]
    fn test_fallback_created_lazily() {
        let classifier = Classifier::new(vec![rule("ws", &["workspace"], &[])]).unwrap();

        let matched = classifier.classify(vec![tool("list_workspaces")]);
        assert!(!matched.fallback_used());
        assert!(matched.categories().iter().all(|c| c.key != FALLBACK_KEY));

        let unmatched = classifier.classify(vec![tool("list_workspaces"), tool("ping")]);
        assert!(unmatched.fallback_used());
        assert_eq!(unmatched.categories().last().unwrap().name, "Other");
    }

    #[test]
    fn test_categories_in_first_claim_order() {
        let classifier = Classifier::with_default_rules().unwrap();
        let result = classifier.classify(vec![
            tool("ping"),
            tool("list_workspaces"),
            tool("create_run"),
            tool("get_workspace"),
        ]);

        let keys: Vec<&str> = result.categories().iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, ["other", "workspaces", "runs"]);
        let ws: Vec<&str> = result.categories()[1]
            .tools
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(ws, ["list_workspaces", "get_workspace"]);
    }

    #[test]
    fn test_discovery_order_is_recoverable() {
        let classifier = Classifier::with_default_rules().unwrap();
        let names = ["ping", "list_workspaces", "create_run", "get_workspace"];
        let result = classifier.classify(names.iter().map(|n| tool(n)).collect());

        let replayed: Vec<&str> = result
            .tools_in_discovery_order()
            .map(|(_, t)| t.name.as_str())
            .collect();
        assert_eq!(replayed, names);
        assert_eq!(result.tool_count(), 4);
    }

    #[test]
    fn test_empty_tool_list() {
        let result = Classifier::with_default_rules().unwrap().classify(Vec::new());
        assert!(result.categories().is_empty());
        assert_eq!(result.tool_count(), 0);
        assert!(!result.fallback_used());
    }

    #[test]
    fn test_reserved_key_rejected() {
        let err = ClassificationRule::new(CategoryTemplate::new("other", "Other", ""), ["x"], [""; 0])
            .unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let err = ClassificationRule::new(CategoryTemplate::new("bad", "Bad", ""), ["("], [""; 0])
            .unwrap_err();
        assert!(err.is_config_error());
        assert!(err.to_string().contains("bad"));
    }

    #[test]
    fn test_rule_without_patterns_rejected() {
        let none: [&str; 0] = [];
        let err = ClassificationRule::new(CategoryTemplate::new("x", "X", ""), none, none).unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let err = Classifier::new(vec![rule("a", &["x"], &[]), rule("a", &["y"], &[])]).unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_rules_from_toml() {
        let classifier = Classifier::from_toml_str(
            r#"
            [[rules]]
            key = "secrets"
            name = "Secrets"
            match = ["secret"]
            exclude = ["rotate"]

            [[rules]]
            key = "admin"
            name = "Administration"
            description = "Admin tools"
            match = ["admin", "rotate"]
            "#,
        )
        .unwrap();

        assert_eq!(classifier.rules().len(), 2);
        let result = classifier.classify(vec![tool("read_secret"), tool("rotate_secret")]);
        assert_eq!(key_of(&result, "read_secret"), "secrets");
        assert_eq!(key_of(&result, "rotate_secret"), "admin");
    }

    #[test]
    fn test_rules_from_toml_reject_reserved_key() {
        let err = Classifier::from_toml_str(
            r#"
            [[rules]]
            key = "other"
            name = "Misc"
            match = ["x"]
            "#,
        )
        .unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_rules_from_missing_file() {
        let path = Path::new("/nonexistent/mcp-skill/rules.toml");
        match Classifier::from_toml_file(path).unwrap_err() {
            Error::IoError { path, .. } => assert_eq!(path, "/nonexistent/mcp-skill/rules.toml"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rules_from_malformed_toml() {
        assert!(Classifier::from_toml_str("rules = 3").unwrap_err().is_config_error());
    }
}
