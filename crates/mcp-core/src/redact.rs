//! Masking of credentials in human-readable command lines.
//!
//! Server commands frequently carry secrets as environment-style assignments
//! (`TFE_TOKEN=abc123`). Any argument of the form `NAME=value` whose `NAME`
//! contains `TOKEN`, `SECRET`, `KEY`, `PASSWORD`, `API_KEY` or `AUTH`
//! (case-insensitive) is rendered with its value replaced by
//! [`REDACTION_MARKER`].
//!
//! Masking only ever produces display strings. The arguments handed to the
//! spawned process are never touched.
//!
//! # Examples
//!
//! ```
//! use mcp_core::redact::{redact_argument, REDACTION_MARKER};
//!
//! assert_eq!(redact_argument("TFE_TOKEN=abc123"), format!("TFE_TOKEN={REDACTION_MARKER}"));
//! assert_eq!(redact_argument("--verbose"), "--verbose");
//! ```

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// Replacement text for masked values.
pub const REDACTION_MARKER: &str = "***REDACTED***";

static ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)=(.*)$").expect("assignment pattern is valid")
});

static SENSITIVE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)TOKEN|SECRET|KEY|PASSWORD|API_KEY|AUTH").expect("sensitive pattern is valid")
});

/// Returns `true` if a variable name looks like it holds a credential.
///
/// # Examples
///
/// ```
/// use mcp_core::redact::is_sensitive_name;
///
/// assert!(is_sensitive_name("GITHUB_PERSONAL_ACCESS_TOKEN"));
/// assert!(is_sensitive_name("db_password"));
/// assert!(!is_sensitive_name("LOG_LEVEL"));
/// ```
#[must_use]
pub fn is_sensitive_name(name: &str) -> bool {
    SENSITIVE_NAME.is_match(name)
}

/// Masks a single argument if it is a sensitive `NAME=value` assignment.
#[must_use]
pub fn redact_argument(arg: &str) -> Cow<'_, str> {
    match ASSIGNMENT.captures(arg) {
        Some(caps) if is_sensitive_name(&caps[1]) => {
            Cow::Owned(format!("{}={REDACTION_MARKER}", &caps[1]))
        }
        _ => Cow::Borrowed(arg),
    }
}

/// Masks the value of an environment variable for display.
#[must_use]
pub fn redact_env_value<'a>(name: &str, value: &'a str) -> Cow<'a, str> {
    if is_sensitive_name(name) {
        Cow::Borrowed(REDACTION_MARKER)
    } else {
        Cow::Borrowed(value)
    }
}

/// Renders a command line with every sensitive argument masked.
///
/// # Examples
///
/// ```
/// use mcp_core::redact::redact_command_line;
///
/// let shown = redact_command_line(
///     "docker",
///     &["run".to_string(), "-e".to_string(), "API_KEY=sk-1".to_string()],
/// );
/// assert_eq!(shown, "docker run -e API_KEY=***REDACTED***");
/// ```
#[must_use]
pub fn redact_command_line(command: &str, args: &[String]) -> String {
    let mut rendered = redact_argument(command).into_owned();
    for arg in args {
        rendered.push(' ');
        rendered.push_str(&redact_argument(arg));
    }
    rendered
}
