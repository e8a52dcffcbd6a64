//! Integration tests for credential masking of server command lines.
//!
//! Masking must change what humans see and nothing else: the configuration
//! handed to the process keeps the literal values.

use mcp_core::ServerConfig;
use mcp_core::redact::{REDACTION_MARKER, redact_argument, redact_command_line};

#[test]
fn test_tfe_token_is_masked_in_display_only() {
    let config =
        ServerConfig::from_command_line("terraform-mcp-server stdio TFE_TOKEN=abc123").unwrap();

    assert_eq!(
        config.display(),
        "terraform-mcp-server stdio TFE_TOKEN=***REDACTED***"
    );
    assert!(config.args().iter().any(|a| a == "TFE_TOKEN=abc123"));
}

#[test]
fn test_mixed_arguments() {
    let args: Vec<String> = [
        "-e",
        "GITHUB_PERSONAL_ACCESS_TOKEN=ghp_secret",
        "-e",
        "GITHUB_HOST=github.example.com",
        "--password-file=/run/secret",
        "MY_Auth_Header=Bearer xyz",
    ]
    .iter()
    .map(ToString::to_string)
    .collect();

    let shown = redact_command_line("docker", &args);

    assert!(!shown.contains("ghp_secret"));
    assert!(shown.contains("GITHUB_HOST=github.example.com"));
    // flags are not assignment-shaped, so they are shown verbatim
    assert!(shown.contains("--password-file=/run/secret"));
    assert!(shown.contains(&format!("MY_Auth_Header={REDACTION_MARKER}")));
}

#[test]
fn test_marker_is_fixed() {
    assert_eq!(REDACTION_MARKER, "***REDACTED***");
    assert_eq!(redact_argument("KEY=1"), "KEY=***REDACTED***");
}
