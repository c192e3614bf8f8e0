//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Run
//!
//! ```text
//! States
//! 001 LoadSecrets
//! 002 BuildContext
//! ...
//! 010 Done
//!
//! Uploads
//! 001 original → urn:li:digitalmediaAsset:ABC
//! 002 display → urn:li:digitalmediaAsset:DEF
//!
//! Published 48211 byte JPEG under both roles
//! ```
//!
//! ## Check
//!
//! ```text
//! Endpoints
//!     image:    https://thispersondoesnotexist.com/image
//!     metadata: https://www.linkedin.com/voyager/api/voyagerMediaUploadMetadata
//!     profile:  https://www.linkedin.com/voyager/api/identity/dash/profiles/urn%3A...
//! Headers
//!     User-Agent, accept, csrf-token, ...
//! Cookies
//!     JSESSIONID, li_at, ...
//! ```
//!
//! Secret values never appear in output; headers and cookies are listed by
//! name only.
//!
//! # Architecture
//!
//! Each view has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure.

use crate::config::AppConfig;
use crate::context::RequestContext;
use crate::publish::{PublishFailure, PublishReport};
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

// ============================================================================
// Run
// ============================================================================

/// Format the summary of a completed run.
pub fn format_run_report(report: &PublishReport) -> Vec<String> {
    let mut lines = vec!["States".to_string()];
    for (i, state) in report.states.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), state));
    }

    lines.push(String::new());
    lines.push("Uploads".to_string());
    for (i, upload) in [&report.original, &report.display].iter().enumerate() {
        lines.push(format!(
            "{} {} → {}",
            format_index(i + 1),
            upload.role,
            upload.urn
        ));
    }

    lines.push(String::new());
    lines.push(format!(
        "Published {} byte JPEG under both roles",
        report.image_bytes
    ));
    lines
}

pub fn print_run_report(report: &PublishReport) {
    for line in format_run_report(report) {
        println!("{}", line);
    }
}

/// Format the states reached by a failed run, ending with the failure.
pub fn format_failure(failure: &PublishFailure) -> Vec<String> {
    let mut lines = vec!["States".to_string()];
    for (i, state) in failure.states.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), state));
    }
    lines.push(format!("{}Failed: {}", indent(1), failure.error));
    lines
}

pub fn print_failure(failure: &PublishFailure) {
    for line in format_failure(failure) {
        eprintln!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

/// Format a redacted view of the resolved configuration and request context.
pub fn format_check_output(config: &AppConfig, ctx: &RequestContext) -> Vec<String> {
    let i = indent(1);
    vec![
        "Endpoints".to_string(),
        format!("{i}image:    {}", config.endpoints.image_url),
        format!("{i}metadata: {}", ctx.metadata_url),
        format!("{i}profile:  {}", ctx.profile_url),
        "Headers".to_string(),
        format!("{i}{}", ctx.header_names().join(", ")),
        "Cookies".to_string(),
        format!("{i}{}", ctx.cookie_names().join(", ")),
        "Image".to_string(),
        format!(
            "{i}{}x{} JPEG q{}, overlay {}",
            config.image.size,
            config.image.size,
            config.image.quality,
            config.image.overlay.display()
        ),
        format!("{i}timeout {}s per call", config.http.timeout_secs),
    ]
}

pub fn print_check_output(config: &AppConfig, ctx: &RequestContext) {
    for line in format_check_output(config, ctx) {
        println!("{}", line);
    }
}

// ============================================================================
// Process
// ============================================================================

/// Format the result of the offline `process` command.
pub fn format_process_output(input: &Path, output: &Path, bytes: usize) -> Vec<String> {
    vec![
        format!("{} → {}", input.display(), output.display()),
        format!("{}{} bytes", indent(1), bytes),
    ]
}

pub fn print_process_output(input: &Path, output: &Path, bytes: usize) {
    for line in format_process_output(input, output, bytes) {
        println!("{}", line);
    }
}
