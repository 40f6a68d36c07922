//! Output formatting for gate results.
//!
//! Supports two output formats:
//! - Pretty: colored terminal output, violations itemised by category
//! - JSON: structured output for CI tooling

use colored::*;
use serde::{Deserialize, Serialize};

use crate::check::Violation;
use crate::verdict::{Decision, GateOutcome};

const RULE_WIDTH: usize = 60;

// =============================================================================
// JSON Format
// =============================================================================

/// Machine-readable report.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonReport {
    pub version: String,
    pub files_checked: usize,
    /// Total number of violations.
    pub count: usize,
    pub errors: usize,
    pub warnings: usize,
    pub passed: bool,
    pub violations: Vec<JsonViolation>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonViolation {
    pub category: String,
    pub file: String,
    pub line: Option<usize>,
    pub message: String,
    pub severity: String,
}

impl JsonReport {
    pub fn from_outcome(outcome: &GateOutcome) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            files_checked: outcome.files_checked,
            count: outcome.violations.len(),
            errors: outcome.error_count(),
            warnings: outcome.warning_count(),
            passed: outcome.decision().passed(),
            violations: outcome.violations.iter().map(violation_to_json).collect(),
        }
    }
}

fn violation_to_json(v: &Violation) -> JsonViolation {
    JsonViolation {
        category: v.category.as_str().to_string(),
        file: v.file.clone(),
        line: v.line,
        message: v.message.clone(),
        severity: v.severity.to_string(),
    }
}

/// Render results as pretty-printed JSON.
pub fn render_json(outcome: &GateOutcome) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&JsonReport::from_outcome(outcome))?)
}

/// Write results in JSON format to stdout.
pub fn write_json(outcome: &GateOutcome) -> anyhow::Result<()> {
    println!("{}", render_json(outcome)?);
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Render results for a terminal.
pub fn render_pretty(outcome: &GateOutcome) -> String {
    let mut out = String::new();
    let rule = "=".repeat(RULE_WIDTH);

    if !outcome.violations.is_empty() {
        out.push('\n');
        out.push_str(&format!("{}\n", rule));
        out.push_str(&format!("{}\n", "Quality Gate Validation Report".bold()));
        out.push_str(&format!("{}\n", rule));
        out.push_str(&format!("Files checked: {}\n", outcome.files_checked));
        out.push_str(&format!("Total violations: {}\n", outcome.violations.len()));
        out.push_str(&format!(
            "  Errors: {}\n",
            paint_count(outcome.error_count(), true)
        ));
        out.push_str(&format!(
            "  Warnings: {}\n",
            paint_count(outcome.warning_count(), false)
        ));

        let groups = outcome.by_category();
        out.push_str("\nViolations by category:\n");
        for (category, violations) in &groups {
            out.push_str(&format!("  {}: {}\n", category, violations.len()));
        }

        out.push_str(&format!("\n{}\n", rule));
        out.push_str("Detailed violations:\n");
        out.push_str(&format!("{}\n", rule));
        for violations in groups.values() {
            for v in violations {
                out.push_str(&format_violation(v));
                out.push('\n');
            }
        }
        out.push_str(&format!("{}\n\n", rule));
    }

    out.push_str(&final_status(outcome));
    out.push('\n');
    out
}

/// Write results in pretty format to stdout.
pub fn write_pretty(outcome: &GateOutcome) {
    print!("{}", render_pretty(outcome));
}

/// `file:line: [category] message`, line left out when absent.
fn format_violation(v: &Violation) -> String {
    let tag = format!("[{}]", v.category);
    let tag = if v.is_error() {
        tag.red().to_string()
    } else {
        tag.yellow().to_string()
    };
    format!("{}: {} {}", v.location().blue(), tag, v.message)
}

fn paint_count(count: usize, is_error: bool) -> String {
    match (count, is_error) {
        (0, _) => count.to_string().green().to_string(),
        (_, true) => count.to_string().red().bold().to_string(),
        (_, false) => count.to_string().yellow().to_string(),
    }
}

fn final_status(outcome: &GateOutcome) -> String {
    match outcome.decision() {
        Decision::Failed => format!(
            "{}",
            "✗ Quality gate validation FAILED (errors found)".red()
        ),
        Decision::PassedWithWarnings => format!(
            "{}",
            "⚠ Quality gate validation passed with warnings".yellow()
        ),
        Decision::Clean => format!(
            "{} ({} file{} checked)",
            "✓ Quality gate validation passed".green(),
            outcome.files_checked,
            if outcome.files_checked == 1 { "" } else { "s" }
        ),
    }
}
