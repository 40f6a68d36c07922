//! Security checks.
//!
//! Two independent passes:
//! - hardcoded secrets, matched on raw text because credentials can sit in any
//!   literal context
//! - `eval()` calls, found on the syntax tree so the word in comments or string
//!   data is never reported

use regex::Regex;

use crate::syntax::{NodeKind, SyntaxTree};

use super::{Category, Severity, SourceFile, Violation};

/// Name of the builtin that evaluates a string as code.
const DYNAMIC_EVAL: &str = "eval";

/// Number of characters of a captured secret echoed back in messages.
const SECRET_PREVIEW_CHARS: usize = 10;

lazy_static::lazy_static! {
    /// One pattern per credential family. Each requires `key = "value"` with a
    /// quoted value of at least 8 characters.
    static ref SECRET_PATTERNS: Vec<Regex> = vec![
        Regex::new(r#"(?i)(?:password|passwd|pwd)\s*=\s*["']([^"']{8,})["']"#).unwrap(),
        Regex::new(r#"(?i)(?:api_key|apikey|api-key)\s*=\s*["']([^"']{8,})["']"#).unwrap(),
        Regex::new(r#"(?i)(?:secret|secret_key|secret-key)\s*=\s*["']([^"']{8,})["']"#).unwrap(),
        Regex::new(r#"(?i)(?:token|auth_token|auth-token)\s*=\s*["']([^"']{8,})["']"#).unwrap(),
        Regex::new(r#"(?i)(?:private_key|private-key|privatekey)\s*=\s*["']([^"']{8,})["']"#).unwrap(),
    ];

    /// Placeholder values that are never reported. Whole-value match only.
    static ref PLACEHOLDER: Regex =
        Regex::new(r"(?i)^(?:test|example|mock|dummy|x{3,}|\*+)$").unwrap();
}

/// Secret and dynamic-evaluation checker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityChecker {
    pub detect_secrets: bool,
    pub detect_dynamic_eval: bool,
}

impl Default for SecurityChecker {
    fn default() -> Self {
        Self {
            detect_secrets: true,
            detect_dynamic_eval: true,
        }
    }
}

impl SecurityChecker {
    pub fn new(detect_secrets: bool, detect_dynamic_eval: bool) -> Self {
        Self {
            detect_secrets,
            detect_dynamic_eval,
        }
    }

    pub fn check(&self, unit: &SourceFile<'_>) -> Vec<Violation> {
        let mut violations = Vec::new();

        if self.detect_secrets {
            violations.extend(scan_secrets(unit.path, unit.text));
        }

        if self.detect_dynamic_eval {
            violations.extend(find_dynamic_eval(unit.path, unit.tree));
        }

        violations
    }
}

/// Scan raw text for credential assignments.
///
/// Matches are reported family by family, each family in text order.
pub fn scan_secrets(path: &str, text: &str) -> Vec<Violation> {
    let mut violations = Vec::new();

    for pattern in SECRET_PATTERNS.iter() {
        for caps in pattern.captures_iter(text) {
            let (Some(whole), Some(value)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            if PLACEHOLDER.is_match(value.as_str()) {
                tracing::trace!(file = path, "skipping placeholder secret value");
                continue;
            }

            let line = line_at(text, whole.start());
            let preview: String = value.as_str().chars().take(SECRET_PREVIEW_CHARS).collect();
            violations.push(Violation::new(
                Category::Security,
                path,
                Some(line),
                format!("Possible hardcoded secret: {}...", preview),
                Severity::Error,
            ));
        }
    }

    violations
}

/// Find direct, unqualified calls to `eval`.
pub fn find_dynamic_eval(path: &str, tree: &SyntaxTree) -> Vec<Violation> {
    tree.nodes()
        .filter(|node| tree.kind_of(*node) == NodeKind::Call)
        .filter(|node| {
            node.child_by_field_name("function").is_some_and(|callee| {
                tree.kind_of(callee) == NodeKind::Identifier
                    && tree.node_text(callee) == DYNAMIC_EVAL
            })
        })
        .map(|node| {
            Violation::new(
                Category::Security,
                path,
                Some(SyntaxTree::line_of(node)),
                "Use of eval() detected (security risk)",
                Severity::Error,
            )
        })
        .collect()
}

/// 1-indexed line containing byte offset `pos`.
fn line_at(text: &str, pos: usize) -> usize {
    text[..pos].matches('\n').count() + 1
}
