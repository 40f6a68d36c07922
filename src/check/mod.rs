//! Checkers that turn a parsed source file into violations.
//!
//! The checker set is closed: each kind is a variant of [`Checker`] and the
//! gate runs them in a fixed order. Adding a checker means adding a variant
//! and a category, nothing is loaded at runtime.

mod documentation;
mod performance;
mod security;
mod types;

pub use documentation::{has_module_docstring, DocumentationChecker};
pub use performance::{function_nesting_depth, PerformanceChecker, DEFAULT_MAX_NESTING_DEPTH};
pub use security::{find_dynamic_eval, scan_secrets, SecurityChecker};
pub use types::{Category, Severity, Violation};

use crate::syntax::SyntaxTree;

/// Everything a checker may look at for one file.
#[derive(Clone, Copy)]
pub struct SourceFile<'a> {
    /// File identifier used in violations.
    pub path: &'a str,
    /// Raw source text.
    pub text: &'a str,
    pub tree: &'a SyntaxTree,
}

/// One analysis pass. Holds only immutable configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Checker {
    Security(SecurityChecker),
    Documentation(DocumentationChecker),
    Performance(PerformanceChecker),
}

impl Checker {
    pub fn name(&self) -> &'static str {
        match self {
            Checker::Security(_) => "security",
            Checker::Documentation(_) => "documentation",
            Checker::Performance(_) => "performance",
        }
    }

    pub fn check(&self, unit: &SourceFile<'_>) -> Vec<Violation> {
        let violations = match self {
            Checker::Security(c) => c.check(unit),
            Checker::Documentation(c) => c.check(unit),
            Checker::Performance(c) => c.check(unit),
        };
        tracing::trace!(
            checker = self.name(),
            file = unit.path,
            found = violations.len(),
            "checker finished"
        );
        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{PythonSyntax, SyntaxProvider};
    use std::path::Path;

    #[test]
    fn test_dispatch_by_variant() {
        let source = "password = \"correcthorse\"\n";
        let tree = PythonSyntax::new()
            .parse(Path::new("x.py"), source.as_bytes())
            .unwrap();
        let unit = SourceFile {
            path: "x.py",
            text: source,
            tree: &tree,
        };

        let security = Checker::Security(SecurityChecker::default());
        let docs = Checker::Documentation(DocumentationChecker::default());
        let perf = Checker::Performance(PerformanceChecker::default());

        assert_eq!(security.check(&unit)[0].category, Category::Security);
        assert_eq!(docs.check(&unit)[0].category, Category::Documentation);
        assert!(perf.check(&unit).is_empty());
        assert_eq!(perf.name(), "performance");
    }
}
