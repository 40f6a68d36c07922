//! Gate orchestrator: validates files by fanning them out to every checker.

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::check::{
    Checker, DocumentationChecker, PerformanceChecker, SecurityChecker, SourceFile, Violation,
};
use crate::config::GateConfig;
use crate::syntax::{self, SyntaxProvider};
use crate::verdict::GateOutcome;

/// Runs the configured checkers over source files.
///
/// A gate carries no per-file state, so [`Gate::validate_file`] can be called
/// concurrently and never leaks results from one file into another.
pub struct Gate {
    checkers: Vec<Checker>,
    providers: Vec<Box<dyn SyntaxProvider>>,
}

impl Gate {
    /// Build the checker list from configuration, in report order:
    /// security, documentation, performance.
    pub fn new(config: &GateConfig) -> Self {
        let mut checkers = Vec::new();

        if config.forbid_hardcoded_secrets || config.forbid_eval_usage {
            checkers.push(Checker::Security(SecurityChecker::new(
                config.forbid_hardcoded_secrets,
                config.forbid_eval_usage,
            )));
        }
        if config.require_module_docstrings {
            checkers.push(Checker::Documentation(DocumentationChecker::new(true)));
        }
        if config.max_nesting_depth > 0 {
            checkers.push(Checker::Performance(PerformanceChecker::new(
                config.max_nesting_depth,
            )));
        }

        Self::with_checkers(checkers)
    }

    /// Build a gate with an explicit checker list.
    pub fn with_checkers(checkers: Vec<Checker>) -> Self {
        Self {
            checkers,
            providers: syntax::providers(),
        }
    }

    pub fn checkers(&self) -> &[Checker] {
        &self.checkers
    }

    fn provider_for(&self, path: &Path) -> Option<&dyn SyntaxProvider> {
        let ext = path.extension().and_then(|e| e.to_str())?;
        self.providers
            .iter()
            .find(|p| p.handles_extension(ext))
            .map(|p| &**p)
    }

    /// Validate a single file. Never fails: every problem is a violation.
    pub fn validate_file(&self, path: &Path) -> Vec<Violation> {
        let file = path.to_string_lossy().to_string();
        let _span = tracing::debug_span!("validate_file", file = %file).entered();

        if !path.exists() {
            tracing::debug!("file not found");
            return vec![Violation::file_not_found(file)];
        }

        let Some(provider) = self.provider_for(path) else {
            tracing::debug!("not a source file, skipping");
            return Vec::new();
        };

        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "cannot read source");
                return vec![Violation::unreadable(file, &e.to_string())];
            }
        };

        let tree = match provider.parse(path, text.as_bytes()) {
            Ok(tree) => tree,
            Err(e) => return vec![Violation::syntax_error(file, Some(e.line), &e.message)],
        };

        let unit = SourceFile {
            path: &file,
            text: &text,
            tree: &tree,
        };
        let violations: Vec<Violation> = self
            .checkers
            .iter()
            .flat_map(|checker| checker.check(&unit))
            .collect();

        tracing::debug!(
            language = provider.language_id(),
            found = violations.len(),
            "file validated"
        );
        violations
    }

    /// Validate files in parallel. Results keep the input order.
    pub fn validate_files(&self, files: &[PathBuf]) -> GateOutcome {
        let per_file: Vec<Vec<Violation>> = files
            .par_iter()
            .map(|path| self.validate_file(path))
            .collect();

        GateOutcome {
            files_checked: files.len(),
            violations: per_file.into_iter().flatten().collect(),
        }
    }
}

impl Default for Gate {
    fn default() -> Self {
        Self::new(&GateConfig::default())
    }
}
