//! Pass/fail decision over aggregated violations.
//!
//! Only severity decides the outcome. Grouping by category is for
//! presentation and never changes the decision.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::check::{Category, Severity, Violation};

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// All violations from one gate run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateOutcome {
    pub files_checked: usize,
    pub violations: Vec<Violation>,
}

impl GateOutcome {
    pub fn errors(&self) -> impl Iterator<Item = &Violation> {
        self.violations
            .iter()
            .filter(|v| v.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Violation> {
        self.violations
            .iter()
            .filter(|v| v.severity == Severity::Warning)
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    /// Violations grouped by category, categories sorted by name.
    pub fn by_category(&self) -> BTreeMap<&'static str, Vec<&Violation>> {
        let mut groups: BTreeMap<&'static str, Vec<&Violation>> = BTreeMap::new();
        for v in &self.violations {
            groups.entry(v.category.as_str()).or_default().push(v);
        }
        groups
    }

    pub fn count_for(&self, category: Category) -> usize {
        self.violations
            .iter()
            .filter(|v| v.category == category)
            .count()
    }

    pub fn decision(&self) -> Decision {
        if self.error_count() > 0 {
            Decision::Failed
        } else if self.warning_count() > 0 {
            Decision::PassedWithWarnings
        } else {
            Decision::Clean
        }
    }
}

/// Overall gate result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// No violations at all.
    Clean,
    /// Advisory warnings only.
    PassedWithWarnings,
    /// At least one error.
    Failed,
}

impl Decision {
    pub fn passed(self) -> bool {
        !matches!(self, Decision::Failed)
    }

    pub fn exit_code(self) -> i32 {
        if self.passed() {
            EXIT_SUCCESS
        } else {
            EXIT_FAILED
        }
    }
}
