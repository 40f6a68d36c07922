//! quality-gate - pre-commit quality gate for Python sources.
//!
//! Source files are parsed into syntax trees and run through a fixed set of
//! checkers. Their violations are aggregated into a pass/fail verdict.
//!
//! # Architecture
//!
//! - `select`: resolve the working set (explicit paths or git-staged files)
//! - `syntax`: tree-sitter backed syntax tree provider
//! - `check`: violation model and the security, documentation and
//!   performance checkers
//! - `gate`: orchestrator running every enabled checker over each file
//! - `verdict`: severity-driven decision and exit codes
//! - `report`: output formatting (pretty, JSON)
//! - `config`: YAML configuration
//!
//! # Adding a Checker
//!
//! Add a variant to [`check::Checker`], a [`check::Category`] for what it
//! reports, and a toggle in [`config::GateConfig`] that `Gate::new` reads.

pub mod check;
pub mod cli;
pub mod config;
pub mod gate;
pub mod logging;
pub mod report;
pub mod select;
pub mod syntax;
pub mod verdict;

pub use check::{Category, Checker, Severity, Violation};
pub use config::GateConfig;
pub use gate::Gate;
pub use syntax::{SyntaxError, SyntaxProvider, SyntaxTree};
pub use verdict::{Decision, GateOutcome};
