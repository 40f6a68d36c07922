//! Core types for check results.

use serde::{Deserialize, Serialize};

/// Severity levels for violations.
///
/// Errors fail the gate; warnings are advisory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Severity::Error),
            "warning" => Ok(Severity::Warning),
            _ => Err(format!("unknown severity: {}", s)),
        }
    }
}

/// What kind of issue a violation reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Security,
    Documentation,
    Performance,
    SyntaxError,
    FileNotFound,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Security => "security",
            Category::Documentation => "documentation",
            Category::Performance => "performance",
            Category::SyntaxError => "syntax_error",
            Category::FileNotFound => "file_not_found",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "security" => Some(Category::Security),
            "documentation" => Some(Category::Documentation),
            "performance" => Some(Category::Performance),
            "syntax_error" => Some(Category::SyntaxError),
            "file_not_found" => Some(Category::FileNotFound),
            _ => None,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single reported issue, always attributable to exactly one file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Violation {
    pub category: Category,
    pub file: String,
    /// 1-indexed line, absent for whole-file problems.
    pub line: Option<usize>,
    pub message: String,
    pub severity: Severity,
}

impl Violation {
    pub fn new(
        category: Category,
        file: impl Into<String>,
        line: Option<usize>,
        message: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            category,
            file: file.into(),
            line,
            message: message.into(),
            severity,
        }
    }

    pub fn file_not_found(file: impl Into<String>) -> Self {
        Self::new(
            Category::FileNotFound,
            file,
            None,
            "File not found",
            Severity::Error,
        )
    }

    pub fn syntax_error(file: impl Into<String>, line: Option<usize>, detail: &str) -> Self {
        Self::new(
            Category::SyntaxError,
            file,
            line,
            format!("Syntax error: {}", detail),
            Severity::Error,
        )
    }

    /// Source that exists but cannot be read as text.
    pub fn unreadable(file: impl Into<String>, reason: &str) -> Self {
        Self::new(
            Category::SyntaxError,
            file,
            None,
            format!("Unreadable source: {}", reason),
            Severity::Error,
        )
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// `file:line` location, or just the file when not line-addressable.
    pub fn location(&self) -> String {
        match self.line {
            Some(line) => format!("{}:{}", self.file, line),
            None => self.file.clone(),
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: [{}] {}", self.location(), self.category, self.message)
    }
}
