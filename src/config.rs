//! Gate configuration.
//!
//! Read from an optional YAML file. Every option is independently togglable
//! and falls back to the default below when absent:
//!
//! ```yaml
//! forbid_hardcoded_secrets: true
//! forbid_eval_usage: true
//! require_module_docstrings: true
//! max_nesting_depth: 5        # 0 disables the nesting check
//! staged_include: ["**/src/**"]
//! excluded_paths: []
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::check::DEFAULT_MAX_NESTING_DEPTH;

/// File names searched for when no config path is given.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &[
    "quality-gate.yaml",
    "quality-gate.yml",
    ".quality-gate.yaml",
];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid glob {pattern:?} in {field}: {source}")]
    InvalidGlob {
        field: &'static str,
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GateConfig {
    #[serde(default = "default_true")]
    pub forbid_hardcoded_secrets: bool,
    #[serde(default = "default_true")]
    pub forbid_eval_usage: bool,
    #[serde(default = "default_true")]
    pub require_module_docstrings: bool,
    #[serde(default = "default_max_nesting_depth")]
    pub max_nesting_depth: usize,
    /// Globs a staged file must match to be checked.
    #[serde(default = "default_staged_include")]
    pub staged_include: Vec<String>,
    /// Globs removed from any selection.
    #[serde(default)]
    pub excluded_paths: Vec<String>,
}

fn default_true() -> bool {
    true
}

fn default_max_nesting_depth() -> usize {
    DEFAULT_MAX_NESTING_DEPTH
}

fn default_staged_include() -> Vec<String> {
    vec!["**/src/**".to_string()]
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            forbid_hardcoded_secrets: true,
            forbid_eval_usage: true,
            require_module_docstrings: true,
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
            staged_include: default_staged_include(),
            excluded_paths: Vec::new(),
        }
    }
}

impl GateConfig {
    /// Parse a config from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Parse a config from YAML text. An empty document yields the defaults.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: GateConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Look for a config file in `dir`.
    pub fn discover(dir: &Path) -> Option<PathBuf> {
        DEFAULT_CONFIG_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }

    /// Load the explicit config, or the discovered one, or the defaults.
    ///
    /// Returns the path the config came from, if any.
    pub fn load(explicit: Option<&Path>, dir: &Path) -> Result<(Self, Option<PathBuf>), ConfigError> {
        let path = match explicit {
            Some(p) => Some(p.to_path_buf()),
            None => Self::discover(dir),
        };
        match path {
            Some(p) => {
                tracing::debug!(config = %p.display(), "loading config");
                Ok((Self::parse_file(&p)?, Some(p)))
            }
            None => Ok((Self::default(), None)),
        }
    }

    /// Check that all glob patterns compile.
    pub fn validate(&self) -> Result<(), ConfigError> {
        build_globset("staged_include", &self.staged_include)?;
        build_globset("excluded_paths", &self.excluded_paths)?;
        Ok(())
    }

    pub fn staged_matcher(&self) -> Result<GlobSet, ConfigError> {
        build_globset("staged_include", &self.staged_include)
    }

    pub fn exclusion_matcher(&self) -> Result<GlobSet, ConfigError> {
        build_globset("excluded_paths", &self.excluded_paths)
    }
}

fn build_globset(field: &'static str, patterns: &[String]) -> Result<GlobSet, ConfigError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|source| ConfigError::InvalidGlob {
            field,
            pattern: pattern.clone(),
            source,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| ConfigError::InvalidGlob {
        field,
        pattern: patterns.join(", "),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = GateConfig::default();
        assert!(config.forbid_hardcoded_secrets);
        assert!(config.forbid_eval_usage);
        assert!(config.require_module_docstrings);
        assert_eq!(config.max_nesting_depth, 5);
        assert_eq!(GateConfig::from_yaml("").unwrap(), config);
    }

    #[test]
    fn test_partial_yaml_keeps_other_defaults() {
        let config = GateConfig::from_yaml("forbid_eval_usage: false\nmax_nesting_depth: 3\n").unwrap();
        assert!(!config.forbid_eval_usage);
        assert!(config.forbid_hardcoded_secrets);
        assert_eq!(config.max_nesting_depth, 3);
        assert_eq!(config.staged_include, vec!["**/src/**".to_string()]);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let err = GateConfig::from_yaml("max_depth: 3\n").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn test_invalid_glob_rejected() {
        let err = GateConfig::from_yaml("excluded_paths: [\"src/[\"]\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidGlob { field: "excluded_paths", .. }));
    }

    #[test]
    fn test_discover_and_load() {
        let temp = TempDir::new().unwrap();
        assert!(GateConfig::discover(temp.path()).is_none());

        let (config, from) = GateConfig::load(None, temp.path()).unwrap();
        assert_eq!(config, GateConfig::default());
        assert!(from.is_none());

        std::fs::write(
            temp.path().join("quality-gate.yaml"),
            "require_module_docstrings: false\n",
        )
        .unwrap();
        let (config, from) = GateConfig::load(None, temp.path()).unwrap();
        assert!(!config.require_module_docstrings);
        assert_eq!(from, Some(temp.path().join("quality-gate.yaml")));
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.yaml");
        assert!(matches!(
            GateConfig::load(Some(&missing), temp.path()),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_matchers() {
        let config = GateConfig {
            excluded_paths: vec!["**/migrations/**".to_string()],
            ..Default::default()
        };
        let staged = config.staged_matcher().unwrap();
        assert!(staged.is_match("src/app/main.py"));
        assert!(staged.is_match("pkg/src/main.py"));
        assert!(!staged.is_match("scripts/tool.py"));

        let excluded = config.exclusion_matcher().unwrap();
        assert!(excluded.is_match("src/db/migrations/0001.py"));
        assert!(!excluded.is_match("src/db/models.py"));
    }
}
