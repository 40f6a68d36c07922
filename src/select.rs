//! File selection: which paths a gate run should look at.
//!
//! Either the caller's explicit paths (directories expanded recursively), or
//! the files staged in git (added, copied or modified).

use std::path::{Path, PathBuf};
use std::process::Command;

use globset::GlobSet;
use thiserror::Error;
use walkdir::WalkDir;

use crate::syntax;

/// Directory names never descended into.
const SKIPPED_DIRS: &[&str] = &["__pycache__", "node_modules", "venv", ".venv"];

#[derive(Error, Debug)]
pub enum SelectError {
    #[error("git: {0}")]
    Git(String),
    #[error("walking {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Resolve explicit paths.
///
/// Order is preserved. Directories are expanded into their source files,
/// sorted. Source paths that do not exist are kept so the gate can report
/// them; anything with a non-source extension is dropped, present or not.
pub fn explicit(paths: &[PathBuf], excluded: &GlobSet) -> Result<Vec<PathBuf>, SelectError> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            files.extend(walk_sources(path)?);
        } else if syntax::is_source_path(path) {
            files.push(path.clone());
        } else {
            tracing::debug!(file = %path.display(), "dropping non-source path");
        }
    }

    Ok(apply_exclusions(files, excluded))
}

/// All source files below `root`, sorted.
fn walk_sources(root: &Path) -> Result<Vec<PathBuf>, SelectError> {
    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 || !e.file_type().is_dir() {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            !name.starts_with('.') && !SKIPPED_DIRS.contains(&name.as_ref())
        });

    for entry in walker {
        let entry = entry.map_err(|source| SelectError::Walk {
            path: root.to_path_buf(),
            source,
        })?;
        if entry.file_type().is_file() && syntax::is_source_path(entry.path()) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// Files staged in the git repository containing `dir`.
///
/// Only source files whose repository-relative path matches `include` and
/// not `excluded` are returned; paths are joined onto the repository top
/// level.
pub fn staged(dir: &Path, include: &GlobSet, excluded: &GlobSet) -> Result<Vec<PathBuf>, SelectError> {
    let top = git(dir, &["rev-parse", "--show-toplevel"])?;
    let top = PathBuf::from(top.trim());

    let listing = git(
        dir,
        &["diff", "--cached", "--name-only", "--diff-filter=ACM"],
    )?;
    let relative = filter_staged(&listing, include, excluded);
    tracing::debug!(count = relative.len(), "staged source files");

    Ok(relative.into_iter().map(|p| top.join(p)).collect())
}

/// Parse `git diff --name-only` output down to included source paths.
///
/// Globs are matched against the repository-relative paths git prints.
pub fn filter_staged(listing: &str, include: &GlobSet, excluded: &GlobSet) -> Vec<PathBuf> {
    let files = listing
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .filter(|p| syntax::is_source_path(p) && include.is_match(p))
        .collect();
    apply_exclusions(files, excluded)
}

fn git(dir: &Path, args: &[&str]) -> Result<String, SelectError> {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|e| SelectError::Git(format!("cannot run git: {}", e)))?;
    if !output.status.success() {
        return Err(SelectError::Git(format!(
            "git {} exited with {}: {}",
            args.join(" "),
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    String::from_utf8(output.stdout).map_err(|e| SelectError::Git(e.to_string()))
}

fn apply_exclusions(files: Vec<PathBuf>, excluded: &GlobSet) -> Vec<PathBuf> {
    if excluded.is_empty() {
        return files;
    }
    files
        .into_iter()
        .filter(|p| {
            let keep = !excluded.is_match(p);
            if !keep {
                tracing::debug!(file = %p.display(), "excluded by config");
            }
            keep
        })
        .collect()
}
