//! Command-line interface for quality-gate.

use clap::{ArgAction, Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::config::GateConfig;
use crate::gate::Gate;
use crate::report;
use crate::select;
use crate::verdict::{GateOutcome, EXIT_ERROR, EXIT_SUCCESS};

/// Pre-commit quality gate for Python sources.
///
/// Checks files for hardcoded secrets, eval() calls, missing module
/// docstrings and deeply nested functions. Exits 1 when any error-severity
/// violation is found; warnings alone never fail the gate.
#[derive(Parser)]
#[command(name = "quality-gate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate files against the quality gate
    #[command(visible_alias = "lint")]
    Check(CheckArgs),
    /// Create a quality-gate config from a template
    Init(InitArgs),
}

/// Arguments for the check command.
#[derive(Parser)]
pub struct CheckArgs {
    /// Files or directories to validate
    pub files: Vec<PathBuf>,

    /// Check only files staged in git (git diff --cached)
    #[arg(long)]
    pub staged: bool,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Override the maximum function nesting depth (0 disables the check)
    #[arg(long)]
    pub max_nesting_depth: Option<usize>,

    /// Disable hardcoded secret detection
    #[arg(long)]
    pub no_secrets: bool,

    /// Disable eval() detection
    #[arg(long)]
    pub no_eval: bool,

    /// Disable the module docstring requirement
    #[arg(long)]
    pub no_docstrings: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl CheckArgs {
    /// Apply command-line overrides on top of the loaded config.
    pub fn apply_overrides(&self, config: &mut GateConfig) {
        if let Some(depth) = self.max_nesting_depth {
            config.max_nesting_depth = depth;
        }
        if self.no_secrets {
            config.forbid_hardcoded_secrets = false;
        }
        if self.no_eval {
            config.forbid_eval_usage = false;
        }
        if self.no_docstrings {
            config.require_module_docstrings = false;
        }
    }
}

/// Arguments for the init command.
#[derive(Parser)]
pub struct InitArgs {
    /// Output file path
    #[arg(short, long, default_value = "quality-gate.yaml")]
    pub output: PathBuf,

    /// Template to use
    #[arg(short, long, default_value = "default")]
    pub template: String,

    /// List available templates
    #[arg(short, long)]
    pub list: bool,
}

/// An embedded config template.
struct Template {
    name: &'static str,
    description: &'static str,
    content: &'static str,
}

static TEMPLATES: &[Template] = &[
    Template {
        name: "default",
        description: "All checks on, nesting limit 5, staged files under src/",
        content: include_str!("templates/default.yaml"),
    },
    Template {
        name: "strict",
        description: "Nesting limit 3, every staged file, migrations excluded",
        content: include_str!("templates/strict.yaml"),
    },
];

/// Run the check command.
pub fn run_check(args: &CheckArgs) -> anyhow::Result<i32> {
    if args.format != "pretty" && args.format != "json" {
        eprintln!(
            "Error: invalid format {:?}, must be 'pretty' or 'json'",
            args.format
        );
        return Ok(EXIT_ERROR);
    }

    if args.no_color {
        colored::control::set_override(false);
    }

    let cwd = std::env::current_dir()?;

    let (mut config, config_path) = match GateConfig::load(args.config.as_deref(), &cwd) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };
    args.apply_overrides(&mut config);
    if let Some(path) = &config_path {
        tracing::info!(config = %path.display(), "using config");
    }

    let files = match resolve_files(args, &config, &cwd) {
        Ok(Some(files)) => files,
        Ok(None) => {
            eprintln!("Error: no files specified. Use --staged or provide file paths.");
            return Ok(EXIT_ERROR);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    if files.is_empty() {
        if args.format == "json" {
            report::write_json(&GateOutcome::default())?;
        } else {
            println!("No Python files to validate");
        }
        return Ok(EXIT_SUCCESS);
    }

    tracing::info!(files = files.len(), "validating");
    let gate = Gate::new(&config);
    let outcome = gate.validate_files(&files);

    match args.format.as_str() {
        "json" => report::write_json(&outcome)?,
        _ => report::write_pretty(&outcome),
    }

    Ok(outcome.decision().exit_code())
}

/// Resolve the working set. `None` when nothing was asked for.
fn resolve_files(
    args: &CheckArgs,
    config: &GateConfig,
    cwd: &Path,
) -> anyhow::Result<Option<Vec<PathBuf>>> {
    let excluded = config.exclusion_matcher()?;

    if args.staged {
        let include = config.staged_matcher()?;
        return Ok(Some(select::staged(cwd, &include, &excluded)?));
    }
    if args.files.is_empty() {
        return Ok(None);
    }
    Ok(Some(select::explicit(&args.files, &excluded)?))
}

/// Run the init command.
pub fn run_init(args: &InitArgs) -> anyhow::Result<i32> {
    if args.list {
        return list_templates();
    }

    let template = match TEMPLATES.iter().find(|t| t.name == args.template) {
        Some(t) => t,
        None => {
            eprintln!("Error: unknown template {:?}", args.template);
            eprintln!("Run 'quality-gate init --list' to see available templates");
            return Ok(EXIT_ERROR);
        }
    };

    if args.output.exists() {
        eprintln!("Error: file already exists: {}", args.output.display());
        eprintln!("Remove it or use --output to specify a different path");
        return Ok(EXIT_ERROR);
    }

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() && parent != Path::new(".") {
            if let Err(e) = std::fs::create_dir_all(parent) {
                eprintln!("Error: failed to create directory: {}", e);
                return Ok(EXIT_ERROR);
            }
        }
    }

    if let Err(e) = std::fs::write(&args.output, template.content) {
        eprintln!("Error: failed to write config: {}", e);
        return Ok(EXIT_ERROR);
    }

    println!("Created {} from template '{}'", args.output.display(), template.name);
    println!();
    println!("Next steps:");
    println!("  1. Edit {} to customize for your project", args.output.display());
    println!("  2. Add to your pre-commit hook: quality-gate check --staged");

    Ok(EXIT_SUCCESS)
}

fn list_templates() -> anyhow::Result<i32> {
    println!("Available templates:");
    println!();

    for template in TEMPLATES {
        let name = if template.name == "default" {
            format!("{} (default)", template.name)
        } else {
            template.name.to_string()
        };
        println!("  {:<20} {}", name, template.description);
    }

    println!();
    println!("Usage:");
    println!("  quality-gate init --template <name>");

    Ok(EXIT_SUCCESS)
}
