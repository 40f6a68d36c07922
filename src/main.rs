//! quality-gate CLI entry point.

use clap::Parser;
use quality_gate::cli::{self, Cli, Commands};
use quality_gate::logging;
use quality_gate::verdict::EXIT_ERROR;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match &cli.command {
        Commands::Check(args) => cli::run_check(args),
        Commands::Init(args) => cli::run_init(args),
    };

    let exit_code = match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_ERROR
        }
    };

    std::process::exit(exit_code);
}
