// feather-cli/src/main.rs
//
// Entry point for the `feather` binary.
//
// Responsibilities:
// - Parsing the command line.
// - Installing the logger (console, plus a log file for `apply --log-dir`).
// - Dispatching to the subcommand.
// - Mapping failures to exit codes: 2 for configuration errors, 1 otherwise.

use std::process;

use clap::Parser;
use feather_cli::{Cli, Commands, exit_code, logging, run_apply, run_mask, run_probe, terminal};

fn main() {
    let cli = Cli::parse();
    terminal::configure_colors();

    let log_dir = match &cli.command {
        Commands::Apply(args) => args.log_dir.as_deref(),
        _ => None,
    };
    match logging::init_logging(cli.verbose, log_dir) {
        Ok(Some(path)) => log::debug!("Writing log file to {}", path.display()),
        Ok(None) => {}
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(feather_cli::error::EXIT_FAILURE);
        }
    }

    let result = match &cli.command {
        Commands::Apply(args) => run_apply(args).map(|_| ()),
        Commands::Probe(args) => run_probe(args).map(|_| ()),
        Commands::Mask(args) => run_mask(args).map(|_| ()),
    };

    if let Err(e) = result {
        terminal::print_error(&e);
        process::exit(exit_code(&e));
    }
}
