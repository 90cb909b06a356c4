mod cli;
mod commands;

use std::process::ExitCode;

use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;
use promptkit::config::Config;
use promptkit::error::Result;
use tracing_subscriber::EnvFilter;

use commands::packs::{cmd_install, cmd_list};

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Usage errors exit 1; --help and --version exit 0
            let code = if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
            let _ = e.print();
            return code;
        }
    };

    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::List { path, json } => {
            let config = Config::load(Some(&path), cli.packs_dir)?;
            cmd_list(&config, json)
        }
        Commands::Install {
            pack,
            path,
            force,
            json,
        } => {
            let config = Config::load(Some(&path), cli.packs_dir)?;
            cmd_install(&config, &pack, force, json)
        }
    }
}

/// RUST_LOG wins; otherwise warnings only, or debug output for promptkit with --verbose
fn init_tracing(verbose: bool) {
    let fallback = if verbose { "promptkit=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
