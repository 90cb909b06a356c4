use std::path::PathBuf;

use clap::{Parser, Subcommand};
use promptkit::config::PACKS_DIR_ENV;

#[derive(Parser)]
#[command(
    name = "promptkit",
    about = "Install prompt packs into a repository and keep AGENTS.md in sync",
    version
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(global = true, long, short)]
    pub verbose: bool,

    /// Directory containing packs (defaults to the built-in packs)
    #[arg(global = true, long, env = PACKS_DIR_ENV)]
    pub packs_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List available and installed packs
    List {
        /// Target repository root
        #[arg(short, long, default_value = ".")]
        path: PathBuf,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Install a pack into a repository
    Install {
        /// Pack name
        pack: String,

        /// Target repository root
        #[arg(short, long, default_value = ".")]
        path: PathBuf,

        /// Overwrite files that already exist
        #[arg(short, long)]
        force: bool,

        /// Print the install report as JSON
        #[arg(long)]
        json: bool,
    },
}
