//! Larder CLI - generates the JSON endpoint consumed by the recipe installer
//!
//! Exit code is 0 on success and 1 on any fatal error.

use clap::{Parser, Subcommand};
use miette::Result;
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "larder")]
#[command(author = "Larder Contributors")]
#[command(version)]
#[command(about = "Generates the JSON endpoint consumed by the recipe installer", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the endpoint files from a recipe tree listing on stdin
    Generate {
        /// Repository identifier (`owner/repo` or a full URL)
        repository: String,

        /// Branch holding the recipe sources
        source_branch: String,

        /// Branch the generated endpoint is published on
        endpoint_branch: String,

        /// Directory where generated files are stored
        output_dir: PathBuf,

        /// JSON file describing the core package versions
        versions_json: Option<PathBuf>,

        /// Mark the index as community-contributed
        #[arg(long)]
        contrib: bool,
    },
}

fn main() -> Result<()> {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = Cli::parse();

    if cli.debug {
        // SAFETY: We're the only thread at this point (start of main)
        unsafe { std::env::set_var("RUST_BACKTRACE", "1") };
    }

    match cli.command {
        Commands::Generate {
            repository,
            source_branch,
            endpoint_branch,
            output_dir,
            versions_json,
            contrib,
        } => commands::generate::run(
            &repository,
            &source_branch,
            &endpoint_branch,
            &output_dir,
            versions_json.as_deref(),
            contrib,
        ),
    }
}
