//! rubric - fingerprint rubric documents and resolve grader selections.

mod commands;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use rubric_runtime::RuntimeError;

/// Exit code for a selection that does not match its rubric.
const EXIT_INVALID_SELECTION: u8 = 3;

#[derive(Parser, Debug)]
#[command(name = "rubric", version, about = "Rubric fingerprinting and selection resolution")]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log filter (e.g. "info", "rubric_core=debug"); RUST_LOG wins
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Runtime configuration file (YAML or JSON)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the structure fingerprint of a rubric document
    Fingerprint {
        /// Rubric document (YAML or JSON)
        file: PathBuf,

        /// Hash full content (prompts and explanations) instead of structure
        #[arg(long)]
        content: bool,
    },

    /// Check a rubric document against the shape schema
    Validate {
        /// Rubric document (YAML or JSON)
        file: PathBuf,
    },

    /// Resolve a grader's selection to option ids and a score
    Resolve {
        /// Rubric document (YAML or JSON)
        rubric: PathBuf,

        /// Selection document: criterion name → option name (or points)
        selection: PathBuf,

        /// Selection values are point values instead of option names
        #[arg(long)]
        points: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init_tracing(cli.verbose, cli.log_level.as_deref()) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    match commands::run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {:#}", e);
            match e.downcast_ref::<RuntimeError>() {
                Some(RuntimeError::InvalidOptionSelection(_)) => {
                    ExitCode::from(EXIT_INVALID_SELECTION)
                }
                _ => ExitCode::FAILURE,
            }
        }
    }
}
