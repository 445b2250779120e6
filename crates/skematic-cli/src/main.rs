//! # skematic CLI Entry Point
//!
//! Assembles subcommands and dispatches to handler modules.

use std::process::ExitCode;

use clap::Parser;

/// Skematic — JSON Schema validation and inference toolkit.
///
/// Validates JSON/YAML documents against JSON-Schema-shaped descriptions
/// and derives schemas from sample corpora.
#[derive(Parser, Debug)]
#[command(name = "skematic", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Validate a document against a schema.
    Validate(skematic_cli::validate::ValidateArgs),
    /// Infer a schema from sample documents.
    Infer(skematic_cli::infer::InferArgs),
}

fn main() -> anyhow::Result<ExitCode> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate(args) => {
            let valid = skematic_cli::validate::run(&args)?;
            Ok(if valid {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Commands::Infer(args) => {
            skematic_cli::infer::run(&args)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
