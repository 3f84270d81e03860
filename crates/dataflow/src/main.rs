//! Dataflow CLI - system design artifacts from plain-language descriptions.
//!
//! Provides commands for:
//! - `generate`: Ask the generation service for an ER diagram, ER document,
//!   API documentation or data flow documentation
//! - `convert`: Translate between `erDiagram` text and the JSON document locally

mod commands;
mod error;
mod output;
mod prompts;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ConvertArgs, GenerateArgs};
use output::Output;

/// Dataflow - system design artifacts from plain-language descriptions.
#[derive(Parser)]
#[command(name = "dataflow", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an artifact from a system description.
    Generate(GenerateArgs),
    /// Convert between erDiagram text and the JSON document form.
    Convert(ConvertArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = matches!(&cli.command, Commands::Generate(args) if args.verbose);

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Generate(args) => args.execute(&output),
        Commands::Convert(args) => args.execute(&output),
    };

    if let Err(err) = result {
        output.failure(&err);
        std::process::exit(1);
    }
}
