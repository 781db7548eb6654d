//! stegdetect - hide data in images and WAV audio, and detect it.
//!
//! LSB embedding with optional AES-256-GCM encryption, plus chi-square
//! and RS steganalysis for images.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{AnalyzeCommand, CapacityCommand, CommandExecutor, ExtractCommand, HideCommand};

/// stegdetect - LSB steganography and steganalysis
#[derive(Parser)]
#[command(name = "stegdetect")]
#[command(version)]
#[command(about = "LSB steganography for images and WAV audio, with chi-square and RS steganalysis")]
#[command(long_about = None)]
struct Cli {
    /// Verbose logging (debug level). RUST_LOG overrides this.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Hide a message or file in an image or WAV file
    Hide(HideCommand),

    /// Extract hidden data from an image or WAV file
    Extract(ExtractCommand),

    /// Analyze an image for LSB steganography
    Analyze(AnalyzeCommand),

    /// Show how much data a carrier can hold
    Capacity(CapacityCommand),
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Hide(cmd) => cmd.execute(),
        Commands::Extract(cmd) => cmd.execute(),
        Commands::Analyze(cmd) => cmd.execute(),
        Commands::Capacity(cmd) => cmd.execute(),
    }
}
