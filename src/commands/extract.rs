//! Extract command - recover hidden data from an image or WAV carrier.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use stegdetect::config::{DEFAULT_BITS, MAX_ANALYSIS_INPUT_BYTES};
use stegdetect::{EmbeddingConfig, Extraction};

use super::carrier_file::{check_file_size, CarrierFile};
use super::CommandExecutor;

/// Default file name for binary output.
const DEFAULT_BINARY_OUTPUT: &str = "extracted_data.bin";

/// Extract hidden data from an image or WAV carrier.
///
/// Text is printed to stdout. Binary data is written to --output
/// (or extracted_data.bin when --output is not given).
#[derive(Args, Debug)]
pub struct ExtractCommand {
    /// Path to the stego file (.png, .bmp, .jpg, .jpeg or .wav)
    #[arg(short, long)]
    pub carrier: PathBuf,

    /// Password used when hiding
    #[arg(short, long)]
    pub password: Option<String>,

    /// Low bits used per sample when hiding (1-8)
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_BITS,
        value_parser = clap::value_parser!(u8).range(1..=8)
    )]
    pub bits: u8,

    /// Write extracted bytes to this file instead of printing them
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl CommandExecutor for ExtractCommand {
    fn execute(&self) -> Result<()> {
        check_file_size(&self.carrier, MAX_ANALYSIS_INPUT_BYTES)?;

        let config = EmbeddingConfig::new(self.bits)?.with_password(self.password.clone());
        let carrier = CarrierFile::open(&self.carrier)?;

        let (data, raw_fallback) = match carrier.extract(&config)? {
            Extraction::Found { data, raw_fallback } => (data, raw_fallback),
            Extraction::Absent => bail!("No hidden data found"),
        };

        if raw_fallback {
            eprintln!("Warning: payload was not compressed data; showing raw bytes");
        }

        if let Some(path) = &self.output {
            fs::write(path, &data)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Extracted {} bytes to {}", data.len(), path.display());
            return Ok(());
        }

        match String::from_utf8(data) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                let data = e.into_bytes();
                fs::write(DEFAULT_BINARY_OUTPUT, &data)
                    .with_context(|| format!("Failed to write {}", DEFAULT_BINARY_OUTPUT))?;
                println!(
                    "Extracted {} bytes of binary data to {}",
                    data.len(),
                    DEFAULT_BINARY_OUTPUT
                );
            }
        }

        Ok(())
    }
}
