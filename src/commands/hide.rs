//! Hide command - embed a message or file in an image or WAV carrier.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use tracing::debug;

use stegdetect::config::{DEFAULT_BITS, MAX_EMBED_INPUT_BYTES};
use stegdetect::EmbeddingConfig;

use super::carrier_file::{check_file_size, CarrierFile, CarrierKind};
use super::CommandExecutor;

/// Hide a message or file in an image (PNG, BMP, JPEG) or WAV carrier.
///
/// Image output is always written losslessly (.png or .bmp).
/// If the carrier is too small, it is tiled and the output grows.
#[derive(Args, Debug)]
pub struct HideCommand {
    /// Path to the carrier file (.png, .bmp, .jpg, .jpeg or .wav)
    #[arg(short, long)]
    pub carrier: PathBuf,

    /// Text message to hide (mutually exclusive with --file)
    #[arg(short, long, conflicts_with = "file", required_unless_present = "file")]
    pub message: Option<String>,

    /// File to hide (mutually exclusive with --message)
    #[arg(short, long, conflicts_with = "message")]
    pub file: Option<PathBuf>,

    /// Password for encryption (AES-256-GCM). Omit to store unencrypted.
    #[arg(short, long)]
    pub password: Option<String>,

    /// Low bits used per sample (1-8). Higher means more capacity and more noise.
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_BITS,
        value_parser = clap::value_parser!(u8).range(1..=8)
    )]
    pub bits: u8,

    /// Output path (.png or .bmp for images, .wav for audio)
    #[arg(short, long)]
    pub output: PathBuf,
}

impl CommandExecutor for HideCommand {
    fn execute(&self) -> Result<()> {
        check_file_size(&self.carrier, MAX_EMBED_INPUT_BYTES)?;

        let secret = self.read_secret()?;
        let config = EmbeddingConfig::new(self.bits)?.with_password(self.password.clone());

        let carrier = CarrierFile::open(&self.carrier)?;
        debug!("carrier: {}", carrier.describe());

        let hidden = carrier
            .hide(&secret, &config)
            .context("Failed to hide data")?;
        hidden
            .save(&self.output)
            .with_context(|| format!("Failed to write {}", self.output.display()))?;

        println!(
            "Hid {} bytes in {} ({} bit(s) per sample{})",
            secret.len(),
            self.output.display(),
            config.bits,
            if config.password().is_some() { ", encrypted" } else { "" }
        );
        let repeats = hidden.element_count() / carrier.element_count().max(1);
        if repeats > 1 {
            let axis = match carrier.kind() {
                CarrierKind::Image => "rows",
                CarrierKind::Audio => "frames",
            };
            eprintln!(
                "Note: carrier was too small and was repeated {}x along its {} (output is larger than the input)",
                repeats, axis
            );
        }

        Ok(())
    }
}

impl HideCommand {
    fn read_secret(&self) -> Result<Vec<u8>> {
        let secret = match (&self.message, &self.file) {
            (Some(message), _) => message.as_bytes().to_vec(),
            (None, Some(path)) => {
                check_file_size(path, MAX_EMBED_INPUT_BYTES)?;
                fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?
            }
            (None, None) => bail!("No secret data provided. Use --message or --file"),
        };

        if secret.is_empty() {
            bail!("Secret data is empty");
        }
        Ok(secret)
    }
}
