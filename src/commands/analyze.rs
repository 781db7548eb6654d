//! Analyze command - run steganalysis on an image.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use stegdetect::analysis::{chi_square_report, rs_statistics};
use stegdetect::analyze;
use stegdetect::config::MAX_ANALYSIS_INPUT_BYTES;
use stegdetect::ImageStego;

use super::carrier_file::{check_file_size, CarrierKind};
use super::CommandExecutor;

/// Detect LSB steganography in an image (chi-square attack + RS analysis).
#[derive(Args, Debug)]
pub struct AnalyzeCommand {
    /// Path to the image (.png, .bmp, .jpg or .jpeg)
    #[arg(short, long)]
    pub image: PathBuf,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    /// Show per-channel and per-mask statistics
    #[arg(short, long)]
    pub detailed: bool,
}

impl CommandExecutor for AnalyzeCommand {
    fn execute(&self) -> Result<()> {
        if CarrierKind::from_path(&self.image)? == CarrierKind::Audio {
            println!("Analysis currently only supported for images");
            return Ok(());
        }
        check_file_size(&self.image, MAX_ANALYSIS_INPUT_BYTES)?;

        let image = ImageStego::from_file(&self.image)
            .with_context(|| format!("Failed to load image {}", self.image.display()))?
            .to_rgb()?;

        let result = analyze(&image);

        if self.json {
            let json = serde_json::to_string_pretty(&result)
                .context("Failed to serialize analysis result")?;
            println!("{}", json);
            return Ok(());
        }

        println!("Verdict:          {}", result.label);
        println!("Suspicion level:  {:.3}", result.suspicion_level);
        println!("Chi-square score: {:.3}", result.chi_square_score);
        println!("RS score:         {:.3}", result.rs_analysis_score);
        println!("{}", result.label.description());

        if self.detailed {
            let chi = chi_square_report(&image);
            println!();
            println!(
                "Chi-square p-values (R, G, B): {:.4}, {:.4}, {:.4}",
                chi.channel_scores[0], chi.channel_scores[1], chi.channel_scores[2]
            );
            match rs_statistics(&image) {
                Some(rs) => {
                    println!("RS blocks: {}", rs.blocks);
                    for (name, mask) in [("[0,1]", rs.positive), ("[1,0]", rs.negative)] {
                        println!(
                            "  mask {}: R={:.4} S={:.4} R-={:.4} S-={:.4}",
                            name,
                            mask.regular,
                            mask.singular,
                            mask.regular_negated,
                            mask.singular_negated
                        );
                    }
                    match rs.ratio() {
                        Some(ratio) => println!("  ratio: {:.4}", ratio),
                        None => println!("  ratio: undefined"),
                    }
                }
                None => println!("RS: no usable blocks"),
            }
        }

        Ok(())
    }
}
