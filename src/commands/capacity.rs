//! Capacity command - show how much a carrier can hold.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use stegdetect::config::DEFAULT_BITS;
use stegdetect::BitDepth;

use super::carrier_file::CarrierFile;
use super::CommandExecutor;

/// Show the capacity of a carrier and, optionally, how a payload would fit.
#[derive(Args, Debug)]
pub struct CapacityCommand {
    /// Path to the carrier file (.png, .bmp, .jpg, .jpeg or .wav)
    #[arg(short, long)]
    pub carrier: PathBuf,

    /// Low bits used per sample (1-8)
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_BITS,
        value_parser = clap::value_parser!(u8).range(1..=8)
    )]
    pub bits: u8,

    /// Payload size in bytes to plan for (after compression and encryption)
    #[arg(short, long)]
    pub size: Option<usize>,
}

impl CommandExecutor for CapacityCommand {
    fn execute(&self) -> Result<()> {
        let bits = BitDepth::new(self.bits)?;
        let carrier = CarrierFile::open(&self.carrier)?;

        println!("Carrier:  {}", carrier.describe());
        println!("Capacity: {} bytes at {} bit(s) per sample", carrier.capacity(bits), bits);

        if let Some(size) = self.size {
            let plan = carrier.plan(size, bits);
            println!(
                "Payload of {} bytes needs {} of {} samples",
                size, plan.required_elements, plan.available_elements
            );
            if plan.needs_tiling() {
                println!(
                    "Carrier would be repeated {}x ({} samples)",
                    plan.repeats, plan.output_elements
                );
            }
        }

        Ok(())
    }
}
