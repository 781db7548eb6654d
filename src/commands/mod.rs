//! CLI subcommands.
//!
//! Each subcommand is a clap `Args` struct implementing [`CommandExecutor`].
//! Carrier detection by file extension lives in `carrier_file`.

mod analyze;
mod capacity;
mod carrier_file;
mod extract;
mod hide;

pub use analyze::AnalyzeCommand;
pub use capacity::CapacityCommand;
pub use extract::ExtractCommand;
pub use hide::HideCommand;

use anyhow::Result;

/// A parsed subcommand that can be run.
pub trait CommandExecutor {
    fn execute(&self) -> Result<()>;
}
