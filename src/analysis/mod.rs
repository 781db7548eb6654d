//! Steganalysis: statistical detection of LSB embedding in images.
//!
//! Two independent detectors run on the same RGB image:
//! - [`chi_square`]: pair-of-values histogram attack, per channel
//! - [`rs`]: Regular/Singular block analysis on the grayscale image
//!
//! Their scores are fused into a single suspicion level and a [`Verdict`].

pub mod chi_square;
pub mod rs;
pub mod stats;

use std::fmt;

use image::{DynamicImage, RgbImage};
use serde::Serialize;
use tracing::info;

pub use chi_square::{chi_square_report, chi_square_score, ChiSquareReport};
pub use rs::{rs_score, rs_statistics, RsStatistics};

/// Below this RS score the image is treated as clean by the RS detector.
pub const RS_CLEAN_THRESHOLD: f64 = 0.1;

/// Suspicion cap applied when RS reports clean.
pub const RS_CLEAN_CAP: f64 = 0.4;

/// Categorical outcome of an analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    Clean,
    Uncertain,
    Suspicious,
    Critical,
}

impl Verdict {
    /// Buckets a fused suspicion level.
    pub fn from_suspicion(suspicion: f64) -> Self {
        if suspicion > 0.75 {
            Verdict::Critical
        } else if suspicion > 0.4 {
            Verdict::Suspicious
        } else if suspicion > 0.15 {
            Verdict::Uncertain
        } else {
            Verdict::Clean
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Verdict::Critical => "Strong statistical evidence of hidden data.",
            Verdict::Suspicious => "Anomalies detected in bit plane statistics.",
            Verdict::Uncertain => "Mild deviations from natural statistics.",
            Verdict::Clean => "No significant statistical anomalies detected.",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Verdict::Critical => "Critical",
            Verdict::Suspicious => "Suspicious",
            Verdict::Uncertain => "Uncertain",
            Verdict::Clean => "Clean",
        };
        write!(f, "{}", name)
    }
}

/// Result of analysing one image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub chi_square_score: f64,
    pub rs_analysis_score: f64,
    pub suspicion_level: f64,
    pub label: Verdict,
    pub analysis: String,
}

/// Combines the two detector scores.
///
/// RS is the more reliable detector. When it reports clean, chi-square gets
/// less weight and the result is capped, since chi-square fires on smooth
/// natural gradients.
pub fn fuse(chi_square: f64, rs: f64) -> f64 {
    if rs < RS_CLEAN_THRESHOLD {
        (0.7 * rs + 0.3 * chi_square).min(RS_CLEAN_CAP)
    } else {
        0.6 * rs + 0.4 * chi_square
    }
}

/// Runs both detectors on an RGB image.
pub fn analyze(image: &RgbImage) -> AnalysisResult {
    let chi_square_score = chi_square_score(image).clamp(0.0, 1.0);
    let rs_analysis_score = rs_score(image).clamp(0.0, 1.0);
    let suspicion_level = fuse(chi_square_score, rs_analysis_score).clamp(0.0, 1.0);
    let label = Verdict::from_suspicion(suspicion_level);

    info!(
        chi_square_score,
        rs_analysis_score, suspicion_level, %label, "steganalysis complete"
    );

    AnalysisResult {
        chi_square_score,
        rs_analysis_score,
        suspicion_level,
        label,
        analysis: format!("{}: {}", label, label.description()),
    }
}

/// Runs both detectors on any image, ignoring alpha.
pub fn analyze_image(image: &DynamicImage) -> AnalysisResult {
    analyze(&image.to_rgb8())
}
