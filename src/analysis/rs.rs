//! RS (Regular/Singular) analysis on horizontal 1x2 pixel blocks.
//!
//! Each block is a pair (x, y) of neighbouring grayscale pixels, x in an even
//! column and y in the odd column after it. The discriminant is |x - y|. A
//! block is *regular* under a transform when the transform increases the
//! discriminant and *singular* when it decreases it.
//!
//! Transforms:
//! - F1 flips the LSB (0<->1, 2<->3, ...)
//! - F-1 shifts by one the other way (-1<->0, 1<->2, ...)
//!
//! The positive mask M = [0, 1] applies the transform to y, the mirrored mask
//! [1, 0] to x. On a clean image F1 and F-1 change the R/S balance about
//! equally; LSB embedding erodes the F1 divergence while the F-1 divergence
//! stays, so their ratio drops towards 0.

use image::RgbImage;
use tracing::debug;

/// At or above this ratio the image is considered clean.
pub const CLEAN_RATIO: f64 = 0.85;

/// At or below this ratio suspicion saturates at 1.
pub const SATURATED_RATIO: f64 = 0.2;

/// Regular/singular fractions for one mask.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MaskStatistics {
    /// Fraction of blocks F1 makes more irregular.
    pub regular: f64,
    /// Fraction of blocks F1 makes more regular.
    pub singular: f64,
    /// Fraction of blocks F-1 makes more irregular.
    pub regular_negated: f64,
    /// Fraction of blocks F-1 makes more regular.
    pub singular_negated: f64,
}

/// R/S statistics for both masks.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RsStatistics {
    /// Blocks counted (flat blocks excluded).
    pub blocks: usize,
    /// Mask [0, 1]: transforms applied to the odd-column pixel.
    pub positive: MaskStatistics,
    /// Mask [1, 0]: transforms applied to the even-column pixel.
    pub negative: MaskStatistics,
}

impl RsStatistics {
    /// |R_M - S_M| / |R_-M - S_-M| for the positive mask, or `None` when the
    /// F-1 divergence is zero.
    pub fn ratio(&self) -> Option<f64> {
        let flip = (self.positive.regular - self.positive.singular).abs();
        let shift = (self.positive.regular_negated - self.positive.singular_negated).abs();
        if shift == 0.0 {
            None
        } else {
            Some(flip / shift)
        }
    }
}

/// Grayscale value with ITU-R 601-2 luma weights, rounded in 16-bit fixed
/// point.
pub fn luma(rgb: [u8; 3]) -> i16 {
    let [r, g, b] = rgb.map(u32::from);
    ((r * 19_595 + g * 38_470 + b * 7_471 + 0x8000) >> 16) as i16
}

/// F1: flip the least significant bit.
fn flip(value: i16) -> i16 {
    value ^ 1
}

/// F-1: -1 for even values, +1 for odd ones.
fn shift(value: i16) -> i16 {
    value + ((value & 1) * 2 - 1)
}

#[derive(Default)]
struct Counts {
    regular: usize,
    singular: usize,
    regular_negated: usize,
    singular_negated: usize,
}

impl Counts {
    fn record(&mut self, d0: i16, d_flip: i16, d_shift: i16) {
        self.regular += usize::from(d_flip > d0);
        self.singular += usize::from(d_flip < d0);
        self.regular_negated += usize::from(d_shift > d0);
        self.singular_negated += usize::from(d_shift < d0);
    }

    fn fractions(&self, blocks: usize) -> MaskStatistics {
        let n = blocks as f64;
        MaskStatistics {
            regular: self.regular as f64 / n,
            singular: self.singular as f64 / n,
            regular_negated: self.regular_negated as f64 / n,
            singular_negated: self.singular_negated as f64 / n,
        }
    }
}

/// Collects R/S statistics, or `None` when the image has no usable block.
pub fn rs_statistics(image: &RgbImage) -> Option<RsStatistics> {
    let (width, height) = image.dimensions();
    let pairs = width / 2;

    let mut positive = Counts::default();
    let mut negative = Counts::default();
    let mut blocks = 0usize;

    for row in 0..height {
        for pair in 0..pairs {
            let x = luma(image.get_pixel(pair * 2, row).0);
            let y = luma(image.get_pixel(pair * 2 + 1, row).0);

            let d0 = (x - y).abs();
            let d_flip_pos = (x - flip(y)).abs();

            // Skip perfectly flat blocks
            if d0 == 0 && d_flip_pos == 0 {
                continue;
            }
            blocks += 1;

            positive.record(d0, d_flip_pos, (x - shift(y)).abs());
            negative.record(d0, (flip(x) - y).abs(), (shift(x) - y).abs());
        }
    }

    if blocks == 0 {
        return None;
    }

    Some(RsStatistics {
        blocks,
        positive: positive.fractions(blocks),
        negative: negative.fractions(blocks),
    })
}

/// Maps an RS ratio to a suspicion score in [0, 1].
pub fn score_from_ratio(ratio: f64) -> f64 {
    if ratio >= CLEAN_RATIO {
        return 0.0;
    }
    let suspicion = 1.0 - (ratio - SATURATED_RATIO) / (CLEAN_RATIO - SATURATED_RATIO);
    suspicion.clamp(0.0, 1.0)
}

/// RS detector score in [0, 1].
pub fn rs_score(image: &RgbImage) -> f64 {
    let Some(stats) = rs_statistics(image) else {
        return 0.0;
    };

    let score = stats.ratio().map(score_from_ratio).unwrap_or(0.0);
    debug!(blocks = stats.blocks, ratio = ?stats.ratio(), score, "RS analysis");
    score
}
