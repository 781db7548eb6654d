//! Chi-square attack on pairs of values.
//!
//! Sequential LSB replacement pushes the counts of each value pair (2k, 2k+1)
//! towards their mean. For every RGB channel the pair counts are tested
//! against that equal split; a p-value near 1 means the histogram looks
//! flattened the way embedding flattens it.

use image::RgbImage;
use tracing::debug;

use crate::analysis::stats::chi_square_test;

/// A value pair is only tested when its combined count exceeds this.
pub const MIN_PAIR_COUNT: u64 = 20;

/// Fewer accumulated observations than this give a channel score of 0.
pub const MIN_OBSERVATIONS: usize = 21;

/// Per-channel and overall chi-square scores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChiSquareReport {
    /// p-value for R, G and B.
    pub channel_scores: [f64; 3],
    /// Highest channel p-value.
    pub score: f64,
}

/// Counts every value of one channel.
pub fn channel_histogram(image: &RgbImage, channel: usize) -> [u64; 256] {
    let mut counts = [0u64; 256];
    for pixel in image.pixels() {
        counts[pixel.0[channel] as usize] += 1;
    }
    counts
}

/// p-value of the pair-balance test for one channel histogram.
pub fn channel_score(counts: &[u64; 256]) -> f64 {
    let mut observed = Vec::with_capacity(256);
    let mut expected = Vec::with_capacity(256);

    for pair in counts.chunks_exact(2) {
        let (even, odd) = (pair[0], pair[1]);
        if even + odd > MIN_PAIR_COUNT {
            let mean = (even + odd) as f64 / 2.0;
            observed.extend([even as f64, odd as f64]);
            expected.extend([mean, mean]);
        }
    }

    if observed.len() < MIN_OBSERVATIONS {
        return 0.0;
    }

    chi_square_test(&observed, &expected)
        .map(|test| test.p_value)
        .unwrap_or(0.0)
}

/// Runs the attack on all three channels.
pub fn chi_square_report(image: &RgbImage) -> ChiSquareReport {
    let mut channel_scores = [0.0; 3];
    for (channel, score) in channel_scores.iter_mut().enumerate() {
        *score = channel_score(&channel_histogram(image, channel));
    }

    let score = channel_scores.iter().copied().fold(0.0, f64::max);
    debug!(?channel_scores, score, "chi-square attack");

    ChiSquareReport {
        channel_scores,
        score,
    }
}

/// Chi-square detector score in [0, 1].
pub fn chi_square_score(image: &RgbImage) -> f64 {
    chi_square_report(image).score
}
