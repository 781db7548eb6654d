//! Extraction pipeline.
//!
//! Reverses [`crate::encoder`]: read and validate the frame, decrypt when a
//! password is given, then decompress.
//!
//! Two kinds of "failure" are kept apart:
//! - no valid frame in the carrier is a normal outcome, [`Extraction::Absent`]
//! - a failed authentication is an error, [`ExtractError::Authentication`]

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::EmbeddingConfig;
use crate::crypto::{decompress_or_raw, decrypt, CryptoError};
use crate::stego::carrier::{Carrier, Sample};
use crate::stego::codec;

/// Errors that can occur during extraction.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Decryption failed: {0}")]
    Authentication(#[from] CryptoError),
}

/// Result of looking for a payload in a carrier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// A framed payload was found.
    Found {
        /// The recovered secret.
        data: Vec<u8>,
        /// True when the payload did not decompress and `data` holds the raw
        /// (decrypted, if applicable) bytes instead.
        raw_fallback: bool,
    },
    /// No valid frame, an implausible length, or a truncated carrier.
    Absent,
}

impl Extraction {
    pub fn is_absent(&self) -> bool {
        matches!(self, Extraction::Absent)
    }

    /// The recovered bytes, if any.
    pub fn data(&self) -> Option<&[u8]> {
        match self {
            Extraction::Found { data, .. } => Some(data),
            Extraction::Absent => None,
        }
    }

    pub fn into_data(self) -> Option<Vec<u8>> {
        match self {
            Extraction::Found { data, .. } => Some(data),
            Extraction::Absent => None,
        }
    }
}

/// Extracts a hidden secret from a carrier.
pub fn extract<C: Carrier>(
    carrier: &C,
    config: &EmbeddingConfig,
) -> Result<Extraction, ExtractError> {
    extract_elements(carrier.elements(), config)
}

/// Extracts a hidden secret from a flat element sequence.
pub fn extract_elements<E: Sample>(
    elements: &[E],
    config: &EmbeddingConfig,
) -> Result<Extraction, ExtractError> {
    let Some(payload) = codec::extract(elements, config.bits) else {
        debug!(bits = config.bits.get(), "no hidden data found");
        return Ok(Extraction::Absent);
    };

    let compressed = match config.password() {
        Some(password) => decrypt(&payload, password).map_err(|e| {
            warn!("payload failed authentication");
            ExtractError::from(e)
        })?,
        None => payload,
    };

    let decompressed = decompress_or_raw(&compressed);
    info!(
        bytes = decompressed.data.len(),
        raw_fallback = decompressed.raw_fallback,
        "extracted secret"
    );

    Ok(Extraction::Found {
        data: decompressed.data,
        raw_fallback: decompressed.raw_fallback,
    })
}
