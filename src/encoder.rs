//! Embedding pipeline.
//!
//! This module orchestrates hiding a secret in a carrier:
//! 1. Compress the secret (zlib)
//! 2. Encrypt with the password, if one is set (PBKDF2 + AES-256-GCM)
//! 3. Frame the result with the "STG1" signature and a big-endian length
//! 4. Write the framed bitstream into the carrier's low bits, tiling if needed

use rand::{CryptoRng, RngCore};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::EmbeddingConfig;
use crate::crypto::compression::compression_ratio;
use crate::crypto::{compress, encrypt, CompressionError, CryptoError};
use crate::stego::carrier::{Carrier, CarrierError};
use crate::stego::codec::{self, Embedded};
use crate::stego::frame::frame;

/// Errors that can occur during embedding.
#[derive(Error, Debug)]
pub enum EmbedError {
    #[error("Secret is empty")]
    EmptySecret,

    #[error("Payload of {0} bytes does not fit the frame length field")]
    PayloadTooLarge(usize),

    #[error("Compression error: {0}")]
    CompressionError(#[from] CompressionError),

    #[error("Encryption error: {0}")]
    EncryptionError(#[from] CryptoError),

    #[error("Carrier error: {0}")]
    CarrierError(#[from] CarrierError),
}

/// Builds the framed bitstream for `secret`: compressed, optionally
/// encrypted, then framed.
pub fn build_bitstream<R>(
    secret: &[u8],
    config: &EmbeddingConfig,
    rng: &mut R,
) -> Result<Vec<u8>, EmbedError>
where
    R: RngCore + CryptoRng,
{
    if secret.is_empty() {
        return Err(EmbedError::EmptySecret);
    }

    let compressed = compress(secret)?;
    debug!(
        original = secret.len(),
        compressed = compressed.len(),
        ratio = compression_ratio(secret, &compressed),
        "compressed secret"
    );

    let payload = match config.password() {
        Some(password) => encrypt(&compressed, password, rng)?,
        None => compressed,
    };

    if u32::try_from(payload.len()).is_err() {
        return Err(EmbedError::PayloadTooLarge(payload.len()));
    }

    Ok(frame(&payload))
}

/// Hides `secret` in a copy of `carrier`.
///
/// Fails only on an empty secret or an unusable carrier. A carrier too small
/// for the payload is tiled, so the returned carrier may be larger.
pub fn embed<C, R>(
    carrier: &C,
    secret: &[u8],
    config: &EmbeddingConfig,
    rng: &mut R,
) -> Result<Embedded<C>, EmbedError>
where
    C: Carrier,
    R: RngCore + CryptoRng,
{
    if carrier.is_empty() {
        return Err(CarrierError::Empty.into());
    }

    let bitstream = build_bitstream(secret, config, rng)?;
    let embedded = codec::embed(carrier, &bitstream, config.bits)?;

    info!(
        secret = secret.len(),
        framed = bitstream.len(),
        bits = config.bits.get(),
        encrypted = config.password().is_some(),
        tiled = embedded.plan.needs_tiling(),
        "embedded secret"
    );

    Ok(embedded)
}
