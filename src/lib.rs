//! # stegdetect - LSB steganography and steganalysis
//!
//! stegdetect hides arbitrary data in the least significant bits of image
//! pixels or 16-bit PCM audio samples, and detects such embedding in images
//! with statistical tests.
//!
//! ## Embedding
//!
//! - The secret is **compressed** (zlib)
//! - Optionally **encrypted** with a password (PBKDF2-HMAC-SHA256 + AES-256-GCM)
//! - **Framed** with a "STG1" signature and a big-endian length
//! - Written into the low `n` bits (1 to 8) of each carrier element in order
//! - Carriers that are too small are **tiled** rather than rejected
//!
//! Extraction never mistakes "nothing here" for an error: a carrier without a
//! valid frame yields [`Extraction::Absent`], while a wrong password is a
//! loud [`ExtractError::Authentication`].
//!
//! ## Steganalysis
//!
//! [`analysis::analyze`] runs a chi-square pair attack and RS analysis and
//! fuses them into a suspicion level in [0, 1] with a [`Verdict`].
//!
//! ## Example Usage
//!
//! ```rust
//! use image::{ImageBuffer, Rgb};
//! use stegdetect::{EmbeddingConfig, ImageStego};
//!
//! let cover = ImageBuffer::from_fn(100, 100, |x, y| Rgb([x as u8, y as u8, (x ^ y) as u8]));
//! let stego = ImageStego::from_image(image::DynamicImage::ImageRgb8(cover));
//!
//! let config = EmbeddingConfig::new(1).unwrap();
//! let hidden = stego.hide(b"hello world", &config).unwrap();
//!
//! let extracted = hidden.extract(&config).unwrap();
//! assert_eq!(extracted.data(), Some(&b"hello world"[..]));
//! ```
//!
//! ## Modules
//!
//! - [`crypto`]: compression and the password envelope
//! - [`stego`]: carriers, framing, bit packing and the LSB codec
//! - [`encoder`] / [`decoder`]: the embed and extract pipelines
//! - [`analysis`]: chi-square and RS detectors

pub mod analysis;
pub mod config;
pub mod crypto;
pub mod decoder;
pub mod encoder;
pub mod stego;

// Re-export commonly used types at the crate root
pub use analysis::{analyze, analyze_image, AnalysisResult, Verdict};
pub use config::{BitDepth, ConfigError, EmbeddingConfig};
pub use crypto::CryptoError;
pub use decoder::{extract, extract_elements, ExtractError, Extraction};
pub use encoder::{build_bitstream, embed, EmbedError};
pub use stego::{
    AudioCarrier, AudioStego, AudioStegoError, CapacityPlan, Carrier, CarrierError, Embedded,
    ImageCarrier, ImageStego, ImageStegoError,
};
