//! LSB steganography for images.
//!
//! Images are normalized to RGB8 (alpha dropped) and flattened row by row
//! into channel bytes. Output is always written losslessly (PNG or BMP);
//! re-encoding to JPEG would destroy the low bits.

use image::{DynamicImage, ImageFormat, RgbImage};
use rand::rngs::OsRng;
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;

use crate::config::{BitDepth, EmbeddingConfig};
use crate::decoder::{self, ExtractError, Extraction};
use crate::encoder::{self, EmbedError};
use crate::stego::capacity::{max_payload_bytes, CapacityPlan};
use crate::stego::carrier::{Carrier, CarrierError, ImageCarrier};

/// Errors that can occur during image steganography.
#[derive(Error, Debug)]
pub enum ImageStegoError {
    #[error("Image load error: {0}")]
    ImageLoadError(String),

    #[error("Image save error: {0}")]
    ImageSaveError(String),

    #[error("Unsupported output format '{0}': use .png or .bmp")]
    LossyOutputFormat(String),

    #[error("Carrier error: {0}")]
    CarrierError(#[from] CarrierError),

    #[error("Embed error: {0}")]
    EmbedError(#[from] EmbedError),

    #[error("Extract error: {0}")]
    ExtractError(#[from] ExtractError),
}

/// Image steganography handler.
#[derive(Debug, Clone)]
pub struct ImageStego {
    carrier: ImageCarrier,
}

impl ImageStego {
    /// Creates a new ImageStego from a file path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ImageStegoError> {
        let image =
            image::open(path).map_err(|e| ImageStegoError::ImageLoadError(e.to_string()))?;
        Ok(Self::from_image(image))
    }

    /// Creates a new ImageStego from encoded image bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ImageStegoError> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| ImageStegoError::ImageLoadError(e.to_string()))?;
        Ok(Self::from_image(image))
    }

    /// Creates a new ImageStego from a DynamicImage, converting it to RGB8.
    pub fn from_image(image: DynamicImage) -> Self {
        Self {
            carrier: ImageCarrier::from_rgb(image.to_rgb8()),
        }
    }

    pub fn from_carrier(carrier: ImageCarrier) -> Self {
        Self { carrier }
    }

    /// Payload bytes that fit without tiling at the given depth.
    pub fn capacity(&self, bits: BitDepth) -> usize {
        max_payload_bytes(self.carrier.len(), bits)
    }

    /// How `payload_len` bytes would be laid out at the given depth.
    pub fn plan(&self, payload_len: usize, bits: BitDepth) -> CapacityPlan {
        CapacityPlan::new(self.carrier.len(), payload_len, bits)
    }

    /// Hides data in the image.
    ///
    /// # Returns
    /// A new ImageStego holding the stego image, which is taller than the
    /// original when the image had to be tiled.
    pub fn hide(&self, data: &[u8], config: &EmbeddingConfig) -> Result<Self, ImageStegoError> {
        let embedded = encoder::embed(&self.carrier, data, config, &mut OsRng)?;
        Ok(Self {
            carrier: embedded.carrier,
        })
    }

    /// Extracts hidden data from the image.
    pub fn extract(&self, config: &EmbeddingConfig) -> Result<Extraction, ImageStegoError> {
        Ok(decoder::extract(&self.carrier, config)?)
    }

    /// Saves the image losslessly. The format follows the extension
    /// (`.png` or `.bmp`); lossy formats are refused.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ImageStegoError> {
        let path = path.as_ref();
        let format = lossless_format_for(path)?;
        self.carrier
            .to_rgb()?
            .save_with_format(path, format)
            .map_err(|e| ImageStegoError::ImageSaveError(e.to_string()))
    }

    /// Returns the image as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>, ImageStegoError> {
        self.encode(ImageFormat::Png)
    }

    /// Returns the image as uncompressed BMP bytes.
    pub fn to_bmp_bytes(&self) -> Result<Vec<u8>, ImageStegoError> {
        self.encode(ImageFormat::Bmp)
    }

    fn encode(&self, format: ImageFormat) -> Result<Vec<u8>, ImageStegoError> {
        let mut bytes = Vec::new();
        self.carrier
            .to_rgb()?
            .write_to(&mut Cursor::new(&mut bytes), format)
            .map_err(|e| ImageStegoError::ImageSaveError(e.to_string()))?;
        Ok(bytes)
    }

    /// Returns the image as an RGB buffer.
    pub fn to_rgb(&self) -> Result<RgbImage, ImageStegoError> {
        Ok(self.carrier.to_rgb()?)
    }

    /// Returns a reference to the underlying carrier.
    pub fn carrier(&self) -> &ImageCarrier {
        &self.carrier
    }

    /// Consumes self and returns the underlying carrier.
    pub fn into_carrier(self) -> ImageCarrier {
        self.carrier
    }
}

/// Picks a lossless encoder from the file extension.
fn lossless_format_for(path: &Path) -> Result<ImageFormat, ImageStegoError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "png" => Ok(ImageFormat::Png),
        "bmp" => Ok(ImageFormat::Bmp),
        _ => Err(ImageStegoError::LossyOutputFormat(ext)),
    }
}
