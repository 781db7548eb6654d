//! Carrier model: a flat sequence of fixed-width elements plus its layout.
//!
//! Images are flattened row-major into RGB channel bytes (`u8`), audio into
//! interleaved 16-bit PCM samples (`i16`). The codec only ever touches the low
//! bits of these elements, and tiles the carrier along its outer axis (rows
//! for images, frames for audio) when a payload does not fit.

use hound::{SampleFormat, WavSpec};
use image::RgbImage;
use thiserror::Error;

/// Channels per image pixel after RGB normalization.
pub const IMAGE_CHANNELS: usize = 3;

/// Errors in the carrier model.
#[derive(Error, Debug)]
pub enum CarrierError {
    #[error("Carrier has no elements")]
    Empty,

    #[error("Unsupported carrier format: {0}")]
    UnsupportedFormat(String),

    #[error("Carrier data has {actual} elements, layout expects {expected}")]
    LayoutMismatch { expected: usize, actual: usize },

    #[error("Tiled carrier would exceed the maximum dimensions")]
    TooLarge,
}

/// A fixed-width integer element whose low bits can carry a symbol.
pub trait Sample: Copy {
    /// Width of the element in bits.
    const BITS: u32;

    /// Reads the bits selected by `mask`.
    fn low_bits(self, mask: u16) -> u8;

    /// Replaces the bits selected by `mask` with `symbol`, keeping all others.
    fn with_low_bits(self, mask: u16, symbol: u8) -> Self;
}

impl Sample for u8 {
    const BITS: u32 = 8;

    fn low_bits(self, mask: u16) -> u8 {
        (self as u16 & mask) as u8
    }

    fn with_low_bits(self, mask: u16, symbol: u8) -> Self {
        (self & !(mask as u8)) | symbol
    }
}

impl Sample for i16 {
    const BITS: u32 = 16;

    fn low_bits(self, mask: u16) -> u8 {
        (self as u16 & mask) as u8
    }

    fn with_low_bits(self, mask: u16, symbol: u8) -> Self {
        ((self as u16 & !mask) | symbol as u16) as i16
    }
}

/// Capability shared by every carrier kind.
pub trait Carrier: Clone {
    type Element: Sample;

    /// Flattened elements in embedding order.
    fn elements(&self) -> &[Self::Element];

    fn elements_mut(&mut self) -> &mut [Self::Element];

    /// Repeats the carrier `repeats` times along its outer axis, multiplying
    /// the element count by `repeats`.
    fn tile(&mut self, repeats: usize) -> Result<(), CarrierError>;

    fn len(&self) -> usize {
        self.elements().len()
    }

    fn is_empty(&self) -> bool {
        self.elements().is_empty()
    }

    fn element_bits(&self) -> u32 {
        Self::Element::BITS
    }
}

/// RGB8 pixel data, flattened as height × width × 3.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCarrier {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl ImageCarrier {
    /// Wraps raw RGB bytes laid out row-major.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self, CarrierError> {
        let expected = width as usize * height as usize * IMAGE_CHANNELS;
        if data.len() != expected {
            return Err(CarrierError::LayoutMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn from_rgb(image: RgbImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            data: image.into_raw(),
        }
    }

    /// Rebuilds the image buffer from the flat elements.
    pub fn to_rgb(&self) -> Result<RgbImage, CarrierError> {
        let expected = self.width as usize * self.height as usize * IMAGE_CHANNELS;
        RgbImage::from_raw(self.width, self.height, self.data.clone()).ok_or(
            CarrierError::LayoutMismatch {
                expected,
                actual: self.data.len(),
            },
        )
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Native layout as (height, width, channels).
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.height as usize, self.width as usize, IMAGE_CHANNELS)
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }
}

impl Carrier for ImageCarrier {
    type Element = u8;

    fn elements(&self) -> &[u8] {
        &self.data
    }

    fn elements_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    fn tile(&mut self, repeats: usize) -> Result<(), CarrierError> {
        let repeats_u32 = u32::try_from(repeats).map_err(|_| CarrierError::TooLarge)?;
        let height = self
            .height
            .checked_mul(repeats_u32)
            .ok_or(CarrierError::TooLarge)?;
        self.data = self.data.repeat(repeats);
        self.height = height;
        Ok(())
    }
}

/// Interleaved 16-bit PCM samples with their WAV layout.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioCarrier {
    spec: WavSpec,
    samples: Vec<i16>,
}

impl AudioCarrier {
    /// Wraps interleaved samples. Only 16-bit integer PCM is accepted.
    pub fn new(spec: WavSpec, samples: Vec<i16>) -> Result<Self, CarrierError> {
        if spec.sample_format != SampleFormat::Int || spec.bits_per_sample != 16 {
            return Err(CarrierError::UnsupportedFormat(format!(
                "only 16-bit PCM is supported, got {} bits {:?}",
                spec.bits_per_sample, spec.sample_format
            )));
        }
        if spec.channels == 0 {
            return Err(CarrierError::UnsupportedFormat(
                "audio has no channels".to_string(),
            ));
        }
        Ok(Self { spec, samples })
    }

    pub fn spec(&self) -> &WavSpec {
        &self.spec
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    /// Number of frames (samples per channel).
    pub fn frames(&self) -> usize {
        self.samples.len() / self.spec.channels as usize
    }

    /// Native layout as (frames, channels).
    pub fn shape(&self) -> (usize, usize) {
        (self.frames(), self.spec.channels as usize)
    }

    pub fn into_samples(self) -> Vec<i16> {
        self.samples
    }
}

impl Carrier for AudioCarrier {
    type Element = i16;

    fn elements(&self) -> &[i16] {
        &self.samples
    }

    fn elements_mut(&mut self) -> &mut [i16] {
        &mut self.samples
    }

    fn tile(&mut self, repeats: usize) -> Result<(), CarrierError> {
        self.samples
            .len()
            .checked_mul(repeats)
            .ok_or(CarrierError::TooLarge)?;
        self.samples = self.samples.repeat(repeats);
        Ok(())
    }
}
