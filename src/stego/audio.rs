//! LSB steganography for audio files.
//!
//! Hides data in the low bits of 16-bit PCM samples (WAV). Samples are
//! flattened in interleaved order; the sample rate and channel layout of the
//! input are kept on output.

use hound::{WavReader, WavSpec, WavWriter};
use rand::rngs::OsRng;
use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;
use thiserror::Error;

use crate::config::{BitDepth, EmbeddingConfig};
use crate::decoder::{self, ExtractError, Extraction};
use crate::encoder::{self, EmbedError};
use crate::stego::capacity::{max_payload_bytes, CapacityPlan};
use crate::stego::carrier::{AudioCarrier, Carrier, CarrierError};

/// Errors that can occur during audio steganography.
#[derive(Error, Debug)]
pub enum AudioStegoError {
    #[error("Audio load error: {0}")]
    AudioLoadError(String),

    #[error("Audio save error: {0}")]
    AudioSaveError(String),

    #[error("Carrier error: {0}")]
    CarrierError(#[from] CarrierError),

    #[error("Embed error: {0}")]
    EmbedError(#[from] EmbedError),

    #[error("Extract error: {0}")]
    ExtractError(#[from] ExtractError),
}

/// Audio steganography handler.
#[derive(Debug, Clone)]
pub struct AudioStego {
    carrier: AudioCarrier,
}

impl AudioStego {
    /// Creates a new AudioStego from a file path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AudioStegoError> {
        let reader =
            WavReader::open(path).map_err(|e| AudioStegoError::AudioLoadError(e.to_string()))?;

        Self::from_reader(reader)
    }

    /// Creates a new AudioStego from WAV bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AudioStegoError> {
        let reader = WavReader::new(Cursor::new(bytes))
            .map_err(|e| AudioStegoError::AudioLoadError(e.to_string()))?;

        Self::from_reader(reader)
    }

    /// Creates AudioStego from a WavReader.
    fn from_reader<R: Read + Seek>(reader: WavReader<R>) -> Result<Self, AudioStegoError> {
        let spec = reader.spec();

        // Reject other formats before decoding any samples
        AudioCarrier::new(spec, Vec::new())?;

        let samples: Vec<i16> = reader
            .into_samples::<i16>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| AudioStegoError::AudioLoadError(e.to_string()))?;

        Ok(Self {
            carrier: AudioCarrier::new(spec, samples)?,
        })
    }

    pub fn from_carrier(carrier: AudioCarrier) -> Self {
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

    /// Returns the duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.carrier.frames() as f64 / self.carrier.spec().sample_rate as f64
    }

    /// Hides data in the audio.
    ///
    /// # Returns
    /// A new AudioStego with the data hidden inside, longer than the original
    /// when the audio had to be tiled.
    pub fn hide(&self, data: &[u8], config: &EmbeddingConfig) -> Result<Self, AudioStegoError> {
        let embedded = encoder::embed(&self.carrier, data, config, &mut OsRng)?;
        Ok(Self {
            carrier: embedded.carrier,
        })
    }

    /// Extracts hidden data from the audio.
    pub fn extract(&self, config: &EmbeddingConfig) -> Result<Extraction, AudioStegoError> {
        Ok(decoder::extract(&self.carrier, config)?)
    }

    /// Saves the audio to a WAV file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), AudioStegoError> {
        let writer = WavWriter::create(path, *self.carrier.spec())
            .map_err(|e| AudioStegoError::AudioSaveError(e.to_string()))?;
        self.write_samples(writer)
    }

    /// Returns the audio as WAV bytes.
    pub fn to_wav_bytes(&self) -> Result<Vec<u8>, AudioStegoError> {
        let mut bytes = Vec::new();
        let writer = WavWriter::new(Cursor::new(&mut bytes), *self.carrier.spec())
            .map_err(|e| AudioStegoError::AudioSaveError(e.to_string()))?;
        self.write_samples(writer)?;
        Ok(bytes)
    }

    fn write_samples<W: Write + Seek>(
        &self,
        mut writer: WavWriter<W>,
    ) -> Result<(), AudioStegoError> {
        for &sample in self.carrier.samples() {
            writer
                .write_sample(sample)
                .map_err(|e| AudioStegoError::AudioSaveError(e.to_string()))?;
        }

        writer
            .finalize()
            .map_err(|e| AudioStegoError::AudioSaveError(e.to_string()))
    }

    /// Returns the audio specification.
    pub fn spec(&self) -> &WavSpec {
        self.carrier.spec()
    }

    /// Returns the number of samples across all channels.
    pub fn sample_count(&self) -> usize {
        self.carrier.len()
    }

    pub fn carrier(&self) -> &AudioCarrier {
        &self.carrier
    }
}

/// A 16-bit PCM sine tone for tests.
#[cfg(test)]
fn create_test_audio(sample_count: usize, channels: u16) -> AudioStego {
    use hound::SampleFormat;

    let sample_rate = 44_100;
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let step = std::f64::consts::TAU * 330.0 / sample_rate as f64;
    let samples = (0..sample_count)
        .map(|i| ((i as f64 * step).sin() * 16_000.0) as i16)
        .collect();

    AudioStego::from_carrier(AudioCarrier::new(spec, samples).unwrap())
}
