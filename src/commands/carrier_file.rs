//! Carrier files on disk: kind detection, size limits, load and save.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use stegdetect::{
    AudioStego, BitDepth, CapacityPlan, Carrier, EmbeddingConfig, Extraction, ImageStego,
};

/// Carrier kind, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarrierKind {
    Image,
    Audio,
}

impl CarrierKind {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "png" | "bmp" | "jpg" | "jpeg" => Ok(Self::Image),
            "wav" => Ok(Self::Audio),
            _ => bail!(
                "Unsupported carrier type '{}': use .png, .bmp, .jpg, .jpeg or .wav",
                path.display()
            ),
        }
    }
}

/// Fails if the file at `path` is larger than `limit` bytes.
pub fn check_file_size(path: &Path, limit: u64) -> Result<()> {
    let size = fs::metadata(path)
        .with_context(|| format!("Failed to read {}", path.display()))?
        .len();
    if size > limit {
        bail!(
            "{} is too large: {} bytes (max {} MB)",
            path.display(),
            size,
            limit / (1024 * 1024)
        );
    }
    Ok(())
}

/// A loaded image or audio carrier.
pub enum CarrierFile {
    Image(ImageStego),
    Audio(AudioStego),
}

impl CarrierFile {
    pub fn open(path: &Path) -> Result<Self> {
        let carrier = match CarrierKind::from_path(path)? {
            CarrierKind::Image => Self::Image(
                ImageStego::from_file(path)
                    .with_context(|| format!("Failed to load image {}", path.display()))?,
            ),
            CarrierKind::Audio => Self::Audio(
                AudioStego::from_file(path)
                    .with_context(|| format!("Failed to load audio {}", path.display()))?,
            ),
        };
        Ok(carrier)
    }

    pub fn kind(&self) -> CarrierKind {
        match self {
            Self::Image(_) => CarrierKind::Image,
            Self::Audio(_) => CarrierKind::Audio,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Image(stego) => {
                let carrier = stego.carrier();
                format!("image {}x{} RGB", carrier.width(), carrier.height())
            }
            Self::Audio(stego) => {
                let spec = stego.spec();
                format!(
                    "audio {} Hz, {} channel(s), {:.2}s",
                    spec.sample_rate,
                    spec.channels,
                    stego.duration_secs()
                )
            }
        }
    }

    pub fn capacity(&self, bits: BitDepth) -> usize {
        match self {
            Self::Image(stego) => stego.capacity(bits),
            Self::Audio(stego) => stego.capacity(bits),
        }
    }

    /// Number of carrier elements (channel values or samples).
    pub fn element_count(&self) -> usize {
        match self {
            Self::Image(stego) => stego.carrier().len(),
            Self::Audio(stego) => stego.carrier().len(),
        }
    }

    pub fn plan(&self, payload_len: usize, bits: BitDepth) -> CapacityPlan {
        match self {
            Self::Image(stego) => stego.plan(payload_len, bits),
            Self::Audio(stego) => stego.plan(payload_len, bits),
        }
    }

    pub fn hide(&self, data: &[u8], config: &EmbeddingConfig) -> Result<Self> {
        let hidden = match self {
            Self::Image(stego) => Self::Image(stego.hide(data, config)?),
            Self::Audio(stego) => Self::Audio(stego.hide(data, config)?),
        };
        Ok(hidden)
    }

    pub fn extract(&self, config: &EmbeddingConfig) -> Result<Extraction> {
        let extraction = match self {
            Self::Image(stego) => stego.extract(config)?,
            Self::Audio(stego) => stego.extract(config)?,
        };
        Ok(extraction)
    }

    /// Saves the carrier. Images go to PNG or BMP, audio to WAV.
    pub fn save(&self, path: &Path) -> Result<()> {
        match self {
            Self::Image(stego) => stego.save(path)?,
            Self::Audio(stego) => {
                if CarrierKind::from_path(path).ok() != Some(CarrierKind::Audio) {
                    bail!("Audio output must be a .wav file, got {}", path.display());
                }
                stego.save(path)?
            }
        }
        Ok(())
    }
}
