//! Per-request embedding configuration and collaborator limits.

use std::fmt;

use thiserror::Error;

/// Default number of low bits used per carrier element.
pub const DEFAULT_BITS: u8 = 2;

/// Largest carrier or secret file accepted when hiding (100 MiB).
pub const MAX_EMBED_INPUT_BYTES: u64 = 100 * 1024 * 1024;

/// Largest file accepted for extraction or analysis (300 MiB).
pub const MAX_ANALYSIS_INPUT_BYTES: u64 = 300 * 1024 * 1024;

/// Configuration errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid bit depth {0}: must be between 1 and 8")]
    InvalidBitDepth(u8),
}

/// Number of low bits replaced in each carrier element (1..=8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitDepth(u8);

impl BitDepth {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 8;

    /// Validates and wraps a bit depth.
    pub fn new(bits: u8) -> Result<Self, ConfigError> {
        if (Self::MIN..=Self::MAX).contains(&bits) {
            Ok(Self(bits))
        } else {
            Err(ConfigError::InvalidBitDepth(bits))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Bits as `usize`, for index arithmetic.
    pub fn width(self) -> usize {
        self.0 as usize
    }

    /// Mask covering the low `n` bits.
    pub fn mask(self) -> u16 {
        (1u16 << self.0) - 1
    }

    /// True for depths that divide a byte evenly (1, 2, 4, 8).
    pub fn divides_byte(self) -> bool {
        8 % self.0 == 0
    }
}

impl Default for BitDepth {
    fn default() -> Self {
        Self(DEFAULT_BITS)
    }
}

impl TryFrom<u8> for BitDepth {
    type Error = ConfigError;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        Self::new(bits)
    }
}

impl fmt::Display for BitDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Configuration for a single embed or extract request.
#[derive(Clone, Default)]
pub struct EmbeddingConfig {
    /// Low bits used per carrier element.
    pub bits: BitDepth,
    /// Optional password. `None` disables encryption.
    pub password: Option<String>,
}

impl EmbeddingConfig {
    /// Creates a config without a password.
    pub fn new(bits: u8) -> Result<Self, ConfigError> {
        Ok(Self {
            bits: BitDepth::new(bits)?,
            password: None,
        })
    }

    /// Sets the password. Empty strings leave encryption disabled.
    pub fn with_password(mut self, password: Option<impl Into<String>>) -> Self {
        self.password = password.map(Into::into).filter(|p| !p.is_empty());
        self
    }

    /// The password, if encryption is enabled.
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }
}

// Keep passwords out of debug output and logs.
impl fmt::Debug for EmbeddingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbeddingConfig")
            .field("bits", &self.bits)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
