//! Steganography module for hiding data in carrier low bits.
//!
//! Supports:
//! - Image LSB steganography (PNG, BMP, JPEG input; PNG/BMP output)
//! - Audio LSB steganography (16-bit PCM WAV)
//!
//! Both carrier kinds share one codec through the [`Carrier`] trait.

pub mod audio;
pub mod bits;
pub mod capacity;
pub mod carrier;
pub mod codec;
pub mod frame;
pub mod image;

pub use audio::{AudioStego, AudioStegoError};
pub use capacity::{max_payload_bytes, CapacityPlan};
pub use carrier::{AudioCarrier, Carrier, CarrierError, ImageCarrier, Sample};
pub use codec::Embedded;
pub use image::{ImageStego, ImageStegoError};
