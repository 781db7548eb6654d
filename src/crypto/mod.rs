//! Cryptographic operations for stegdetect.
//!
//! This module provides:
//! - Payload compression (zlib/DEFLATE) with a lenient decompression fallback
//! - Password-based authenticated encryption (PBKDF2-HMAC-SHA256 + AES-256-GCM)

pub mod compression;
pub mod symmetric;

pub use compression::{compress, decompress, decompress_or_raw, CompressionError, Decompressed};
pub use symmetric::{decrypt, encrypt, CryptoError};
