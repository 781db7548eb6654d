//! Payload compression for stegdetect.
//!
//! Secrets are zlib-compressed (DEFLATE with the zlib wrapper) before they are
//! encrypted and framed. Decompression on extraction is lenient: bytes that do
//! not parse as a zlib stream are handed back unchanged.

use flate2::read::{ZlibDecoder, ZlibEncoder};
use flate2::Compression;
use std::io::Read;
use thiserror::Error;
use tracing::warn;

/// Compression errors.
#[derive(Error, Debug)]
pub enum CompressionError {
    #[error("Compression failed: {0}")]
    CompressionFailed(String),

    #[error("Decompression failed: {0}")]
    DecompressionFailed(String),
}

/// Output of [`decompress_or_raw`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decompressed {
    /// Decompressed bytes, or the input unchanged when it was not a zlib stream.
    pub data: Vec<u8>,
    /// True when decompression failed and `data` is the raw input.
    pub raw_fallback: bool,
}

/// Compresses data with zlib at the default level.
pub fn compress(data: &[u8]) -> Result<Vec<u8>, CompressionError> {
    let mut encoder = ZlibEncoder::new(data, Compression::default());
    let mut compressed = Vec::new();

    encoder
        .read_to_end(&mut compressed)
        .map_err(|e| CompressionError::CompressionFailed(e.to_string()))?;

    Ok(compressed)
}

/// Decompresses a zlib stream produced by [`compress`].
pub fn decompress(data: &[u8]) -> Result<Vec<u8>, CompressionError> {
    if data.is_empty() {
        return Err(CompressionError::DecompressionFailed(
            "Empty data".to_string(),
        ));
    }

    let mut decoder = ZlibDecoder::new(data);
    let mut decompressed = Vec::new();

    decoder
        .read_to_end(&mut decompressed)
        .map_err(|e| CompressionError::DecompressionFailed(e.to_string()))?;

    Ok(decompressed)
}

/// Decompresses `data`, passing it through unchanged if it is not valid zlib.
///
/// Corrupted payloads therefore surface as "uncompressed" bytes rather than
/// as an error. Callers that care can inspect [`Decompressed::raw_fallback`].
pub fn decompress_or_raw(data: &[u8]) -> Decompressed {
    match decompress(data) {
        Ok(data) => Decompressed {
            data,
            raw_fallback: false,
        },
        Err(e) => {
            warn!("payload is not a zlib stream, returning raw bytes: {}", e);
            Decompressed {
                data: data.to_vec(),
                raw_fallback: true,
            }
        }
    }
}

/// Compressed size over original size; 1.0 for an empty original.
pub fn compression_ratio(original: &[u8], compressed: &[u8]) -> f64 {
    if original.is_empty() {
        return 1.0;
    }
    compressed.len() as f64 / original.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let secret: Vec<u8> = b"meet me at the old mill; "
            .iter()
            .cycle()
            .take(500)
            .copied()
            .collect();

        let packed = compress(&secret).unwrap();
        assert_eq!(decompress(&packed).unwrap(), secret);
    }

    #[test]
    fn test_zlib_header() {
        // Default-level zlib streams start with 0x78 0x9C
        let compressed = compress(b"hello world").unwrap();
        assert_eq!(&compressed[..2], &[0x78, 0x9C]);
    }

    #[test]
    fn test_repetitive_input_shrinks() {
        let secret = vec![b'A'; 640];
        let packed = compress(&secret).unwrap();

        assert!(packed.len() < secret.len());
        assert!(compression_ratio(&secret, &packed) < 1.0);
        assert_eq!(compression_ratio(&[], &packed), 1.0);
    }

    #[test]
    fn test_empty_input_still_framed_by_zlib() {
        let packed = compress(b"").unwrap();
        assert!(!packed.is_empty());
        assert!(decompress(&packed).unwrap().is_empty());
    }

    #[test]
    fn test_decompress_garbage_fails() {
        assert!(decompress(&[0xde, 0xad, 0xbe, 0xef]).is_err());
        assert!(decompress(&[]).is_err());
    }

    #[test]
    fn test_decompress_or_raw_passes_through_garbage() {
        // Corrupted payloads are indistinguishable from plain bytes here.
        let garbage = vec![0x01, 0x02, 0x03, 0x04, 0x05];
        let out = decompress_or_raw(&garbage);

        assert!(out.raw_fallback);
        assert_eq!(out.data, garbage);
    }

    #[test]
    fn test_decompress_or_raw_valid_stream() {
        let compressed = compress(b"payload").unwrap();
        let out = decompress_or_raw(&compressed);

        assert!(!out.raw_fallback);
        assert_eq!(out.data, b"payload");
    }
}
