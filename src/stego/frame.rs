//! Payload frame construction and parsing.
//!
//! Every embedded payload is preceded by a fixed 8-byte header:
//!
//! ```text
//! [4 bytes] signature "STG1"
//! [4 bytes] payload length (big-endian u32)
//! [N bytes] payload (compressed, optionally encrypted)
//! ```
//!
//! A header that does not check out is not an error: it means the carrier
//! holds no payload, and parsing returns `None`.

use tracing::debug;

/// Frame signature.
pub const SIGNATURE: [u8; 4] = *b"STG1";

/// Header size in bytes (signature + length).
pub const HEADER_LEN: usize = 8;

/// Header size in bits.
pub const HEADER_BITS: usize = HEADER_LEN * 8;

/// Wraps a payload in a frame.
///
/// The length field is a `u32`; the encoder rejects longer payloads before
/// framing.
pub fn frame(payload: &[u8]) -> Vec<u8> {
    debug_assert!(payload.len() <= u32::MAX as usize, "payload too large to frame");

    let mut framed = Vec::with_capacity(HEADER_LEN + payload.len());
    framed.extend_from_slice(&SIGNATURE);
    framed.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    framed.extend_from_slice(payload);
    framed
}

/// Parses a frame header and returns the declared payload length.
///
/// Returns `None` when the signature does not match, the length is zero, or
/// the length exceeds `max_payload_bytes` (the most the carrier could hold).
pub fn unframe(header: &[u8; HEADER_LEN], max_payload_bytes: usize) -> Option<usize> {
    if header[..4] != SIGNATURE {
        debug!("frame signature mismatch");
        return None;
    }

    let len = u32::from_be_bytes([header[4], header[5], header[6], header[7]]) as usize;
    if len == 0 || len > max_payload_bytes {
        debug!(len, max_payload_bytes, "implausible frame length");
        return None;
    }

    Some(len)
}
