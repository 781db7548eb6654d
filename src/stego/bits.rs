//! Conversion between byte streams and n-bit embedding symbols.
//!
//! A symbol is a group of `n` consecutive bits of the stream, most significant
//! bit first, read as an integer in `0..2^n`. The last group is zero-padded.
//!
//! Depths that divide a byte (1, 2, 4, 8) take a shift-per-byte fast path;
//! every other depth walks the stream bit by bit. Both paths produce identical
//! output wherever both apply.

use crate::config::BitDepth;

/// Number of symbols needed to carry `bit_len` bits.
pub fn symbol_count(bit_len: usize, bits: BitDepth) -> usize {
    bit_len.div_ceil(bits.width())
}

/// Splits `bytes` into symbols, choosing the fast path when possible.
pub fn to_symbols(bytes: &[u8], bits: BitDepth) -> Vec<u8> {
    if bits.divides_byte() {
        to_symbols_fast(bytes, bits)
    } else {
        to_symbols_generic(bytes, bits)
    }
}

/// Bit-by-bit symbol split, valid for every depth.
pub fn to_symbols_generic(bytes: &[u8], bits: BitDepth) -> Vec<u8> {
    let n = bits.width();
    let total_bits = bytes.len() * 8;
    let count = symbol_count(total_bits, bits);

    let mut symbols = Vec::with_capacity(count);
    for s in 0..count {
        let mut symbol = 0u8;
        for k in 0..n {
            let b = s * n + k;
            let bit = if b < total_bits {
                (bytes[b / 8] >> (7 - b % 8)) & 1
            } else {
                0
            };
            symbol = (symbol << 1) | bit;
        }
        symbols.push(symbol);
    }
    symbols
}

/// Shift-per-byte symbol split for depths 1, 2, 4 and 8.
pub fn to_symbols_fast(bytes: &[u8], bits: BitDepth) -> Vec<u8> {
    debug_assert!(bits.divides_byte());

    let n = bits.width();
    let per_byte = 8 / n;
    let mask = bits.mask() as u8;

    let mut symbols = Vec::with_capacity(bytes.len() * per_byte);
    for &byte in bytes {
        for k in (0..per_byte).rev() {
            symbols.push((byte >> (k * n)) & mask);
        }
    }
    symbols
}

/// Reassembles `byte_len` bytes from symbols, skipping the first `skip_bits`
/// bits of the stream. Chooses the fast path when possible.
///
/// `symbols` must cover at least `skip_bits + byte_len * 8` bits.
pub fn from_symbols(symbols: &[u8], bits: BitDepth, skip_bits: usize, byte_len: usize) -> Vec<u8> {
    if bits.divides_byte() && skip_bits % bits.width() == 0 {
        from_symbols_fast(symbols, bits, skip_bits, byte_len)
    } else {
        from_symbols_generic(symbols, bits, skip_bits, byte_len)
    }
}

/// Bit-level reassembly, valid for every depth and any skip.
pub fn from_symbols_generic(
    symbols: &[u8],
    bits: BitDepth,
    skip_bits: usize,
    byte_len: usize,
) -> Vec<u8> {
    let n = bits.width();
    debug_assert!(symbols.len() * n >= skip_bits + byte_len * 8);

    let mut out = vec![0u8; byte_len];
    for i in 0..byte_len * 8 {
        let b = skip_bits + i;
        let bit = (symbols[b / n] >> (n - 1 - b % n)) & 1;
        out[i / 8] |= bit << (7 - i % 8);
    }
    out
}

/// Symbol-per-byte reassembly for depths 1, 2, 4 and 8 when the skip lands
/// on a symbol boundary.
pub fn from_symbols_fast(
    symbols: &[u8],
    bits: BitDepth,
    skip_bits: usize,
    byte_len: usize,
) -> Vec<u8> {
    let n = bits.width();
    debug_assert!(bits.divides_byte() && skip_bits % n == 0);

    let per_byte = 8 / n;
    let mask = bits.mask();
    let start = skip_bits / n;

    symbols[start..start + byte_len * per_byte]
        .chunks_exact(per_byte)
        .map(|group| {
            group
                .iter()
                .fold(0u16, |acc, &s| (acc << n) | (s as u16 & mask)) as u8
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn depth(bits: u8) -> BitDepth {
        BitDepth::new(bits).unwrap()
    }

    fn sample_bytes() -> Vec<u8> {
        (0..97u32).map(|i| (i * 37 + 11) as u8).collect()
    }

    #[test]
    fn test_symbols_msb_first() {
        assert_eq!(to_symbols_generic(&[0b1011_0010], depth(1)), vec![1, 0, 1, 1, 0, 0, 1, 0]);
        assert_eq!(to_symbols_generic(&[0b1011_0010], depth(2)), vec![0b10, 0b11, 0b00, 0b10]);
        assert_eq!(to_symbols_generic(&[0b1011_0010], depth(4)), vec![0b1011, 0b0010]);
    }

    #[test]
    fn test_generic_pads_last_group() {
        // 8 bits at depth 3: 101|100|10(0)
        assert_eq!(to_symbols_generic(&[0b1011_0010], depth(3)), vec![0b101, 0b100, 0b100]);
    }

    #[test]
    fn test_fast_matches_generic_split() {
        let data = sample_bytes();
        for bits in [1, 2, 4, 8] {
            assert_eq!(
                to_symbols_fast(&data, depth(bits)),
                to_symbols_generic(&data, depth(bits)),
                "depth {}",
                bits
            );
        }
    }

    #[test]
    fn test_fast_matches_generic_join() {
        let data = sample_bytes();
        for bits in [1, 2, 4, 8] {
            let symbols = to_symbols_generic(&data, depth(bits));
            for skip in [0, 64] {
                let len = data.len() - skip / 8;
                assert_eq!(
                    from_symbols_fast(&symbols, depth(bits), skip, len),
                    from_symbols_generic(&symbols, depth(bits), skip, len),
                    "depth {} skip {}",
                    bits,
                    skip
                );
            }
        }
    }

    #[test]
    fn test_join_skips_bits_not_symbols() {
        // At depth 3 the 64-bit header ends inside symbol 21, so skipping
        // 64 / 3 = 21 whole symbols would misalign the payload by one bit.
        let data = sample_bytes();
        for bits in 1..=8 {
            let symbols = to_symbols(&data, depth(bits));
            let payload = from_symbols(&symbols, depth(bits), 64, data.len() - 8);
            assert_eq!(payload, &data[8..], "depth {}", bits);
        }
    }

    #[test]
    fn test_symbol_count() {
        assert_eq!(symbol_count(64, depth(1)), 64);
        assert_eq!(symbol_count(64, depth(3)), 22);
        assert_eq!(symbol_count(64, depth(7)), 10);
        assert_eq!(symbol_count(0, depth(5)), 0);
    }
}
