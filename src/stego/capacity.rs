//! Capacity planning.
//!
//! A carrier of N elements at depth n holds N·n bits. When a framed payload
//! needs more elements than that, the carrier is tiled to the smallest
//! multiple of N that fits instead of failing.

use crate::config::BitDepth;
use crate::stego::bits::symbol_count;
use crate::stego::frame::HEADER_LEN;

/// Most bytes addressable in `element_count` elements, header included.
pub fn max_addressable_bytes(element_count: usize, bits: BitDepth) -> usize {
    element_count * bits.width() / 8
}

/// Most payload bytes that fit without tiling (header excluded).
pub fn max_payload_bytes(element_count: usize, bits: BitDepth) -> usize {
    max_addressable_bytes(element_count, bits).saturating_sub(HEADER_LEN)
}

/// How a payload of a given size maps onto a carrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityPlan {
    /// Elements in the carrier as supplied.
    pub available_elements: usize,
    /// Elements the framed payload occupies.
    pub required_elements: usize,
    /// Tiling factor; 1 when the payload fits.
    pub repeats: usize,
    /// Elements in the output carrier.
    pub output_elements: usize,
}

impl CapacityPlan {
    /// Plans embedding `payload_len` bytes (before framing) at depth `bits`.
    pub fn new(available_elements: usize, payload_len: usize, bits: BitDepth) -> Self {
        Self::for_bitstream(available_elements, (HEADER_LEN + payload_len) * 8, bits)
    }

    /// Plans embedding an already framed bitstream of `bit_len` bits.
    pub fn for_bitstream(available_elements: usize, bit_len: usize, bits: BitDepth) -> Self {
        let required_elements = symbol_count(bit_len, bits);
        let repeats = if available_elements == 0 || required_elements <= available_elements {
            1
        } else {
            required_elements.div_ceil(available_elements)
        };

        Self {
            available_elements,
            required_elements,
            repeats,
            output_elements: available_elements * repeats,
        }
    }

    pub fn needs_tiling(&self) -> bool {
        self.repeats > 1
    }
}
