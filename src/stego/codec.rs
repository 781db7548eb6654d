//! LSB embedding and extraction over a carrier's flat element sequence.
//!
//! Embedding writes one symbol into the low `n` bits of each leading element
//! and leaves every other bit untouched. Extraction reads the 64-bit header
//! first, validates it, then reads exactly as many elements as the declared
//! length requires.

use tracing::{debug, info};

use crate::config::BitDepth;
use crate::stego::bits::{from_symbols, symbol_count, to_symbols};
use crate::stego::capacity::{max_addressable_bytes, CapacityPlan};
use crate::stego::carrier::{Carrier, CarrierError, Sample};
use crate::stego::frame::{unframe, HEADER_BITS, HEADER_LEN};

/// A carrier with a bitstream embedded, and how it was laid out.
#[derive(Debug, Clone)]
pub struct Embedded<C> {
    pub carrier: C,
    pub plan: CapacityPlan,
}

/// Embeds a framed bitstream into a copy of `carrier`.
///
/// Never fails for lack of space: a carrier that is too small is tiled first,
/// so the returned carrier may be larger than the input.
pub fn embed<C: Carrier>(
    carrier: &C,
    bitstream: &[u8],
    bits: BitDepth,
) -> Result<Embedded<C>, CarrierError> {
    if carrier.is_empty() {
        return Err(CarrierError::Empty);
    }

    let symbols = to_symbols(bitstream, bits);
    let plan = CapacityPlan::for_bitstream(carrier.len(), bitstream.len() * 8, bits);

    let mut output = carrier.clone();
    if plan.needs_tiling() {
        info!(
            required = plan.required_elements,
            available = plan.available_elements,
            repeats = plan.repeats,
            "carrier too small, tiling"
        );
        output.tile(plan.repeats)?;
    }

    write_symbols(output.elements_mut(), &symbols, bits);
    debug!(symbols = symbols.len(), bits = bits.get(), "embedded bitstream");

    Ok(Embedded {
        carrier: output,
        plan,
    })
}

/// Extracts the framed payload from `elements`.
///
/// Returns `None` when the header is missing or invalid, or when the carrier
/// is shorter than the declared length requires.
pub fn extract<E: Sample>(elements: &[E], bits: BitDepth) -> Option<Vec<u8>> {
    let header_elements = symbol_count(HEADER_BITS, bits);
    if elements.len() < header_elements {
        debug!(elements = elements.len(), "carrier shorter than a frame header");
        return None;
    }

    let header_symbols = read_symbols(&elements[..header_elements], bits);
    let header: [u8; HEADER_LEN] = from_symbols(&header_symbols, bits, 0, HEADER_LEN)
        .try_into()
        .ok()?;
    let len = unframe(&header, max_addressable_bytes(elements.len(), bits))?;

    let needed = symbol_count(HEADER_BITS + len * 8, bits);
    if elements.len() < needed {
        debug!(needed, available = elements.len(), "carrier truncated");
        return None;
    }

    let symbols = read_symbols(&elements[..needed], bits);
    Some(from_symbols(&symbols, bits, HEADER_BITS, len))
}

/// Writes `symbols` into the low bits of the leading elements.
pub fn write_symbols<E: Sample>(elements: &mut [E], symbols: &[u8], bits: BitDepth) {
    debug_assert!(symbols.len() <= elements.len());

    let mask = bits.mask();
    for (element, &symbol) in elements.iter_mut().zip(symbols) {
        *element = element.with_low_bits(mask, symbol);
    }
}

/// Reads the low bits of every element.
pub fn read_symbols<E: Sample>(elements: &[E], bits: BitDepth) -> Vec<u8> {
    let mask = bits.mask();
    elements.iter().map(|e| e.low_bits(mask)).collect()
}
