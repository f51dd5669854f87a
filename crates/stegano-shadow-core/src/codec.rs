//! Hides one evaluated byte inside a 2x2 carrier block.
//!
//! The byte is split 3/3/2 over the three lowest bits of `W`, `V` and `U`.
//! The third bit of `U` carries the parity of the whole byte, which is the
//! only tamper detection of the scheme. `X` is the evaluation point and is
//! never touched here.

use crate::{Result, ShadowError};

const PAYLOAD_MASK: u8 = 0b0000_0111;
const VISUAL_MASK: u8 = !PAYLOAD_MASK;
const PARITY_FLAG: u8 = 0b0000_0100;

/// The four pixels of one carrier block.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct Xwvu {
    pub x: u8,
    pub w: u8,
    pub v: u8,
    pub u: u8,
}

impl Xwvu {
    pub fn new(x: u8, w: u8, v: u8, u: u8) -> Self {
        Self { x, w, v, u }
    }
}

/// 0 for an even number of set bits, 1 for an odd one.
#[inline]
pub fn parity_bit(value: u8) -> u8 {
    (value.count_ones() % 2) as u8
}

/// Writes `value` and its parity into the low bits of `W`, `V` and `U`.
pub fn embed(block: &mut Xwvu, value: u8) {
    let first_three = (value & 0b1110_0000) >> 5;
    let middle_three = (value & 0b0001_1100) >> 2;
    let mut last_three = value & 0b0000_0011;
    if parity_bit(value) == 1 {
        last_three |= PARITY_FLAG;
    }

    block.w = (block.w & VISUAL_MASK) | first_three;
    block.v = (block.v & VISUAL_MASK) | middle_three;
    block.u = (block.u & VISUAL_MASK) | last_three;
}

/// Reads back the byte written by [`embed`].
///
/// `None` when the stored parity does not match the reassembled byte.
pub fn extract(block: &Xwvu) -> Option<u8> {
    let value = ((block.w & PAYLOAD_MASK) << 5)
        | ((block.v & PAYLOAD_MASK) << 2)
        | (block.u & 0b0000_0011);
    let parity = (block.u & PARITY_FLAG) >> 2;

    (parity == parity_bit(value)).then_some(value)
}

/// [`extract`] with the position attached to the error.
pub fn extract_at(block: &Xwvu, shadow: usize, index: usize) -> Result<u8> {
    extract(block).ok_or_else(|| {
        log::error!("parity mismatch in shadow #{shadow} at block {index}");
        ShadowError::CorruptedShare {
            shadow,
            block: index,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_hide_the_reference_value() {
        let mut block = Xwvu::new(69, 54, 64, 27);
        embed(&mut block, 156);

        assert_eq!(block, Xwvu::new(69, 52, 71, 24));
        assert_eq!(extract(&block), Some(156));
    }

    #[test]
    fn should_keep_the_visual_bits() {
        for value in 0..=255u8 {
            let mut block = Xwvu::new(0xAB, 0xFF, 0x00, 0x5A);
            embed(&mut block, value);

            assert_eq!(block.x, 0xAB);
            assert_eq!(block.w & VISUAL_MASK, 0xF8);
            assert_eq!(block.v & VISUAL_MASK, 0x00);
            assert_eq!(block.u & VISUAL_MASK, 0x58);
            assert_eq!(extract(&block), Some(value), "value {value}");
        }
    }

    #[test]
    fn should_detect_any_single_flipped_payload_bit() {
        let mut block = Xwvu::new(1, 2, 3, 4);
        embed(&mut block, 0b1011_0110);

        for bit in 0..3 {
            let mut tampered = block;
            tampered.w ^= 1 << bit;
            assert_eq!(extract(&tampered), None, "W bit {bit}");

            let mut tampered = block;
            tampered.v ^= 1 << bit;
            assert_eq!(extract(&tampered), None, "V bit {bit}");

            let mut tampered = block;
            tampered.u ^= 1 << bit;
            assert_eq!(extract(&tampered), None, "U bit {bit}");
        }
    }

    #[test]
    fn should_report_the_position_of_a_corrupted_share() {
        let mut block = Xwvu::default();
        embed(&mut block, 1);
        block.w ^= 1;

        match extract_at(&block, 3, 17) {
            Err(ShadowError::CorruptedShare { shadow, block }) => {
                assert_eq!((shadow, block), (3, 17));
            }
            other => panic!("expected a corrupted share, got {other:?}"),
        }
    }

    #[test]
    fn parity_bit_counts_set_bits() {
        assert_eq!(parity_bit(0), 0);
        assert_eq!(parity_bit(0b1000_0000), 1);
        assert_eq!(parity_bit(0b1001_1100), 0);
        assert_eq!(parity_bit(0xFF), 0);
        assert_eq!(parity_bit(0xFE), 1);
    }
}
