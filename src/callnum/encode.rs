//! Bit-packed, order-isomorphic call-number keys.
//!
//! Field layout, most significant first: 3×5-bit class letters, 17-bit
//! class-number integer part, 17-bit fraction, 5-bit cutter letter, 17-bit
//! cutter digits — 71 bits, held in a `u128` so even ZZ-class numbers stay
//! a single fixed-width word. Blank letter fields encode as 0, so shorter
//! prefixes sort first, and digit fields compare numerically rather than
//! lexicographically (`QA1` < `QA12`).

use serde::{Deserialize, Serialize};

use super::parse::{CallNumber, FRACTION_WIDTH};

const CUTTER_DIGITS_SHIFT: u32 = 0;
const CUTTER_LETTER_SHIFT: u32 = 17;
const FRACTION_SHIFT: u32 = 22;
const INTEGER_SHIFT: u32 = 39;
const LETTER3_SHIFT: u32 = 56;
const LETTER2_SHIFT: u32 = 61;
const LETTER1_SHIFT: u32 = 66;

/// Saturated 17-bit digit field, used for ceiling keys.
const DIGITS_MAX: u32 = (1 << 17) - 1;
/// Saturated 5-bit letter field, used for ceiling keys.
const LETTER_MAX: u32 = (1 << 5) - 1;

/// A fixed-width, totally ordered encoding of an LC call number.
///
/// For any two parseable call numbers `a` and `b`, `encode(a) < encode(b)`
/// exactly when `a` shelves before `b`. Keys are plain integers: comparison
/// is branch-free and queries never re-parse strings.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct EncodedKey(u128);

impl EncodedKey {
    /// Smallest possible key; the identity for subtree `max_end` values.
    pub const MIN: Self = Self(0);

    /// The raw packed bits, mainly useful for debugging.
    pub fn to_bits(self) -> u128 {
        self.0
    }
}

fn pack(letters: [u8; 3], integer: u32, fraction: u32, cutter_letter: u32, cutter_digits: u32) -> EncodedKey {
    let mut bits = 0u128;
    bits |= u128::from(letters[0]) << LETTER1_SHIFT;
    bits |= u128::from(letters[1]) << LETTER2_SHIFT;
    bits |= u128::from(letters[2]) << LETTER3_SHIFT;
    bits |= u128::from(integer) << INTEGER_SHIFT;
    bits |= u128::from(fraction) << FRACTION_SHIFT;
    bits |= u128::from(cutter_letter) << CUTTER_LETTER_SHIFT;
    bits |= u128::from(cutter_digits) << CUTTER_DIGITS_SHIFT;
    EncodedKey(bits)
}

/// `10^(5-count) - 1`: the padding that turns a `count`-digit fraction into
/// the largest value sharing those digits.
fn nines_pad(count: u8) -> u32 {
    10u32.pow(FRACTION_WIDTH - u32::from(count)) - 1
}

impl CallNumber {
    /// The smallest key in this call number's bucket.
    ///
    /// Absent fields encode as zero. This is the encoding for range begins
    /// and for query points.
    pub fn floor_key(&self) -> EncodedKey {
        let (cutter_letter, cutter_digits) = match self.cutter {
            Some(c) => (u32::from(c.letter), c.digits),
            None => (0, 0),
        };
        pack(self.letters, self.integer, self.fraction, cutter_letter, cutter_digits)
    }

    /// The supremum of this call number's bucket.
    ///
    /// Used for range ends, so that an endpoint dominates every longer call
    /// number sharing its prefix: `QA276` as an endpoint covers `QA276.5`,
    /// and `QA76.9` covers `QA76.95` but not `QA77`. The most specific
    /// component given has its digits nine-padded to field width; absent
    /// trailing fields saturate outright.
    pub fn ceiling_key(&self) -> EncodedKey {
        match self.cutter {
            Some(c) => pack(
                self.letters,
                self.integer,
                self.fraction,
                u32::from(c.letter),
                c.digits + nines_pad(c.digit_count),
            ),
            None => pack(
                self.letters,
                self.integer,
                self.fraction + nines_pad(self.fraction_digits),
                LETTER_MAX,
                DIGITS_MAX,
            ),
        }
    }
}
