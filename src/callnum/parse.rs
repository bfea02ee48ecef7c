//! Scanner for the LC call-number grammar.
//!
//! Grammar (after preprocessing): 1–3 class letters, a class number with an
//! optional decimal fraction, then optionally a first cutter (period, one
//! letter, digits). Cutter digits are decimal fraction digits, so `.A4`
//! shelves after `.A39`.

use thiserror::Error;

/// Maximum decimal digits kept per fractional field (class-number fraction
/// and cutter digits). Further digits are below key granularity and dropped.
pub(crate) const FRACTION_WIDTH: u32 = 5;

/// Errors raised when a string cannot be parsed as an LC call number.
///
/// Always recoverable: at the query boundary an unparseable call number
/// simply has no topics, and at build time the offending range is dropped
/// with a warning.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidCallNumber {
    /// Nothing alphabetic where the class letters should be.
    #[error("call number {raw:?} has no leading class letters")]
    MissingLetters {
        /// The original, unmodified input text.
        raw: String,
    },
    /// LC class codes are at most three letters.
    #[error("call number {raw:?} has more than three class letters")]
    TooManyLetters {
        /// The original, unmodified input text.
        raw: String,
    },
    /// No digits follow the class letters.
    #[error("call number {raw:?} has no class number")]
    MissingNumber {
        /// The original, unmodified input text.
        raw: String,
    },
    /// The integer part of the class number exceeds five digits and cannot
    /// be represented in the key's 17-bit field.
    #[error("class number in {raw:?} is wider than five digits")]
    NumberTooWide {
        /// The original, unmodified input text.
        raw: String,
    },
}

impl InvalidCallNumber {
    /// The original input text, preserved for diagnostics.
    pub fn raw(&self) -> &str {
        match self {
            Self::MissingLetters { raw }
            | Self::TooManyLetters { raw }
            | Self::MissingNumber { raw }
            | Self::NumberTooWide { raw } => raw,
        }
    }
}

/// First cutter of a call number: one letter plus decimal digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cutter {
    /// Letter code, 1 (A) through 26 (Z).
    pub(crate) letter: u8,
    /// Digits scaled to a right-padded 5-digit decimal fraction.
    pub(crate) digits: u32,
    /// How many digits were actually given (for supremum padding).
    pub(crate) digit_count: u8,
}

/// A parsed LC call number, reduced to its order-determining components.
///
/// Produced by [`CallNumber::parse`]; converted to comparable keys via
/// [`CallNumber::floor_key`] and [`CallNumber::ceiling_key`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallNumber {
    /// Class letters, 0 = blank, 1 (A) through 26 (Z). Blank-padded on the
    /// right so `P` sorts before `PA`.
    pub(crate) letters: [u8; 3],
    /// Integer part of the class number, at most five digits.
    pub(crate) integer: u32,
    /// Fractional part scaled to a right-padded 5-digit value.
    pub(crate) fraction: u32,
    /// How many fraction digits were given.
    pub(crate) fraction_digits: u8,
    /// Optional first cutter.
    pub(crate) cutter: Option<Cutter>,
}

impl CallNumber {
    /// Parse a raw call-number string.
    ///
    /// The input is uppercased and stripped of surrounding whitespace and
    /// punctuation before scanning. Trailing material after the first
    /// cutter (publication years, further cutters) is ignored.
    pub fn parse(raw: &str) -> Result<Self, InvalidCallNumber> {
        let text = preprocess(raw);
        let bytes = text.as_bytes();
        let mut pos = 0;

        let letter_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_alphabetic() {
            pos += 1;
        }
        let letter_count = pos - letter_start;
        if letter_count == 0 {
            return Err(InvalidCallNumber::MissingLetters { raw: raw.to_string() });
        }
        if letter_count > 3 {
            return Err(InvalidCallNumber::TooManyLetters { raw: raw.to_string() });
        }
        let mut letters = [0u8; 3];
        for (i, &c) in bytes[letter_start..pos].iter().enumerate() {
            letters[i] = c - b'A' + 1;
        }

        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }

        let digit_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
        if pos == digit_start {
            return Err(InvalidCallNumber::MissingNumber { raw: raw.to_string() });
        }
        if pos - digit_start > FRACTION_WIDTH as usize {
            return Err(InvalidCallNumber::NumberTooWide { raw: raw.to_string() });
        }
        let mut integer = 0u32;
        for &d in &bytes[digit_start..pos] {
            integer = integer * 10 + u32::from(d - b'0');
        }

        let mut fraction = 0u32;
        let mut fraction_digits = 0u8;
        if pos + 1 < bytes.len() && bytes[pos] == b'.' && bytes[pos + 1].is_ascii_digit() {
            pos += 1;
            let frac_start = pos;
            while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                pos += 1;
            }
            (fraction, fraction_digits) = scale_fraction(&bytes[frac_start..pos]);
        }

        // A cutter may be introduced by a period, whitespace, or nothing.
        while pos < bytes.len() && (bytes[pos].is_ascii_whitespace() || bytes[pos] == b'.') {
            pos += 1;
        }
        let mut cutter = None;
        if pos < bytes.len() && bytes[pos].is_ascii_alphabetic() {
            let letter = bytes[pos] - b'A' + 1;
            pos += 1;
            let cutter_start = pos;
            while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                pos += 1;
            }
            let (digits, digit_count) = scale_fraction(&bytes[cutter_start..pos]);
            cutter = Some(Cutter { letter, digits, digit_count });
        }

        Ok(Self { letters, integer, fraction, fraction_digits, cutter })
    }
}

/// Uppercase and strip surrounding whitespace/punctuation.
fn preprocess(raw: &str) -> String {
    raw.trim_matches(|c: char| c.is_whitespace() || c.is_ascii_punctuation())
        .to_ascii_uppercase()
}

/// Scale a run of fraction digits to a right-padded 5-digit value.
///
/// `"4"` becomes `40000`, `"39"` becomes `39000`. Digits past the fifth are
/// below key granularity and dropped.
fn scale_fraction(digits: &[u8]) -> (u32, u8) {
    let mut value = 0u32;
    let mut count = 0u8;
    for &d in digits.iter().take(FRACTION_WIDTH as usize) {
        value = value * 10 + u32::from(d - b'0');
        count += 1;
    }
    value *= 10u32.pow(FRACTION_WIDTH - u32::from(count));
    (value, count)
}
