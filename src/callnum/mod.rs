//! Library of Congress call-number parsing and key encoding.
//!
//! A call number such as `QA 112.3 .A4 1990` is reduced to the components
//! that determine its shelf order — up to three class letters, a class
//! number with an optional decimal fraction, and an optional first cutter —
//! and packed into a fixed-width [`EncodedKey`] whose integer ordering
//! matches LC shelf ordering. Everything after the first cutter (years,
//! later cutters) does not affect classification and is ignored.

mod encode;
mod parse;

pub use encode::EncodedKey;
pub use parse::{CallNumber, Cutter, InvalidCallNumber};
