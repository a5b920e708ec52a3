//! Core data model for digit-range tooling.
//!
//! This crate contains:
//! - [`DigitSequence`]: immutable sequences of up to 18 decimal digits
//! - [`DigitMask`] / [`RangeSpec`]: per-position digit patterns with a
//!   compact textual form
//! - [`RangeTree`]: the DFA representing an arbitrary set of digit
//!   sequences, with union/retain/decomposition operations

pub mod decompose;
pub mod digits;
pub mod error;
pub mod mask;
pub mod spec;
pub mod tree;

#[cfg(test)]
mod digits_tests;
#[cfg(test)]
mod spec_tests;

pub use decompose::{LengthSet, RangeKey};
pub use digits::{DigitSequence, MAX_DIGITS};
pub use error::ParseError;
pub use mask::DigitMask;
pub use spec::RangeSpec;
pub use tree::{NodeId, RangeTree, RangeTreeVisitor};
