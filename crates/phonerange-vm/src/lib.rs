//! Execution of compiled digit-matcher programs.
//!
//! [`DigitMatcher`] wraps a byte program produced by
//! `phonerange-bytecode` and answers membership queries without ever
//! materializing the tree it was compiled from.

pub mod matcher;


pub use matcher::{DigitMatcher, ProgramError};
