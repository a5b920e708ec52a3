//! Parse errors for digit sequences and range specifications.

use thiserror::Error;

/// Errors produced when parsing digit sequences or range specifications.
///
/// Positions are byte offsets into the input string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid character {ch:?} at position {pos}")]
    InvalidCharacter { ch: char, pos: usize },

    #[error("too many digit positions: {len} (limit 18)")]
    TooLong { len: usize },

    #[error("unterminated bracket set starting at position {pos}")]
    UnterminatedBracket { pos: usize },

    #[error("empty bracket set at position {pos}")]
    EmptyBracket { pos: usize },

    /// A bracket range must be strictly ascending and span at least two
    /// digits; single digits use the literal form.
    #[error("invalid digit range {lo}-{hi} at position {pos}")]
    InvalidRange { lo: u8, hi: u8, pos: usize },

    #[error("duplicate digit {digit} in bracket set at position {pos}")]
    DuplicateDigit { digit: u8, pos: usize },

    /// `_` separators may only appear between digit positions.
    #[error("misplaced separator at position {pos}")]
    MisplacedSeparator { pos: usize },
}
