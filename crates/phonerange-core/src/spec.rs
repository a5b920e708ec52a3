//! Range specifications: one digit mask per position.
//!
//! The textual form uses literal digits, `x` for "any digit", bracket sets
//! with individual digits and contiguous ranges (`[3-689]`), and optional
//! `_` separators for readability (`0_12[3-8]_xxx_xxx`). Separators carry
//! no meaning and are dropped when printing; printing always produces the
//! minimal canonical encoding.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::digits::{DigitSequence, MAX_DIGITS};
use crate::error::ParseError;
use crate::mask::DigitMask;

/// A pattern over digit sequences: an ordered list of 0 to 18 non-empty
/// digit masks. Matches exactly the sequences of the same length whose
/// digit at every position is in that position's mask.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct RangeSpec {
    masks: Vec<DigitMask>,
}

impl RangeSpec {
    /// The empty specification, matching only the empty sequence.
    pub fn empty() -> RangeSpec {
        RangeSpec { masks: Vec::new() }
    }

    pub fn from_masks<I: IntoIterator<Item = DigitMask>>(masks: I) -> RangeSpec {
        let masks: Vec<DigitMask> = masks.into_iter().collect();
        assert!(masks.len() <= MAX_DIGITS, "specification over {MAX_DIGITS} positions");
        for m in &masks {
            assert!(!m.is_empty(), "empty digit mask in specification");
        }
        RangeSpec { masks }
    }

    /// The specification matching exactly one sequence.
    pub fn from_sequence(seq: &DigitSequence) -> RangeSpec {
        RangeSpec {
            masks: seq.digits().map(DigitMask::single).collect(),
        }
    }

    pub fn parse(s: &str) -> Result<RangeSpec, ParseError> {
        let mut masks = Vec::new();
        let mut chars = s.char_indices().peekable();
        // True when a `_` would be misplaced (at the start or repeated).
        let mut at_boundary = true;
        while let Some((pos, ch)) = chars.next() {
            match ch {
                '0'..='9' => {
                    masks.push(DigitMask::single(ch as u8 - b'0'));
                    at_boundary = false;
                }
                'x' => {
                    masks.push(DigitMask::ALL);
                    at_boundary = false;
                }
                '[' => {
                    masks.push(parse_bracket(pos, &mut chars)?);
                    at_boundary = false;
                }
                '_' => {
                    if at_boundary || chars.peek().is_none() {
                        return Err(ParseError::MisplacedSeparator { pos });
                    }
                    at_boundary = true;
                }
                _ => return Err(ParseError::InvalidCharacter { ch, pos }),
            }
            if masks.len() > MAX_DIGITS {
                return Err(ParseError::TooLong { len: masks.len() });
            }
        }
        Ok(RangeSpec { masks })
    }

    pub fn len(&self) -> usize {
        self.masks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }

    pub fn mask(&self, i: usize) -> DigitMask {
        self.masks[i]
    }

    pub fn masks(&self) -> &[DigitMask] {
        &self.masks
    }

    pub fn matches(&self, seq: &DigitSequence) -> bool {
        seq.len() == self.len()
            && seq.digits().zip(&self.masks).all(|(d, m)| m.contains(d))
    }

    /// The lexicographically smallest matching sequence. Named to stay
    /// clear of `Ord::min`, which by-value receivers would resolve to.
    pub fn min_sequence(&self) -> DigitSequence {
        DigitSequence::from_digits(self.masks.iter().map(|m| m.min_digit()))
    }

    /// The lexicographically largest matching sequence.
    pub fn max_sequence(&self) -> DigitSequence {
        DigitSequence::from_digits(self.masks.iter().map(|m| m.max_digit()))
    }

    /// Number of sequences matched: the product of per-position mask sizes.
    pub fn sequence_count(&self) -> u64 {
        self.masks.iter().map(|m| u64::from(m.len())).product()
    }

    /// The sub-specification formed by the first `n` positions.
    pub fn first(&self, n: usize) -> RangeSpec {
        assert!(n <= self.len(), "prefix length {n} out of range");
        RangeSpec { masks: self.masks[..n].to_vec() }
    }

    /// The sub-specification formed by the last `n` positions.
    pub fn last(&self, n: usize) -> RangeSpec {
        assert!(n <= self.len(), "suffix length {n} out of range");
        RangeSpec { masks: self.masks[self.len() - n..].to_vec() }
    }

    /// Concatenates two specifications.
    pub fn extend(&self, other: &RangeSpec) -> RangeSpec {
        RangeSpec::from_masks(self.masks.iter().chain(&other.masks).copied())
    }

    pub fn push(&self, mask: DigitMask) -> RangeSpec {
        assert!(!mask.is_empty(), "empty digit mask in specification");
        assert!(self.len() < MAX_DIGITS, "specification over {MAX_DIGITS} positions");
        let mut masks = self.masks.clone();
        masks.push(mask);
        RangeSpec { masks }
    }
}

fn parse_bracket(
    start: usize,
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
) -> Result<DigitMask, ParseError> {
    let mut mask = DigitMask::EMPTY;
    let mut closed = false;
    while let Some((pos, ch)) = chars.next() {
        match ch {
            ']' => {
                closed = true;
                break;
            }
            '0'..='9' => {
                let lo = ch as u8 - b'0';
                // A following `-` makes this the start of a range.
                if matches!(chars.peek(), Some((_, '-'))) {
                    chars.next();
                    let Some((hpos, hc)) = chars.next() else {
                        return Err(ParseError::UnterminatedBracket { pos: start });
                    };
                    let Some(hi) = hc.to_digit(10).map(|d| d as u8) else {
                        return Err(ParseError::InvalidCharacter { ch: hc, pos: hpos });
                    };
                    if hi <= lo {
                        return Err(ParseError::InvalidRange { lo, hi, pos });
                    }
                    let range = DigitMask::range(lo, hi);
                    if !mask.intersect(range).is_empty() {
                        let dup = mask.intersect(range).min_digit();
                        return Err(ParseError::DuplicateDigit { digit: dup, pos });
                    }
                    mask = mask.union(range);
                } else {
                    if mask.contains(lo) {
                        return Err(ParseError::DuplicateDigit { digit: lo, pos });
                    }
                    mask = mask.with(lo);
                }
            }
            _ => return Err(ParseError::InvalidCharacter { ch, pos }),
        }
    }
    if !closed {
        return Err(ParseError::UnterminatedBracket { pos: start });
    }
    if mask.is_empty() {
        return Err(ParseError::EmptyBracket { pos: start });
    }
    Ok(mask)
}

/// Structural total order: positions compare left to right by the mask's
/// smallest digit and then its raw bit pattern; a proper prefix sorts
/// first. This is deliberately not the order of [`RangeSpec::min`] values
/// for overlapping specifications.
impl Ord for RangeSpec {
    fn cmp(&self, other: &Self) -> Ordering {
        for (a, b) in self.masks.iter().zip(&other.masks) {
            let ord = a
                .min_digit()
                .cmp(&b.min_digit())
                .then(a.bits().cmp(&b.bits()));
            if ord != Ordering::Equal {
                return ord;
            }
        }
        self.len().cmp(&other.len())
    }
}

impl PartialOrd for RangeSpec {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for RangeSpec {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, ParseError> {
        RangeSpec::parse(s)
    }
}

impl fmt::Display for RangeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for m in &self.masks {
            write!(f, "{m}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for RangeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RangeSpec(\"{self}\")")
    }
}
