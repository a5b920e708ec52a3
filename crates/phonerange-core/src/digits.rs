//! Immutable sequences of up to 18 decimal digits.
//!
//! A `DigitSequence` is the atomic key type of the range model. Sequences
//! are totally ordered lexicographically by digit, with a sequence sorting
//! before any of its extensions ("1" < "10" < "2").

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

/// Maximum number of digits in a sequence or range specification.
pub const MAX_DIGITS: usize = 18;

/// Powers of ten, `POW10[k] == 10^k`.
const POW10: [u64; MAX_DIGITS + 1] = {
    let mut table = [1u64; MAX_DIGITS + 1];
    let mut k = 1;
    while k <= MAX_DIGITS {
        table[k] = table[k - 1] * 10;
        k += 1;
    }
    table
};

/// `SUBTREE[k]` is the number of sequences sharing a fixed prefix of
/// length `k`, the prefix itself included (1 + 10 + ... + 10^(18-k)).
const SUBTREE: [u64; MAX_DIGITS + 1] = {
    let mut table = [1u64; MAX_DIGITS + 1];
    let mut k = MAX_DIGITS;
    while k > 0 {
        k -= 1;
        table[k] = 1 + 10 * table[k + 1];
    }
    table
};

/// An immutable sequence of 0 to 18 decimal digits.
///
/// Stored packed as a base-10 numeral plus an explicit length, so leading
/// zeros are significant ("007" and "7" are distinct sequences).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DigitSequence {
    len: u8,
    value: u64,
}

impl DigitSequence {
    /// The interned empty sequence.
    pub const EMPTY: DigitSequence = DigitSequence { len: 0, value: 0 };

    /// Builds a sequence from raw digit values.
    ///
    /// Panics if a value is not a digit or the result exceeds 18 digits;
    /// use [`FromStr`] for fallible construction from text.
    pub fn from_digits<I: IntoIterator<Item = u8>>(digits: I) -> DigitSequence {
        let mut seq = DigitSequence::EMPTY;
        for d in digits {
            seq = seq.push(d);
        }
        seq
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The digit at position `i` (0 is the leading digit).
    pub fn get(&self, i: usize) -> u8 {
        assert!(i < self.len(), "digit index {i} out of range");
        ((self.value / POW10[self.len() - 1 - i]) % 10) as u8
    }

    /// Iterates digits from the leading position.
    pub fn digits(&self) -> impl Iterator<Item = u8> + '_ {
        (0..self.len()).map(|i| self.get(i))
    }

    /// Returns this sequence extended by one digit.
    pub fn push(&self, digit: u8) -> DigitSequence {
        assert!(digit < 10, "not a digit: {digit}");
        assert!(self.len() < MAX_DIGITS, "digit sequence over {MAX_DIGITS} digits");
        DigitSequence {
            len: self.len + 1,
            value: self.value * 10 + u64::from(digit),
        }
    }

    /// Concatenates two sequences.
    pub fn extend(&self, other: &DigitSequence) -> DigitSequence {
        assert!(
            self.len() + other.len() <= MAX_DIGITS,
            "digit sequence over {MAX_DIGITS} digits"
        );
        DigitSequence {
            len: self.len + other.len,
            value: self.value * POW10[other.len()] + other.value,
        }
    }

    /// The first `n` digits.
    pub fn first(&self, n: usize) -> DigitSequence {
        assert!(n <= self.len(), "prefix length {n} out of range");
        DigitSequence {
            len: n as u8,
            value: self.value / POW10[self.len() - n],
        }
    }

    /// The last `n` digits.
    pub fn last(&self, n: usize) -> DigitSequence {
        assert!(n <= self.len(), "suffix length {n} out of range");
        DigitSequence {
            len: n as u8,
            value: self.value % POW10[n],
        }
    }

    /// Preorder index of this sequence in the depth-18 decimal trie rooted
    /// at the empty sequence; consecutive ranks are adjacent in the total
    /// order.
    fn rank(&self) -> u64 {
        let mut rank = 0;
        for (depth, d) in self.digits().enumerate() {
            rank += 1 + u64::from(d) * SUBTREE[depth + 1];
        }
        rank
    }

    /// Signed distance from `self` to `other` in the total order.
    ///
    /// Antisymmetric; `|distance| - 1` sequences lie strictly between the
    /// two. Zero iff the sequences are equal.
    pub fn distance(&self, other: &DigitSequence) -> i64 {
        other.rank() as i64 - self.rank() as i64
    }
}

impl Ord for DigitSequence {
    fn cmp(&self, other: &Self) -> Ordering {
        // Scaling to a common length makes the comparison lexicographic;
        // on a tie the shorter sequence is a prefix and sorts first.
        let a = self.value * POW10[MAX_DIGITS - self.len()];
        let b = other.value * POW10[MAX_DIGITS - other.len()];
        a.cmp(&b).then(self.len.cmp(&other.len))
    }
}

impl PartialOrd for DigitSequence {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for DigitSequence {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, ParseError> {
        let mut seq = DigitSequence::EMPTY;
        for (pos, ch) in s.char_indices() {
            let Some(d) = ch.to_digit(10) else {
                return Err(ParseError::InvalidCharacter { ch, pos });
            };
            if seq.len() == MAX_DIGITS {
                return Err(ParseError::TooLong { len: s.chars().count() });
            }
            seq = seq.push(d as u8);
        }
        Ok(seq)
    }
}

impl fmt::Display for DigitSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.len > 0 {
            write!(f, "{:0width$}", self.value, width = self.len())?;
        }
        Ok(())
    }
}

impl fmt::Debug for DigitSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DigitSequence(\"{self}\")")
    }
}
