//! 10-bit digit masks.

use std::fmt;

/// A set of decimal digits as a 10-bit mask; bit `d` means digit `d` is
/// accepted.
///
/// The textual form is minimal: `x` for the full mask, a bare digit for
/// singletons, and otherwise a bracket set where runs of three or more
/// contiguous digits use range notation (`0xF1` displays as `[04-7]`).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DigitMask(u16);

impl DigitMask {
    pub const EMPTY: DigitMask = DigitMask(0);
    /// The "any digit" mask, written `x`.
    pub const ALL: DigitMask = DigitMask(0x3FF);

    pub fn new(bits: u16) -> DigitMask {
        assert!(bits <= 0x3FF, "digit mask out of range: {bits:#x}");
        DigitMask(bits)
    }

    pub fn single(digit: u8) -> DigitMask {
        assert!(digit < 10, "not a digit: {digit}");
        DigitMask(1 << digit)
    }

    /// Digits `lo..=hi` inclusive.
    pub fn range(lo: u8, hi: u8) -> DigitMask {
        assert!(lo <= hi && hi < 10, "invalid digit range {lo}-{hi}");
        DigitMask(((1 << (hi + 1)) - 1) & !((1 << lo) - 1))
    }

    pub fn bits(self) -> u16 {
        self.0
    }

    pub fn contains(self, digit: u8) -> bool {
        digit < 10 && self.0 & (1 << digit) != 0
    }

    pub fn with(self, digit: u8) -> DigitMask {
        assert!(digit < 10, "not a digit: {digit}");
        DigitMask(self.0 | (1 << digit))
    }

    pub fn union(self, other: DigitMask) -> DigitMask {
        DigitMask(self.0 | other.0)
    }

    pub fn intersect(self, other: DigitMask) -> DigitMask {
        DigitMask(self.0 & other.0)
    }

    /// Number of digits in the mask.
    pub fn len(self) -> u32 {
        self.0.count_ones()
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn is_all(self) -> bool {
        self.0 == 0x3FF
    }

    pub fn min_digit(self) -> u8 {
        assert!(!self.is_empty(), "empty digit mask");
        self.0.trailing_zeros() as u8
    }

    pub fn max_digit(self) -> u8 {
        assert!(!self.is_empty(), "empty digit mask");
        15 - self.0.leading_zeros() as u8
    }

    /// The digit, if the mask is a singleton.
    pub fn as_single(self) -> Option<u8> {
        (self.len() == 1).then(|| self.min_digit())
    }

    /// Iterates digits in ascending order.
    pub fn digits(self) -> impl Iterator<Item = u8> {
        (0u8..10).filter(move |&d| self.contains(d))
    }
}

impl fmt::Display for DigitMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        assert!(!self.is_empty(), "empty digit mask has no textual form");
        if self.is_all() {
            return f.write_str("x");
        }
        if let Some(d) = self.as_single() {
            return write!(f, "{d}");
        }
        f.write_str("[")?;
        let mut d = 0u8;
        while d < 10 {
            if !self.contains(d) {
                d += 1;
                continue;
            }
            let start = d;
            while d < 10 && self.contains(d) {
                d += 1;
            }
            let end = d - 1;
            // Range notation only pays off for runs of three or more.
            if end - start >= 2 {
                write!(f, "{start}-{end}")?;
            } else {
                for r in start..=end {
                    write!(f, "{r}")?;
                }
            }
        }
        f.write_str("]")
    }
}

impl fmt::Debug for DigitMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DigitMask({:#012b})", self.0)
    }
}
