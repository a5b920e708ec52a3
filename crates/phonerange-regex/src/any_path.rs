//! Length sets of any-digit runs.
//!
//! An `AnyPath` describes a sub-path that consumes nothing but any-digit
//! edges: the bitmask records exactly which run lengths are accepted, with
//! bit k meaning "a run of k digits". Bit 0 is the optional bit (the run
//! may be empty). Masks 0 and 1 never reach the renderer: 0 accepts
//! nothing and 1 consumes nothing, neither is a printable path.

use std::fmt;

/// A set of accepted any-digit run lengths as a bitmask.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnyPath(u32);

impl AnyPath {
    /// The zero-length path: bit 0 alone. A valid join/factor operand but
    /// not renderable on its own.
    pub const ZERO: AnyPath = AnyPath(1);

    pub fn new(mask: u32) -> AnyPath {
        assert!(mask != 0, "any-path mask accepts no lengths");
        assert!(mask < 1 << 19, "any-path run length over 18");
        AnyPath(mask)
    }

    /// A run of exactly `len` digits.
    pub fn single(len: usize) -> AnyPath {
        assert!(len <= 18, "any-path run length over 18");
        AnyPath(1 << len)
    }

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn contains(self, len: usize) -> bool {
        len < 32 && self.0 & (1 << len) != 0
    }

    /// True if the empty run is accepted.
    pub fn is_optional(self) -> bool {
        self.0 & 1 != 0
    }

    /// True if only the empty run is accepted.
    pub fn is_zero(self) -> bool {
        self.0 == 1
    }

    pub fn min_len(self) -> usize {
        self.0.trailing_zeros() as usize
    }

    pub fn max_len(self) -> usize {
        31 - self.0.leading_zeros() as usize
    }

    pub fn lengths(self) -> impl Iterator<Item = usize> {
        (0..32).filter(move |&l| self.contains(l))
    }

    pub fn make_optional(self) -> AnyPath {
        AnyPath(self.0 | 1)
    }

    /// Concatenation: the accepted lengths are all sums of one length from
    /// each operand.
    pub fn join(self, other: AnyPath) -> AnyPath {
        let mut joined = 0u64;
        for len in self.lengths() {
            joined |= u64::from(other.0) << len;
        }
        assert!(joined < 1 << 19, "any-path run length over 18");
        AnyPath(joined as u32)
    }

    /// Divides `factor` out: `Some(rem)` with `factor.join(rem) == self`,
    /// or `None` when no such remainder exists.
    ///
    /// The remainder is the maximal set of shifts of `factor` that stay
    /// within `self`; the division succeeds iff those shifts cover `self`
    /// exactly. A path divided by itself leaves [`AnyPath::ZERO`].
    pub fn factor(self, factor: AnyPath) -> Option<AnyPath> {
        let target = u64::from(self.0);
        let mut shifts = 0u32;
        let mut covered = 0u64;
        for j in 0..=18 {
            let shifted = u64::from(factor.0) << j;
            if shifted & !target == 0 {
                shifts |= 1 << j;
                covered |= shifted;
            }
        }
        (shifts != 0 && covered == target).then(|| AnyPath(shifts))
    }

    /// Renders the exact length set as a quantified `token` expression.
    ///
    /// The lowest contiguous run of lengths becomes one bounded repetition
    /// when no higher lengths remain; otherwise its minimum is emitted as
    /// mandatory digits and the rest recurses inside an optional group, so
    /// sparse sets like {2,3} never widen to 0-3.
    pub fn to_regex(self, token: &str) -> String {
        let mut out = String::new();
        self.append_regex(token, &mut out);
        out
    }

    fn append_regex(self, token: &str, out: &mut String) {
        assert!(self.0 > 1, "any-path mask {:#b} has no printable form", self.0);
        if self.is_optional() {
            let required = AnyPath(self.0 & !1);
            if required.0 == 0b10 {
                out.push_str(token);
                out.push('?');
            } else if (self.0 + 1).is_power_of_two() {
                // Lengths 0..=N contiguous.
                out.push_str(token);
                out.push_str(&format!("{{0,{}}}", self.max_len()));
            } else {
                out.push_str("(?:");
                required.append_regex(token, out);
                out.push_str(")?");
            }
            return;
        }
        let lo = self.min_len();
        let run = (self.0 >> lo).trailing_ones() as usize;
        let hi = lo + run - 1;
        if self.0 >> (hi + 1) == 0 {
            if lo == hi {
                push_required(token, lo, out);
            } else if lo == 1 && hi == 2 {
                out.push_str(token);
                out.push_str(token);
                out.push('?');
            } else {
                out.push_str(token);
                out.push_str(&format!("{{{lo},{hi}}}"));
            }
        } else {
            // Emit the minimum as mandatory and recurse on the shifted
            // rest; bit `lo` lands on the optional bit, so the recursion
            // wraps the remainder itself.
            push_required(token, lo, out);
            AnyPath(self.0 >> lo).append_regex(token, out);
        }
    }
}

/// Exactly `count` mandatory tokens; two literals beat a `{2}` quantifier.
fn push_required(token: &str, count: usize, out: &mut String) {
    match count {
        1 => out.push_str(token),
        2 => {
            out.push_str(token);
            out.push_str(token);
        }
        _ => {
            out.push_str(token);
            out.push_str(&format!("{{{count}}}"));
        }
    }
}

impl fmt::Debug for AnyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AnyPath({:#b})", self.0)
    }
}
