//! Decomposition of a range tree into prefix/length keys.

use std::collections::HashMap;
use std::fmt;

use indexmap::IndexMap;

use crate::mask::DigitMask;
use crate::spec::RangeSpec;
use crate::tree::{NodeId, RangeTree};

/// A set of total sequence lengths (0 to 18) as a bitmask.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct LengthSet(u32);

impl LengthSet {
    pub const EMPTY: LengthSet = LengthSet(0);

    pub fn single(len: usize) -> LengthSet {
        LengthSet::EMPTY.with(len)
    }

    pub fn with(self, len: usize) -> LengthSet {
        assert!(len <= 18, "length out of range: {len}");
        LengthSet(self.0 | (1 << len))
    }

    pub fn contains(self, len: usize) -> bool {
        len <= 18 && self.0 & (1 << len) != 0
    }

    pub fn union(self, other: LengthSet) -> LengthSet {
        LengthSet(self.0 | other.0)
    }

    /// Every length increased by `n`.
    pub fn shift(self, n: usize) -> LengthSet {
        let shifted = LengthSet(self.0 << n);
        assert!(shifted.0 < (1 << 19), "length out of range after shift");
        shifted
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn lengths(self) -> impl Iterator<Item = usize> {
        (0..=18).filter(move |&l| self.contains(l))
    }
}

impl FromIterator<usize> for LengthSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> LengthSet {
        iter.into_iter().fold(LengthSet::EMPTY, LengthSet::with)
    }
}

impl fmt::Display for LengthSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lengths: Vec<usize> = self.lengths().collect();
        let mut first = true;
        let mut i = 0;
        while i < lengths.len() {
            let start = i;
            while i + 1 < lengths.len() && lengths[i + 1] == lengths[i] + 1 {
                i += 1;
            }
            if !first {
                f.write_str(",")?;
            }
            first = false;
            if i > start {
                write!(f, "{}-{}", lengths[start], lengths[i])?;
            } else {
                write!(f, "{}", lengths[start])?;
            }
            i += 1;
        }
        Ok(())
    }
}

impl fmt::Debug for LengthSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LengthSet({self})")
    }
}

/// A prefix plus the total lengths accepted beyond it: the key matches any
/// sequence that extends a match of `prefix` with any digits up to a total
/// length in `lengths`.
///
/// Canonical form: the prefix never ends in an any-digit mask (trailing
/// `x` positions fold into the length set instead).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct RangeKey {
    pub prefix: RangeSpec,
    pub lengths: LengthSet,
}

impl fmt::Display for RangeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.prefix, self.lengths)
    }
}

impl RangeTree {
    /// Decomposes the tree into range keys: sequences grouped by common
    /// prefix and the total lengths accepted for it. Keys with the same
    /// canonical prefix are merged; output is sorted by prefix.
    pub fn range_keys(&self) -> Vec<RangeKey> {
        let Some(init) = self.initial() else { return Vec::new() };
        let mut any = HashMap::new();
        let mut keys: IndexMap<RangeSpec, LengthSet> = IndexMap::new();
        let mut path = Vec::new();
        self.collect_keys(init, &mut path, &mut any, &mut keys);
        let mut out: Vec<RangeKey> = keys
            .into_iter()
            .map(|(prefix, lengths)| RangeKey { prefix, lengths })
            .collect();
        out.sort();
        out
    }

    /// The accepted run lengths below `node`, if its entire subtree is an
    /// any-digit chain (every edge carries the full mask).
    fn any_lengths(&self, node: NodeId, memo: &mut HashMap<NodeId, Option<LengthSet>>) -> Option<LengthSet> {
        if let Some(&cached) = memo.get(&node) {
            return cached;
        }
        let result = match self.edges(node) {
            [] => Some(LengthSet::single(0)),
            [(mask, target)] if mask.is_all() => {
                self.any_lengths(*target, memo).map(|below| {
                    let mut lengths = below.shift(1);
                    if self.can_terminate(node) {
                        lengths = lengths.with(0);
                    }
                    lengths
                })
            }
            _ => None,
        };
        memo.insert(node, result);
        result
    }

    fn collect_keys(
        &self,
        node: NodeId,
        path: &mut Vec<DigitMask>,
        any: &mut HashMap<NodeId, Option<LengthSet>>,
        keys: &mut IndexMap<RangeSpec, LengthSet>,
    ) {
        if let Some(runs) = self.any_lengths(node, any) {
            emit_key(path, runs.shift(path.len()), keys);
            return;
        }
        if self.can_terminate(node) {
            emit_key(path, LengthSet::single(path.len()), keys);
        }
        for &(mask, target) in self.edges(node) {
            path.push(mask);
            self.collect_keys(target, path, any, keys);
            path.pop();
        }
    }
}

fn emit_key(path: &[DigitMask], lengths: LengthSet, keys: &mut IndexMap<RangeSpec, LengthSet>) {
    // Trailing any-digit positions carry no prefix information; folding
    // them into the length set keeps literal prefixes intact and merges
    // keys that differ only in how far their `x` tail reaches.
    let mut masks = path;
    while let [head @ .., last] = masks {
        if !last.is_all() {
            break;
        }
        masks = head;
    }
    let prefix = RangeSpec::from_masks(masks.iter().copied());
    let entry = keys.entry(prefix).or_insert(LengthSet::EMPTY);
    *entry = entry.union(lengths);
}
