//! The regex generation pipeline.

use std::collections::HashSet;

use phonerange_core::{DigitSequence, RangeTree};

use crate::edge::Edge;
use crate::nfa::Nfa;
use crate::subgroup;
use crate::trailing;
use crate::writer::EdgeWriter;

/// Configurable regex generator over range trees.
///
/// `basic()` runs no optimization passes; each `with_*` builder method
/// independently enables one. Every configuration accepts exactly the
/// source tree's language.
#[derive(Clone, Copy, Debug, Default)]
pub struct RegexGenerator {
    tail: bool,
    subgroup: bool,
    dfa_factorization: bool,
    dot: bool,
}

impl RegexGenerator {
    pub fn basic() -> RegexGenerator {
        RegexGenerator::default()
    }

    /// Shares trailing any-digit runs across branches.
    pub fn with_tail_optimization(mut self) -> RegexGenerator {
        self.tail = true;
        self
    }

    /// Splits out one repeated subtree and regexes it separately.
    pub fn with_subgroup_optimization(mut self) -> RegexGenerator {
        self.subgroup = true;
        self
    }

    /// Factors the expression at every shared interior node, not only at
    /// materialized shared tails.
    pub fn with_dfa_factorization(mut self) -> RegexGenerator {
        self.dfa_factorization = true;
        self
    }

    /// Renders any-digit as `.` instead of `\d`.
    pub fn with_dot_match(mut self) -> RegexGenerator {
        self.dot = true;
        self
    }

    pub fn to_regex(&self, tree: &RangeTree) -> String {
        assert!(!tree.is_empty(), "cannot generate a regex for an empty tree");
        let writer = if self.dot { EdgeWriter::with_dot_match() } else { EdgeWriter::new() };

        if tree.contains(&DigitSequence::EMPTY) {
            // The empty sequence has no edge form; generate the non-empty
            // remainder and make the whole expression skippable.
            let remainder =
                RangeTree::from_specs(tree.specs().into_iter().filter(|s| !s.is_empty()));
            if remainder.is_empty() {
                return String::new();
            }
            let edge = Edge::group(vec![self.build(&remainder)], true);
            return writer.to_regex(&edge);
        }

        writer.to_regex(&self.build(tree))
    }

    fn build(&self, tree: &RangeTree) -> Edge {
        if self.subgroup
            && let Some(split) = subgroup::extract(tree)
        {
            // The parts are regenerated without further splitting.
            let inner = RegexGenerator { subgroup: false, ..*self };
            let through = inner.part(&split.prefix).concat(inner.part(&split.subgroup));
            return Edge::group(vec![through, inner.part(&split.rest)], false);
        }
        self.collapse(tree)
    }

    /// An extracted part may itself accept the empty sequence (a bridging
    /// node that is also an acceptance point).
    fn part(&self, tree: &RangeTree) -> Edge {
        if tree.contains(&DigitSequence::EMPTY) {
            let remainder =
                RangeTree::from_specs(tree.specs().into_iter().filter(|s| !s.is_empty()));
            assert!(!remainder.is_empty(), "part tree accepts only the empty sequence");
            return Edge::group(vec![self.collapse(&remainder)], true);
        }
        self.collapse(tree)
    }

    fn collapse(&self, tree: &RangeTree) -> Edge {
        let mut nfa = Nfa::from_tree(tree);
        let mut cuts: HashSet<u32> = HashSet::new();
        if self.tail
            && let Some(materialized) = trailing::optimize(&mut nfa)
        {
            cuts.extend(materialized);
        }
        if self.dfa_factorization {
            cuts.extend(nfa.interior_nodes());
        }
        nfa.collapse(&cuts)
    }
}
