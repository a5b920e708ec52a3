//! The NFA edge model regexes are synthesized from.
//!
//! Edges form a tree: simple mask matches, concatenations, and disjunctive
//! groups. There is no epsilon variant; skippability is a flag on the edge
//! that may be skipped. A single-member group must be optional, otherwise
//! the group wrapper carries no meaning and signals a construction bug.

use phonerange_core::DigitMask;

use crate::any_path::AnyPath;

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Edge {
    /// One digit position; `optional` means zero or one matching digit.
    Simple { mask: DigitMask, optional: bool },
    /// Ordered concatenation.
    Sequence(Vec<Edge>),
    /// Alternatives; `optional` applies to the disjunction as a whole.
    Group { members: Vec<Edge>, optional: bool },
}

impl Edge {
    pub fn simple(mask: DigitMask) -> Edge {
        assert!(!mask.is_empty(), "empty digit mask on an edge");
        Edge::Simple { mask, optional: false }
    }

    pub fn any_digit() -> Edge {
        Edge::Simple { mask: DigitMask::ALL, optional: false }
    }

    /// Concatenation; nested sequences flatten.
    pub fn sequence(children: Vec<Edge>) -> Edge {
        assert!(!children.is_empty(), "empty edge sequence");
        let mut flat = Vec::with_capacity(children.len());
        for child in children {
            match child {
                Edge::Sequence(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        if flat.len() == 1 {
            flat.pop().unwrap()
        } else {
            Edge::Sequence(flat)
        }
    }

    pub fn concat(self, other: Edge) -> Edge {
        Edge::sequence(vec![self, other])
    }

    pub fn group(members: Vec<Edge>, optional: bool) -> Edge {
        assert!(!members.is_empty(), "group with zero members");
        assert!(
            members.len() > 1 || optional,
            "single-member group must be optional"
        );
        Edge::Group { members, optional }
    }

    /// This edge, skippable as a whole.
    pub fn optional(self) -> Edge {
        match self {
            Edge::Simple { mask, .. } => Edge::Simple { mask, optional: true },
            Edge::Group { members, .. } => Edge::Group { members, optional: true },
            seq @ Edge::Sequence(_) => Edge::Group { members: vec![seq], optional: true },
        }
    }

    pub fn is_optional(&self) -> bool {
        match self {
            Edge::Simple { optional, .. } | Edge::Group { optional, .. } => *optional,
            Edge::Sequence(_) => false,
        }
    }

    /// The accepted any-digit run lengths, if this edge consumes nothing
    /// but any-digit positions.
    pub fn as_any_path(&self) -> Option<AnyPath> {
        match self {
            Edge::Simple { mask, optional } => mask.is_all().then(|| {
                let path = AnyPath::single(1);
                if *optional { path.make_optional() } else { path }
            }),
            Edge::Sequence(children) => {
                let mut joined = AnyPath::ZERO;
                for child in children {
                    joined = joined.join(child.as_any_path()?);
                }
                Some(joined)
            }
            Edge::Group { members, optional } => {
                let mut union = 0u32;
                for member in members {
                    union |= member.as_any_path()?.bits();
                }
                let path = AnyPath::new(union);
                Some(if *optional { path.make_optional() } else { path })
            }
        }
    }

    /// The canonical edge structure for an any-digit length set; inverse
    /// of [`Edge::as_any_path`] on its image.
    pub fn from_any_path(path: AnyPath) -> Edge {
        let mask = path.bits();
        assert!(mask > 1, "any-path mask {mask:#b} has no edge form");
        if mask & 1 != 0 {
            return match Edge::from_any_path(AnyPath::new(mask & !1)) {
                Edge::Simple { mask, optional: false } => {
                    Edge::Simple { mask, optional: true }
                }
                inner => Edge::group(vec![inner], true),
            };
        }
        let lo = path.min_len();
        let mut children: Vec<Edge> = (0..lo).map(|_| Edge::any_digit()).collect();
        let rest = mask >> lo;
        if rest != 1 {
            children.push(Edge::from_any_path(AnyPath::new(rest)));
        }
        Edge::sequence(children)
    }
}
