//! The range tree: an acyclic DFA over decimal digits.
//!
//! A tree represents a set of digit sequences. Nodes live in an arena and
//! are hash-consed bottom-up, so any two nodes with the same accepted
//! suffix language are one arena entry; in particular there is a single
//! canonical terminal node (the node whose language is exactly the empty
//! sequence). Out-edges carry digit masks and partition the digit space at
//! every node, so each input sequence has a unique walk.

use std::collections::{BTreeSet, HashMap};

use crate::digits::DigitSequence;
use crate::mask::DigitMask;
use crate::spec::RangeSpec;

/// Handle to a node in a [`RangeTree`] arena.
///
/// Ids are assigned in deterministic construction order; they are only
/// meaningful within the tree that produced them.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
struct NodeData {
    terminal: bool,
    edges: Vec<(DigitMask, NodeId)>,
}

/// Receives `(source, mask, target)` triples in deterministic preorder;
/// every reachable node is expanded exactly once.
pub trait RangeTreeVisitor {
    fn visit(&mut self, source: NodeId, mask: DigitMask, target: NodeId);
}

/// A DFA over digit sequences of length 0 to 18.
#[derive(Clone, Debug)]
pub struct RangeTree {
    nodes: Vec<NodeData>,
    initial: Option<NodeId>,
}

impl RangeTree {
    /// The tree accepting no sequences at all.
    pub fn empty() -> RangeTree {
        RangeTree { nodes: Vec::new(), initial: None }
    }

    pub fn from_specs<I: IntoIterator<Item = RangeSpec>>(specs: I) -> RangeTree {
        let state: BTreeSet<RangeSpec> = specs.into_iter().collect();
        let mut builder = TreeBuilder::default();
        let mut memo = HashMap::new();
        let initial = if state.is_empty() {
            None
        } else {
            Some(build_state(&state, &mut builder, &mut memo))
        };
        builder.finish(initial)
    }

    pub fn from_sequences<'a, I: IntoIterator<Item = &'a DigitSequence>>(seqs: I) -> RangeTree {
        RangeTree::from_specs(seqs.into_iter().map(RangeSpec::from_sequence))
    }

    pub fn is_empty(&self) -> bool {
        self.initial.is_none()
    }

    pub fn initial(&self) -> Option<NodeId> {
        self.initial
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// True if an accepted sequence may end at this node.
    pub fn can_terminate(&self, node: NodeId) -> bool {
        self.nodes[node.index()].terminal
    }

    /// Out-edges in ascending order of their smallest digit; masks are
    /// disjoint and grouped per target.
    pub fn edges(&self, node: NodeId) -> &[(DigitMask, NodeId)] {
        &self.nodes[node.index()].edges
    }

    fn child(&self, node: NodeId, digit: u8) -> Option<NodeId> {
        self.edges(node)
            .iter()
            .find(|(m, _)| m.contains(digit))
            .map(|&(_, t)| t)
    }

    pub fn contains(&self, seq: &DigitSequence) -> bool {
        let Some(mut node) = self.initial else { return false };
        for d in seq.digits() {
            match self.child(node, d) {
                Some(next) => node = next,
                None => return false,
            }
        }
        self.can_terminate(node)
    }

    /// Number of accepted sequences.
    pub fn sequence_count(&self) -> u64 {
        let Some(init) = self.initial else { return 0 };
        let mut memo = HashMap::new();
        self.count_node(init, &mut memo)
    }

    fn count_node(&self, node: NodeId, memo: &mut HashMap<NodeId, u64>) -> u64 {
        if let Some(&n) = memo.get(&node) {
            return n;
        }
        let mut count = u64::from(self.can_terminate(node));
        for &(mask, target) in self.edges(node) {
            count += u64::from(mask.len()) * self.count_node(target, memo);
        }
        memo.insert(node, count);
        count
    }

    /// Length of the shortest accepted sequence.
    pub fn min_length(&self) -> Option<usize> {
        self.initial.map(|init| {
            let mut memo = HashMap::new();
            self.min_len_node(init, &mut memo)
        })
    }

    fn min_len_node(&self, node: NodeId, memo: &mut HashMap<NodeId, usize>) -> usize {
        if let Some(&n) = memo.get(&node) {
            return n;
        }
        let len = if self.can_terminate(node) {
            0
        } else {
            1 + self
                .edges(node)
                .iter()
                .map(|&(_, t)| self.min_len_node(t, memo))
                .min()
                .expect("node with no terminal descendant")
        };
        memo.insert(node, len);
        len
    }

    /// Length of the longest accepted sequence.
    pub fn max_length(&self) -> Option<usize> {
        self.initial.map(|init| {
            let mut memo = HashMap::new();
            self.max_len_node(init, &mut memo)
        })
    }

    fn max_len_node(&self, node: NodeId, memo: &mut HashMap<NodeId, usize>) -> usize {
        if let Some(&n) = memo.get(&node) {
            return n;
        }
        let deeper = self
            .edges(node)
            .iter()
            .map(|&(_, t)| 1 + self.max_len_node(t, memo))
            .max();
        let len = deeper.unwrap_or(0);
        memo.insert(node, len);
        len
    }

    /// The language union of two trees, as a fresh hash-consed tree.
    pub fn union(&self, other: &RangeTree) -> RangeTree {
        if self.is_empty() && other.is_empty() {
            return RangeTree::empty();
        }
        let mut merge = Merge {
            a: self,
            b: other,
            builder: TreeBuilder::default(),
            memo: HashMap::new(),
        };
        let initial = merge.node(self.initial, other.initial);
        merge.builder.finish(Some(initial))
    }

    /// The sequences of `other` that have a prefix accepted by `self`.
    ///
    /// Used to combine a prefix filter with arbitrary trailing lengths:
    /// once a prefix lands on an accepting node of `self`, every extension
    /// present in `other` is retained.
    pub fn retain_from(&self, other: &RangeTree) -> RangeTree {
        let (Some(a), Some(b)) = (self.initial, other.initial) else {
            return RangeTree::empty();
        };
        let mut retain = Retain {
            a: self,
            b: other,
            builder: TreeBuilder::default(),
            memo: HashMap::new(),
            copies: HashMap::new(),
        };
        let initial = retain.node(a, b);
        retain.builder.finish(initial)
    }

    /// Decomposes the tree into disjoint minimal range specifications, one
    /// per root-to-acceptance mask path, in deterministic preorder.
    pub fn specs(&self) -> Vec<RangeSpec> {
        let mut out = Vec::new();
        let Some(init) = self.initial else { return out };
        let mut path = Vec::new();
        self.collect_specs(init, &mut path, &mut out);
        out
    }

    fn collect_specs(&self, node: NodeId, path: &mut Vec<DigitMask>, out: &mut Vec<RangeSpec>) {
        if self.can_terminate(node) {
            out.push(RangeSpec::from_masks(path.iter().copied()));
        }
        for &(mask, target) in self.edges(node) {
            path.push(mask);
            self.collect_specs(target, path, out);
            path.pop();
        }
    }

    /// Reachable nodes in deterministic preorder.
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut order = Vec::new();
        let Some(init) = self.initial else { return order };
        let mut visited = vec![false; self.nodes.len()];
        self.preorder_walk(init, &mut visited, &mut order);
        order
    }

    fn preorder_walk(&self, node: NodeId, visited: &mut [bool], order: &mut Vec<NodeId>) {
        if visited[node.index()] {
            return;
        }
        visited[node.index()] = true;
        order.push(node);
        for &(_, target) in self.edges(node) {
            self.preorder_walk(target, visited, order);
        }
    }

    pub fn accept<V: RangeTreeVisitor>(&self, visitor: &mut V) {
        for node in self.preorder() {
            for &(mask, target) in self.edges(node) {
                visitor.visit(node, mask, target);
            }
        }
    }
}

#[derive(Default)]
struct TreeBuilder {
    nodes: Vec<NodeData>,
    interned: HashMap<NodeData, NodeId>,
}

impl TreeBuilder {
    fn intern(&mut self, terminal: bool, edges: Vec<(DigitMask, NodeId)>) -> NodeId {
        let data = NodeData { terminal, edges };
        if let Some(&id) = self.interned.get(&data) {
            return id;
        }
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(data.clone());
        self.interned.insert(data, id);
        id
    }

    fn finish(self, initial: Option<NodeId>) -> RangeTree {
        match initial {
            Some(_) => RangeTree { nodes: self.nodes, initial },
            None => RangeTree::empty(),
        }
    }
}

/// Groups per-digit children into mask edges, one edge per distinct child,
/// ordered by smallest digit.
fn group_edges(children: [Option<NodeId>; 10]) -> Vec<(DigitMask, NodeId)> {
    let mut edges: Vec<(DigitMask, NodeId)> = Vec::new();
    for (d, child) in children.into_iter().enumerate() {
        let Some(child) = child else { continue };
        match edges.iter_mut().find(|(_, c)| *c == child) {
            Some((m, _)) => *m = m.with(d as u8),
            None => edges.push((DigitMask::single(d as u8), child)),
        }
    }
    edges
}

fn build_state(
    state: &BTreeSet<RangeSpec>,
    builder: &mut TreeBuilder,
    memo: &mut HashMap<BTreeSet<RangeSpec>, NodeId>,
) -> NodeId {
    if let Some(&id) = memo.get(state) {
        return id;
    }
    let terminal = state.iter().any(|s| s.is_empty());
    let mut children = [None; 10];
    for d in 0..10u8 {
        let next: BTreeSet<RangeSpec> = state
            .iter()
            .filter(|s| !s.is_empty() && s.mask(0).contains(d))
            .map(|s| s.last(s.len() - 1))
            .collect();
        if !next.is_empty() {
            children[d as usize] = Some(build_state(&next, builder, memo));
        }
    }
    let id = builder.intern(terminal, group_edges(children));
    memo.insert(state.clone(), id);
    id
}

struct Merge<'a> {
    a: &'a RangeTree,
    b: &'a RangeTree,
    builder: TreeBuilder,
    memo: HashMap<(Option<NodeId>, Option<NodeId>), NodeId>,
}

impl Merge<'_> {
    fn node(&mut self, a: Option<NodeId>, b: Option<NodeId>) -> NodeId {
        debug_assert!(a.is_some() || b.is_some());
        if let Some(&id) = self.memo.get(&(a, b)) {
            return id;
        }
        let terminal = a.is_some_and(|n| self.a.can_terminate(n))
            || b.is_some_and(|n| self.b.can_terminate(n));
        let mut children = [None; 10];
        for d in 0..10u8 {
            let ca = a.and_then(|n| self.a.child(n, d));
            let cb = b.and_then(|n| self.b.child(n, d));
            if ca.is_some() || cb.is_some() {
                children[d as usize] = Some(self.node(ca, cb));
            }
        }
        let id = self.builder.intern(terminal, group_edges(children));
        self.memo.insert((a, b), id);
        id
    }
}

struct Retain<'a> {
    a: &'a RangeTree,
    b: &'a RangeTree,
    builder: TreeBuilder,
    memo: HashMap<(NodeId, NodeId), Option<NodeId>>,
    copies: HashMap<NodeId, NodeId>,
}

impl Retain<'_> {
    fn node(&mut self, a: NodeId, b: NodeId) -> Option<NodeId> {
        if let Some(&id) = self.memo.get(&(a, b)) {
            return id;
        }
        let id = if self.a.can_terminate(a) {
            // The prefix is accepted here; everything below `b` survives.
            Some(self.copy(b))
        } else {
            let mut children = [None; 10];
            for d in 0..10u8 {
                if let (Some(ca), Some(cb)) = (self.a.child(a, d), self.b.child(b, d)) {
                    children[d as usize] = self.node(ca, cb);
                }
            }
            let edges = group_edges(children);
            if edges.is_empty() {
                None
            } else {
                Some(self.builder.intern(false, edges))
            }
        };
        self.memo.insert((a, b), id);
        id
    }

    fn copy(&mut self, b: NodeId) -> NodeId {
        if let Some(&id) = self.copies.get(&b) {
            return id;
        }
        let edges = self
            .b
            .edges(b)
            .to_vec()
            .into_iter()
            .map(|(mask, target)| (mask, self.copy(target)))
            .collect();
        let id = self.builder.intern(self.b.can_terminate(b), edges);
        self.copies.insert(b, id);
        id
    }
}
