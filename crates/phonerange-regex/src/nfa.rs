//! Graph form of a range tree used during regex synthesis.
//!
//! Nodes are plain ids with `INITIAL` and `TERMINAL` fixed; adjacency is
//! insertion-ordered so collapse output is deterministic. Acceptance at an
//! interior node is a node flag, not an epsilon edge. Parallel edges
//! between the same pair of nodes merge into a disjunctive group.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use phonerange_core::{NodeId, RangeTree};

use crate::edge::Edge;

pub(crate) const INITIAL: u32 = 0;
pub(crate) const TERMINAL: u32 = 1;

pub(crate) struct Nfa {
    /// source -> target -> edge, both levels in insertion order.
    adjacency: IndexMap<u32, IndexMap<u32, Edge>>,
    /// Interior nodes where an accepted walk may end.
    terminating: HashSet<u32>,
    next_id: u32,
}

impl Nfa {
    pub(crate) fn new() -> Nfa {
        Nfa {
            adjacency: IndexMap::new(),
            terminating: HashSet::new(),
            next_id: 2,
        }
    }

    /// Builds the graph of a non-empty tree. The tree must not accept the
    /// empty sequence; the generator strips it beforehand.
    pub(crate) fn from_tree(tree: &RangeTree) -> Nfa {
        let init = tree.initial().expect("empty tree has no graph form");
        debug_assert!(!tree.can_terminate(init));
        let mut nfa = Nfa::new();
        let mut ids: HashMap<NodeId, u32> = HashMap::new();
        ids.insert(init, INITIAL);
        for node in tree.preorder() {
            let source = nfa.map_node(tree, node, &mut ids);
            for &(mask, target) in tree.edges(node) {
                let target = nfa.map_node(tree, target, &mut ids);
                nfa.add_edge(source, target, Edge::simple(mask));
            }
        }
        nfa
    }

    fn map_node(&mut self, tree: &RangeTree, node: NodeId, ids: &mut HashMap<NodeId, u32>) -> u32 {
        if let Some(&id) = ids.get(&node) {
            return id;
        }
        // The canonical terminal is the accepting node with no out-edges.
        let id = if tree.edges(node).is_empty() {
            TERMINAL
        } else {
            let id = self.next_id;
            self.next_id += 1;
            if tree.can_terminate(node) {
                self.terminating.insert(id);
            }
            id
        };
        ids.insert(node, id);
        id
    }

    pub(crate) fn fresh_node(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub(crate) fn add_edge(&mut self, source: u32, target: u32, edge: Edge) {
        let slot = self.adjacency.entry(source).or_default();
        match slot.shift_remove(&target) {
            None => {
                slot.insert(target, edge);
            }
            Some(existing) => {
                let members = match existing {
                    Edge::Group { members, optional: false } => {
                        let mut members = members;
                        members.push(edge);
                        members
                    }
                    other => vec![other, edge],
                };
                slot.insert(target, Edge::group(members, false));
            }
        }
    }

    pub(crate) fn out_edges(&self, node: u32) -> Vec<(u32, &Edge)> {
        self.adjacency
            .get(&node)
            .map(|slot| slot.iter().map(|(&t, e)| (t, e)).collect())
            .unwrap_or_default()
    }

    pub(crate) fn in_edges(&self, node: u32) -> Vec<(u32, &Edge)> {
        self.adjacency
            .iter()
            .filter_map(|(&s, slot)| slot.get(&node).map(|e| (s, e)))
            .collect()
    }

    pub(crate) fn can_terminate(&self, node: u32) -> bool {
        self.terminating.contains(&node)
    }

    pub(crate) fn clear_terminating(&mut self, node: u32) {
        self.terminating.remove(&node);
    }

    pub(crate) fn remove_edge(&mut self, source: u32, target: u32) {
        if let Some(slot) = self.adjacency.get_mut(&source) {
            slot.shift_remove(&target);
        }
    }

    /// Deletes a node with every edge touching it.
    pub(crate) fn remove_node(&mut self, node: u32) {
        self.adjacency.shift_remove(&node);
        for (_, slot) in self.adjacency.iter_mut() {
            slot.shift_remove(&node);
        }
        self.terminating.remove(&node);
    }

    /// Repoints every in-edge of `from` at `to`, then deletes `from`.
    pub(crate) fn splice(&mut self, from: u32, to: u32) {
        let redirected: Vec<(u32, Edge)> = self
            .adjacency
            .iter_mut()
            .filter_map(|(&s, slot)| slot.shift_remove(&from).map(|e| (s, e)))
            .collect();
        for (source, edge) in redirected {
            self.add_edge(source, to, edge);
        }
        self.remove_node(from);
    }

    /// All nodes reachable from INITIAL, in deterministic order.
    fn reachable(&self, skip: Option<u32>) -> Vec<u32> {
        let mut seen = vec![INITIAL];
        let mut queue = vec![INITIAL];
        while let Some(node) = queue.pop() {
            for (target, _) in self.out_edges(node) {
                if Some(target) != skip && !seen.contains(&target) {
                    seen.push(target);
                    queue.push(target);
                }
            }
        }
        seen
    }

    /// Reachable nodes other than INITIAL and TERMINAL.
    pub(crate) fn interior_nodes(&self) -> Vec<u32> {
        self.reachable(None)
            .into_iter()
            .filter(|&n| n != INITIAL && n != TERMINAL)
            .collect()
    }

    /// True if some accepted walk avoids `node` entirely.
    fn accepts_without(&self, node: u32) -> bool {
        self.reachable(Some(node))
            .iter()
            .any(|&n| n == TERMINAL || self.can_terminate(n))
    }

    /// Collapses the whole graph into one edge.
    ///
    /// `cut_candidates` limits which nodes may act as cut points: a cut is
    /// a node every accepted walk passes through, and the graph factors
    /// into a sequence of regions at its cuts (the suffix after an
    /// accepting cut is optional). Within a region, expansion is a plain
    /// recursive walk producing groups of alternatives.
    pub(crate) fn collapse(&self, cut_candidates: &HashSet<u32>) -> Edge {
        let cuts = self.ordered_cuts(cut_candidates);
        let mut boundaries = vec![INITIAL];
        boundaries.extend(&cuts);
        boundaries.push(TERMINAL);

        let mut expr: Option<Edge> = None;
        for pair in boundaries.windows(2).rev() {
            let (from, to) = (pair[0], pair[1]);
            let segment = self.expand(from, to, &mut HashMap::new());
            expr = Some(match expr {
                None => segment,
                Some(tail) => {
                    let tail = if self.can_terminate(to) { tail.optional() } else { tail };
                    segment.concat(tail)
                }
            });
        }
        expr.expect("collapse of a graph with no regions")
    }

    /// Cut nodes in the order every accepted walk visits them.
    fn ordered_cuts(&self, candidates: &HashSet<u32>) -> Vec<u32> {
        if candidates.is_empty() {
            return Vec::new();
        }
        // Every cut lies on every accepted walk, so any single walk from
        // INITIAL to TERMINAL visits all of them in their shared order.
        let mut walk = Vec::new();
        let mut node = INITIAL;
        while node != TERMINAL {
            let out = self.out_edges(node);
            node = out.first().expect("dead-end walk before TERMINAL").0;
            walk.push(node);
        }
        walk.into_iter()
            .filter(|&n| {
                n != TERMINAL && candidates.contains(&n) && !self.accepts_without(n)
            })
            .collect()
    }

    /// All alternatives from `node` to `stop`, as one edge. An accepting
    /// interior node makes its continuation optional.
    fn expand(&self, node: u32, stop: u32, memo: &mut HashMap<u32, Edge>) -> Edge {
        if let Some(done) = memo.get(&node) {
            return done.clone();
        }
        let mut alternatives = Vec::new();
        for (target, edge) in self.out_edges(node) {
            if target == stop {
                alternatives.push(edge.clone());
            } else {
                let rest = self.expand(target, stop, memo);
                let rest = if self.can_terminate(target) { rest.optional() } else { rest };
                alternatives.push(edge.clone().concat(rest));
            }
        }
        let expr = match alternatives.len() {
            0 => panic!("dead-end node {node} inside a region"),
            1 => alternatives.pop().unwrap(),
            _ => Edge::group(alternatives, false),
        };
        memo.insert(node, expr.clone());
        expr
    }
}
