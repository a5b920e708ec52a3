//! Repeated-subgraph extraction.
//!
//! A node with several incoming edges would have its whole subtree
//! rendered once per incoming path. When the duplicated weight is large
//! enough, splitting the tree at that node and regexing the pieces
//! separately shrinks the output: the language factors into
//! `prefix · subgroup ∪ rest`.

use std::collections::HashMap;

use phonerange_core::{DigitMask, NodeId, RangeSpec, RangeTree};

/// A tree split at a bridging node: `prefix` reaches the node, `subgroup`
/// is its subtree, `rest` is every accepted path avoiding it.
#[derive(Debug)]
pub struct Subgroup {
    pub prefix: RangeTree,
    pub subgroup: RangeTree,
    pub rest: RangeTree,
}

/// Picks the bridging node with the highest duplicated weight, if any.
///
/// Candidate score is `subgraph_weight * (in_order - 1)`: the rendered
/// size of the node's subtree times the number of extra copies the writer
/// would emit. Single-entry nodes score zero. Ties break toward the
/// earlier preorder position. Extraction also requires some accepted path
/// to avoid the node, otherwise the split is the whole tree.
pub fn extract(tree: &RangeTree) -> Option<Subgroup> {
    let init = tree.initial()?;
    let order = tree.preorder();

    let mut in_order: HashMap<NodeId, u64> = HashMap::new();
    for &node in &order {
        for &(_, target) in tree.edges(node) {
            *in_order.entry(target).or_insert(0) += 1;
        }
    }

    // Preorder is not bottom-up on a hash-consed DAG (a shared node can
    // precede a later parent), so weights are memoized recursively.
    let mut weights: HashMap<NodeId, u64> = HashMap::new();

    let mut best: Option<(u64, NodeId)> = None;
    for &node in &order {
        if node == init || tree.edges(node).is_empty() {
            continue;
        }
        let entries = in_order.get(&node).copied().unwrap_or(0);
        let score = subtree_weight(tree, node, &mut weights) * entries.saturating_sub(1);
        if score > 0 && best.is_none_or(|(top, _)| score > top) {
            best = Some((score, node));
        }
    }
    let (_, bridge) = best?;

    let rest_specs = accepted_specs(tree, init, Some(bridge));
    if rest_specs.is_empty() {
        return None;
    }
    Some(Subgroup {
        prefix: RangeTree::from_specs(prefix_specs(tree, init, bridge)),
        subgroup: RangeTree::from_specs(accepted_specs(tree, bridge, None)),
        rest: RangeTree::from_specs(rest_specs),
    })
}

/// Rendered size of a node's subtree, one visit per distinct node.
fn subtree_weight(tree: &RangeTree, node: NodeId, memo: &mut HashMap<NodeId, u64>) -> u64 {
    if let Some(&weight) = memo.get(&node) {
        return weight;
    }
    let weight = tree
        .edges(node)
        .iter()
        .map(|&(mask, target)| token_weight(mask) + subtree_weight(tree, target, memo))
        .sum();
    memo.insert(node, weight);
    weight
}

/// Rendered size estimate of one mask token.
fn token_weight(mask: DigitMask) -> u64 {
    if mask.is_all() {
        2
    } else {
        mask.to_string().len() as u64
    }
}

/// Mask paths from `from` to every acceptance point, skipping `avoid`.
fn accepted_specs(tree: &RangeTree, from: NodeId, avoid: Option<NodeId>) -> Vec<RangeSpec> {
    let mut out = Vec::new();
    let mut path = Vec::new();
    collect_accepted(tree, from, avoid, &mut path, &mut out);
    out
}

fn collect_accepted(
    tree: &RangeTree,
    node: NodeId,
    avoid: Option<NodeId>,
    path: &mut Vec<DigitMask>,
    out: &mut Vec<RangeSpec>,
) {
    if tree.can_terminate(node) {
        out.push(RangeSpec::from_masks(path.iter().copied()));
    }
    for &(mask, target) in tree.edges(node) {
        if Some(target) == avoid {
            continue;
        }
        path.push(mask);
        collect_accepted(tree, target, avoid, path, out);
        path.pop();
    }
}

/// Mask paths from `from` down to `to`.
fn prefix_specs(tree: &RangeTree, from: NodeId, to: NodeId) -> Vec<RangeSpec> {
    let mut out = Vec::new();
    let mut path = Vec::new();
    collect_prefixes(tree, from, to, &mut path, &mut out);
    out
}

fn collect_prefixes(
    tree: &RangeTree,
    node: NodeId,
    to: NodeId,
    path: &mut Vec<DigitMask>,
    out: &mut Vec<RangeSpec>,
) {
    if node == to {
        out.push(RangeSpec::from_masks(path.iter().copied()));
        return;
    }
    for &(mask, target) in tree.edges(node) {
        path.push(mask);
        collect_prefixes(tree, target, to, path, out);
        path.pop();
    }
}
