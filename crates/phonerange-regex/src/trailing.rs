//! Shared trailing any-digit paths.
//!
//! Branches of a range tree frequently end in the same run of any-digit
//! edges ("\d{3}" after every prefix). This pass detaches those runs,
//! expresses each branch's tail as an [`AnyPath`], and re-materializes the
//! common factors once, so the writer emits the shared suffix a single
//! time instead of per branch.

use std::collections::BTreeMap;

use crate::any_path::AnyPath;
use crate::edge::Edge;
use crate::nfa::{INITIAL, Nfa, TERMINAL};

/// Rewrites the graph in place. Returns the chain nodes materialized for
/// shared tails (collapse cut candidates), or `None` when no branch ends
/// in a detachable any-digit run.
pub(crate) fn optimize(nfa: &mut Nfa) -> Option<Vec<u32>> {
    let (entries, interior) = gather_tails(nfa)?;

    // Detach the consumed subgraph: interior tail nodes disappear, entry
    // nodes lose their single any-digit out-edge and fold their
    // acceptance flag into the path's optional bit.
    for node in interior {
        nfa.remove_node(node);
    }
    for &entry in entries.keys() {
        let targets: Vec<u32> = nfa.out_edges(entry).iter().map(|&(t, _)| t).collect();
        for target in targets {
            nfa.remove_edge(entry, target);
        }
        nfa.clear_terminating(entry);
    }

    let mut entries = entries;
    let mut attach = TERMINAL;
    let mut materialized = Vec::new();
    while !entries.is_empty() {
        let factor = *entries
            .values()
            .min_by_key(|p| (p.min_len(), p.bits()))
            .expect("non-empty entry set");
        let Some(divided) = divide_all(&entries, factor) else {
            // No common factor left; each branch reconnects directly.
            for (entry, path) in std::mem::take(&mut entries) {
                nfa.add_edge(entry, attach, Edge::from_any_path(path));
            }
            break;
        };
        let head = if divided.len() == 1 && divided.contains_key(&INITIAL) {
            INITIAL
        } else {
            let head = nfa.fresh_node();
            materialized.push(head);
            head
        };
        nfa.add_edge(head, attach, Edge::from_any_path(factor));
        entries = BTreeMap::new();
        for (entry, remainder) in divided {
            if remainder.is_zero() {
                if entry != head {
                    nfa.splice(entry, head);
                }
            } else {
                entries.insert(entry, remainder);
            }
        }
        attach = head;
    }
    Some(materialized)
}

/// Walks backward from TERMINAL over non-optional any-digit edges,
/// accumulating the tail path of every node on the way. Entry nodes (a
/// non-any-digit in-edge, or INITIAL) stop the walk; everything between
/// them and TERMINAL is interior and will be consumed.
fn gather_tails(nfa: &Nfa) -> Option<(BTreeMap<u32, AnyPath>, Vec<u32>)> {
    let mut entries = BTreeMap::new();
    let mut interior = Vec::new();
    let mut queue = vec![(TERMINAL, AnyPath::ZERO)];
    while let Some((node, path)) = queue.pop() {
        for (source, edge) in nfa.in_edges(node) {
            if !is_tail_edge(edge) {
                continue;
            }
            // An any-digit out-edge is the node's only out-edge, so each
            // source is reached exactly once.
            let mut tail = path.join(AnyPath::single(1));
            if nfa.can_terminate(source) {
                tail = tail.make_optional();
            }
            if source == INITIAL || has_entry_edge(nfa, source) {
                entries.insert(source, tail);
            } else {
                interior.push(source);
                queue.push((source, tail));
            }
        }
    }
    (!entries.is_empty()).then_some((entries, interior))
}

fn is_tail_edge(edge: &Edge) -> bool {
    matches!(edge, Edge::Simple { mask, optional: false } if mask.is_all())
}

fn has_entry_edge(nfa: &Nfa, node: u32) -> bool {
    nfa.in_edges(node).iter().any(|(_, e)| !is_tail_edge(e))
}

/// Factors `factor` out of every entry; `None` unless all divide.
fn divide_all(
    entries: &BTreeMap<u32, AnyPath>,
    factor: AnyPath,
) -> Option<BTreeMap<u32, AnyPath>> {
    entries
        .iter()
        .map(|(&n, &p)| p.factor(factor).map(|rem| (n, rem)))
        .collect()
}
