//! Tests for subgroup extraction.

use phonerange_core::{RangeSpec, RangeTree};

use crate::subgroup;

fn tree(specs: &[&str]) -> RangeTree {
    RangeTree::from_specs(specs.iter().map(|s| RangeSpec::parse(s).unwrap()))
}

fn spec_strings(tree: &RangeTree) -> Vec<String> {
    tree.specs().iter().map(|s| s.to_string()).collect()
}

/// prefix · subgroup ∪ rest must be the original language.
fn assert_partition(original: &RangeTree, split: &subgroup::Subgroup) {
    let mut through = Vec::new();
    for p in split.prefix.specs() {
        for q in split.subgroup.specs() {
            through.push(p.extend(&q));
        }
    }
    let rebuilt = RangeTree::from_specs(through).union(&split.rest);
    assert_eq!(spec_strings(&rebuilt), spec_strings(original));
}

#[test]
fn no_candidate_on_a_single_path() {
    assert!(subgroup::extract(&tree(&["12345"])).is_none());
    assert!(subgroup::extract(&RangeTree::empty()).is_none());
}

#[test]
fn merged_edge_masks_are_one_entry() {
    // Digits 1 and 8 reach the same node through a single [18] edge, so
    // nothing is duplicated.
    assert!(subgroup::extract(&tree(&["1[2-5]67", "8[2-5]67"])).is_none());
}

#[test]
fn extraction_needs_an_avoiding_path() {
    // Every accepted sequence passes the shared node.
    assert!(subgroup::extract(&tree(&["1[2-5]67", "92[2-5]67"])).is_none());
}

#[test]
fn shared_subtree_is_extracted() {
    let t = tree(&["1[2-5]67", "92[2-5]67", "3"]);
    let split = subgroup::extract(&t).expect("a shared subtree");
    assert_eq!(spec_strings(&split.prefix), vec!["1", "92"]);
    assert_eq!(spec_strings(&split.subgroup), vec!["[2-5]67"]);
    assert_eq!(spec_strings(&split.rest), vec!["3"]);
    assert_partition(&t, &split);
}

#[test]
fn shared_node_ahead_of_a_later_parent() {
    // The "7x" node is first reached through the "0" branch, so it sits
    // before its second parent (the node after "12") in preorder; the
    // weight computation must not depend on that order.
    let t = tree(&["07x", "127x", "139"]);
    let split = subgroup::extract(&t).expect("a shared subtree");
    assert_eq!(spec_strings(&split.prefix), vec!["0", "12"]);
    assert_eq!(spec_strings(&split.subgroup), vec!["7x"]);
    assert_eq!(spec_strings(&split.rest), vec!["139"]);
    assert_partition(&t, &split);
}

#[test]
fn accepting_bridge_keeps_the_empty_suffix() {
    // The bridging node is itself an acceptance point, so the subgroup
    // accepts the empty sequence.
    let t = tree(&["17", "1789", "297", "29789", "4"]);
    let split = subgroup::extract(&t).expect("a shared subtree");
    assert_eq!(spec_strings(&split.prefix), vec!["17", "297"]);
    assert_eq!(spec_strings(&split.subgroup), vec!["", "89"]);
    assert_eq!(spec_strings(&split.rest), vec!["4"]);
    assert_partition(&t, &split);
}

#[test]
fn heavier_subtree_wins() {
    // The join in front of "[6-9]00x" carries more duplicated weight
    // than any other shared node.
    let t = tree(&["1[2-5][6-9]00x", "8[2-5][6-9]00x", "70", "90[6-9]00x"]);
    let split = subgroup::extract(&t).expect("a shared subtree");
    // The winning bridge is the node in front of "[6-9]00x".
    assert_eq!(spec_strings(&split.subgroup), vec!["[6-9]00x"]);
    assert_partition(&t, &split);
}
