//! Tests for trailing-path sharing.

use std::collections::HashSet;

use phonerange_core::{RangeSpec, RangeTree};
use regex_automata::meta::Regex;

use crate::nfa::Nfa;
use crate::trailing;
use crate::writer::EdgeWriter;

fn tree(specs: &[&str]) -> RangeTree {
    RangeTree::from_specs(specs.iter().map(|s| RangeSpec::parse(s).unwrap()))
}

/// Runs the pass and collapses to a regex, factoring at the shared tails.
fn optimized_regex(specs: &[&str]) -> (Option<usize>, String) {
    let t = tree(specs);
    let mut nfa = Nfa::from_tree(&t);
    let materialized = trailing::optimize(&mut nfa);
    let cuts: HashSet<u32> = materialized.iter().flatten().copied().collect();
    let count = materialized.map(|m| m.len());
    let edge = nfa.collapse(&cuts);
    (count, EdgeWriter::new().to_regex(&edge))
}

fn assert_language(specs: &[&str], regex: &str) {
    let t = tree(specs);
    let re = Regex::new(&format!("^(?:{regex})$")).unwrap();
    let mut probes: Vec<String> = Vec::new();
    for spec in t.specs() {
        for base in [spec.min_sequence(), spec.max_sequence()] {
            let s = base.to_string();
            probes.push(s.clone());
            probes.push(format!("{s}0"));
            if !s.is_empty() {
                probes.push(s[..s.len() - 1].to_string());
            }
            for i in 0..s.len() {
                for d in b'0'..=b'9' {
                    let mut bytes = s.clone().into_bytes();
                    bytes[i] = d;
                    probes.push(String::from_utf8(bytes).unwrap());
                }
            }
        }
    }
    for probe in probes {
        let expected = t.contains(&probe.parse().unwrap());
        assert_eq!(re.is_match(&probe), expected, "input {probe:?} against {regex:?}");
    }
}

#[test]
fn no_any_digit_tail_is_a_no_op() {
    let t = tree(&["12", "34"]);
    let mut nfa = Nfa::from_tree(&t);
    assert_eq!(trailing::optimize(&mut nfa), None);
    let edge = nfa.collapse(&HashSet::new());
    assert_eq!(EdgeWriter::new().to_regex(&edge), "12|34");
}

#[test]
fn shared_tail_is_emitted_once() {
    let specs = ["123xxx", "123xxxx", "145xxx"];
    let (count, regex) = optimized_regex(&specs);
    assert_eq!(regex, "1(?:23\\d?|45)\\d{3}");
    assert_eq!(count, Some(2));
    assert_language(&specs, &regex);
}

#[test]
fn whole_tree_tail_starts_at_the_initial_node() {
    let (count, regex) = optimized_regex(&["xxx"]);
    assert_eq!(regex, "\\d{3}");
    assert_eq!(count, Some(0));
}

#[test]
fn acceptance_inside_the_tail_becomes_the_optional_bit() {
    let specs = ["1", "1x"];
    let (_, regex) = optimized_regex(&specs);
    assert_eq!(regex, "1\\d?");
    assert_language(&specs, &regex);
}

#[test]
fn staggered_tails_factor_stepwise() {
    // Splicing reattaches the "1" branch behind the "2" branch, so the
    // alternatives come out in reattachment order.
    let specs = ["1xx", "2xxx"];
    let (count, regex) = optimized_regex(&specs);
    assert_eq!(regex, "(?:2\\d|1)\\d\\d");
    assert_eq!(count, Some(2));
    assert_language(&specs, &regex);
}

#[test]
fn incompatible_tails_reconnect_directly() {
    // {2} after "2" cannot absorb the shorter {1,2} after "1", so both
    // branches reattach as-is.
    let specs = ["1x", "1xx", "2xx"];
    let (count, regex) = optimized_regex(&specs);
    assert_eq!(count, Some(0));
    assert_eq!(regex, "1\\d\\d?|2\\d\\d");
    assert_language(&specs, &regex);
}

#[test]
fn accepting_branch_into_a_shared_tail() {
    // "4" accepts before feeding the tail "3x" also enters; the shared
    // node keeps both branches and the acceptance survives as a group.
    let specs = ["3x", "4", "4xx"];
    let (count, regex) = optimized_regex(&specs);
    assert_eq!(count, Some(1));
    assert_eq!(regex, "4(?:\\d\\d)?|3\\d");
    assert_language(&specs, &regex);
}

#[test]
fn tail_entry_with_mixed_in_edges_keeps_its_branches() {
    let specs = ["1xxx", "29xx"];
    let (_, regex) = optimized_regex(&specs);
    assert_eq!(regex, "(?:1\\d|29)\\d\\d");
    assert_language(&specs, &regex);
}
