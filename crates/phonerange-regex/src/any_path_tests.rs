//! Tests for any-path length sets.

use std::collections::BTreeSet;

use regex_automata::meta::Regex;

use crate::any_path::AnyPath;

fn lengths(mask: u32) -> BTreeSet<usize> {
    AnyPath::new(mask).lengths().collect()
}

#[test]
fn basics() {
    let p = AnyPath::new(0b1100);
    assert_eq!(p.min_len(), 2);
    assert_eq!(p.max_len(), 3);
    assert!(p.contains(2) && p.contains(3));
    assert!(!p.contains(0) && !p.contains(4));
    assert!(!p.is_optional());
    assert!(p.make_optional().is_optional());
    assert!(AnyPath::ZERO.is_zero());
    assert_eq!(AnyPath::single(4).bits(), 0b10000);
}

#[test]
fn join_adds_lengths() {
    // {1,2} . {2} = {3,4}
    assert_eq!(AnyPath::new(0b110).join(AnyPath::new(0b100)).bits(), 0b11000);
    // Joining the zero path is the identity.
    let p = AnyPath::new(0b1010);
    assert_eq!(p.join(AnyPath::ZERO), p);
    assert_eq!(AnyPath::ZERO.join(p), p);
}

#[test]
fn join_matches_naive_sums() {
    for a in 1u32..128 {
        for b in 1u32..128 {
            let expected: BTreeSet<usize> = lengths(a)
                .iter()
                .flat_map(|&x| lengths(b).iter().map(|&y| x + y).collect::<Vec<_>>())
                .collect();
            let joined: BTreeSet<usize> =
                AnyPath::new(a).join(AnyPath::new(b)).lengths().collect();
            assert_eq!(joined, expected, "join of {a:#b} and {b:#b}");
        }
    }
}

#[test]
fn factor_divides_exactly() {
    // {3,4} = {3} . {0,1}
    assert_eq!(
        AnyPath::new(0b11000).factor(AnyPath::new(0b1000)),
        Some(AnyPath::new(0b11))
    );
    // A path divided by itself leaves the zero path.
    let p = AnyPath::new(0b10110);
    assert_eq!(p.factor(p), Some(AnyPath::ZERO));
    // {3,5} = {3} . {0,2}: a gap in the remainder is fine.
    assert_eq!(
        AnyPath::new(0b101000).factor(AnyPath::new(0b1000)),
        Some(AnyPath::new(0b101))
    );
    // {3} cannot reach the shorter length in {2,3}.
    assert_eq!(AnyPath::new(0b1100).factor(AnyPath::new(0b1000)), None);
    // No shift set of {3,4} covers {3,4,6} exactly.
    assert_eq!(AnyPath::new(0b1011000).factor(AnyPath::new(0b11000)), None);
}

#[test]
fn factor_agrees_with_exhaustive_search() {
    for target in 2u32..128 {
        for f in 2u32..128 {
            let target_path = AnyPath::new(target);
            let f_path = AnyPath::new(f);
            let found = target_path.factor(f_path);
            match found {
                Some(rem) => assert_eq!(
                    f_path.join(rem),
                    target_path,
                    "bad remainder for {target:#b} / {f:#b}"
                ),
                None => {
                    for rem in 1u32..256 {
                        assert_ne!(
                            f_path.join(AnyPath::new(rem)),
                            target_path,
                            "missed remainder {rem:#b} for {target:#b} / {f:#b}"
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn regex_special_cases() {
    assert_eq!(AnyPath::new(0b10).to_regex("\\d"), "\\d");
    assert_eq!(AnyPath::new(0b11).to_regex("\\d"), "\\d?");
    assert_eq!(AnyPath::new(0b100).to_regex("\\d"), "\\d\\d");
    assert_eq!(AnyPath::new(0b110).to_regex("\\d"), "\\d\\d?");
    assert_eq!(AnyPath::new(0b111).to_regex("\\d"), "\\d{0,2}");
    assert_eq!(AnyPath::new(0b1000).to_regex("\\d"), "\\d{3}");
    assert_eq!(AnyPath::new(0b11000).to_regex("\\d"), "\\d{3,4}");
    assert_eq!(AnyPath::new(0b1100).to_regex("\\d"), "\\d{2,3}");
    assert_eq!(AnyPath::new(0b101).to_regex("\\d"), "(?:\\d\\d)?");
    assert_eq!(AnyPath::new(0b1010).to_regex("\\d"), "\\d(?:\\d\\d)?");
    assert_eq!(AnyPath::new(0b100010).to_regex("."), ".(?:.{4})?");
}

#[test]
fn regex_keeps_sparse_sets_sparse() {
    // Lengths {0,2,3,5,6,7}; a widened rendering would accept 1 or 4.
    let p = AnyPath::new(0b1110_1101);
    assert_eq!(p.to_regex("\\d"), "(?:\\d\\d(?:\\d(?:\\d{2,4})?)?)?");
}

#[test]
fn regex_accepts_exactly_the_length_set() {
    for mask in 2u32..512 {
        let pattern = format!("^(?:{})$", AnyPath::new(mask).to_regex("\\d"));
        let re = Regex::new(&pattern).unwrap();
        for len in 0..=12 {
            let input = "7".repeat(len);
            assert_eq!(
                re.is_match(&input),
                AnyPath::new(mask).contains(len),
                "mask {mask:#b}, length {len}, pattern {pattern}"
            );
        }
    }
}

#[test]
#[should_panic(expected = "no printable form")]
fn zero_path_has_no_regex() {
    let _ = AnyPath::ZERO.to_regex("\\d");
}
