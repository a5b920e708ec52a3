//! Tests for digit sequences.

use crate::digits::DigitSequence;
use crate::error::ParseError;

fn seq(s: &str) -> DigitSequence {
    s.parse().unwrap()
}

#[test]
fn parse_and_display() {
    assert_eq!(seq("").to_string(), "");
    assert_eq!(seq("0").to_string(), "0");
    assert_eq!(seq("007").to_string(), "007");
    assert_eq!(seq("123456789012345678").to_string(), "123456789012345678");
}

#[test]
fn parse_rejects_non_digits() {
    assert_eq!(
        "12a".parse::<DigitSequence>(),
        Err(ParseError::InvalidCharacter { ch: 'a', pos: 2 })
    );
    assert!("1 2".parse::<DigitSequence>().is_err());
}

#[test]
fn parse_rejects_over_18_digits() {
    assert_eq!(
        "1234567890123456789".parse::<DigitSequence>(),
        Err(ParseError::TooLong { len: 19 })
    );
}

#[test]
fn leading_zeros_are_significant() {
    assert_ne!(seq("007"), seq("7"));
    assert_eq!(seq("007").len(), 3);
}

#[test]
fn accessors() {
    let s = seq("0123");
    assert_eq!(s.len(), 4);
    assert_eq!(s.get(0), 0);
    assert_eq!(s.get(3), 3);
    assert_eq!(s.digits().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
    assert_eq!(s.first(2), seq("01"));
    assert_eq!(s.last(2), seq("23"));
    assert_eq!(s.first(0), DigitSequence::EMPTY);
}

#[test]
fn extend_concatenates() {
    assert_eq!(seq("12").extend(&seq("034")), seq("12034"));
    assert_eq!(seq("").extend(&seq("5")), seq("5"));
    assert_eq!(seq("5").extend(&seq("")), seq("5"));
}

#[test]
#[should_panic(expected = "over 18 digits")]
fn extend_past_limit_panics() {
    let nine = seq("123456789");
    let ten = seq("1234567890");
    nine.extend(&ten).extend(&seq("1"));
}

#[test]
fn order_is_lexicographic_with_prefixes_first() {
    assert!(seq("1") < seq("10"));
    assert!(seq("10") < seq("2"));
    assert!(seq("") < seq("0"));
    assert!(seq("09") < seq("1"));
    assert!(seq("19999") < seq("2"));
}

#[test]
fn order_is_strict_and_transitive() {
    // Enumerate a small universe and check consistency pairwise.
    let mut all = vec![DigitSequence::EMPTY];
    for a in 0..3u8 {
        let s1 = DigitSequence::from_digits([a]);
        all.push(s1);
        for b in 0..3u8 {
            let s2 = s1.push(b);
            all.push(s2);
            for c in 0..3u8 {
                all.push(s2.push(c));
            }
        }
    }
    let mut sorted = all.clone();
    sorted.sort();
    for w in sorted.windows(2) {
        assert!(w[0] < w[1], "{:?} !< {:?}", w[0], w[1]);
    }
    // Rank order agrees with the comparator.
    for w in sorted.windows(2) {
        assert!(w[0].distance(&w[1]) > 0);
    }
}

#[test]
fn distance_is_antisymmetric() {
    let pairs = [
        (seq(""), seq("0")),
        (seq("1"), seq("10")),
        (seq("123"), seq("2")),
        (seq("999"), seq("999")),
    ];
    for (a, b) in pairs {
        assert_eq!(a.distance(&b), -b.distance(&a));
    }
}

#[test]
fn distance_counts_sequences_between() {
    // Adjacent in the total order: nothing strictly between.
    assert_eq!(seq("").distance(&seq("0")), 1);
    assert_eq!(seq("1").distance(&seq("10")), 1);
    assert_eq!(seq("10").distance(&seq("100")), 1);
    // "120" .. "122" lie strictly between "12" and "123" at depth 3, plus
    // their subtrees; same-length neighbours differ by exactly one.
    let d = seq("120").distance(&seq("121"));
    assert!(d > 0);
    assert_eq!(seq("121").distance(&seq("122")), d);
    assert_eq!(seq("0").distance(&seq("0")), 0);
}
