//! Tests for range specification parsing and printing.

use crate::error::ParseError;
use crate::mask::DigitMask;
use crate::spec::RangeSpec;

fn spec(s: &str) -> RangeSpec {
    RangeSpec::parse(s).unwrap()
}

fn seq(s: &str) -> crate::digits::DigitSequence {
    s.parse().unwrap()
}

#[test]
fn printing_is_canonical() {
    assert_eq!(spec("012[0-9]").to_string(), "012x");
    assert_eq!(spec("0_12[3-8]_xxx").to_string(), "012[3-8]xxx");
    assert_eq!(spec("[0123456789]").to_string(), "x");
    assert_eq!(spec("[45]").to_string(), "[45]");
    assert_eq!(spec("").to_string(), "");
}

#[test]
fn printing_roundtrips() {
    for s in ["", "007", "x", "1[2-5]x", "[04-7][89]2", "012[3-8]xxxxxx"] {
        assert_eq!(spec(s).to_string(), s);
    }
}

#[test]
fn separators_are_dropped() {
    assert_eq!(spec("0_12_345"), spec("012345"));
    assert_eq!(spec("1_[2-4]_x"), spec("1[2-4]x"));
}

#[test]
fn misplaced_separators_are_rejected() {
    assert_eq!(RangeSpec::parse("_12"), Err(ParseError::MisplacedSeparator { pos: 0 }));
    assert_eq!(RangeSpec::parse("12_"), Err(ParseError::MisplacedSeparator { pos: 2 }));
    assert_eq!(RangeSpec::parse("1__2"), Err(ParseError::MisplacedSeparator { pos: 2 }));
}

#[test]
fn bracket_errors() {
    assert_eq!(
        RangeSpec::parse("1[2-"),
        Err(ParseError::UnterminatedBracket { pos: 1 })
    );
    assert_eq!(
        RangeSpec::parse("1[23"),
        Err(ParseError::UnterminatedBracket { pos: 1 })
    );
    assert_eq!(RangeSpec::parse("[]"), Err(ParseError::EmptyBracket { pos: 0 }));
    assert_eq!(
        RangeSpec::parse("[3-2]"),
        Err(ParseError::InvalidRange { lo: 3, hi: 2, pos: 1 })
    );
    assert_eq!(
        RangeSpec::parse("[3-3]"),
        Err(ParseError::InvalidRange { lo: 3, hi: 3, pos: 1 })
    );
    assert_eq!(
        RangeSpec::parse("[33]"),
        Err(ParseError::DuplicateDigit { digit: 3, pos: 2 })
    );
    assert_eq!(
        RangeSpec::parse("[2-42]"),
        Err(ParseError::DuplicateDigit { digit: 2, pos: 4 })
    );
    assert!(matches!(
        RangeSpec::parse("[x]"),
        Err(ParseError::InvalidCharacter { ch: 'x', .. })
    ));
}

#[test]
fn invalid_characters_and_length() {
    assert_eq!(
        RangeSpec::parse("12a"),
        Err(ParseError::InvalidCharacter { ch: 'a', pos: 2 })
    );
    assert_eq!(
        RangeSpec::parse("xxxxxxxxxxxxxxxxxxx"),
        Err(ParseError::TooLong { len: 19 })
    );
    assert!(RangeSpec::parse("xxxxxxxxxxxxxxxxxx").is_ok());
}

#[test]
fn matching() {
    let s = spec("12[3-5]x");
    assert!(s.matches(&seq("1241")));
    assert!(s.matches(&seq("1230")));
    assert!(!s.matches(&seq("1261")));
    assert!(!s.matches(&seq("124")));
    assert!(!s.matches(&seq("12411")));
    assert!(RangeSpec::empty().matches(&seq("")));
}

#[test]
fn bounds_and_count() {
    let s = spec("12[3-5]x");
    assert_eq!(s.min_sequence(), seq("1230"));
    assert_eq!(s.max_sequence(), seq("1259"));
    assert_eq!(s.sequence_count(), 30);
    assert_eq!(RangeSpec::empty().sequence_count(), 1);
    assert_eq!(spec("xxx").sequence_count(), 1000);
}

#[test]
fn bound_accessors_resolve_on_owned_values() {
    // Callers iterate owned specifications; on a by-value receiver the
    // prelude's `Ord::min` would shadow a `min()` inherent method, so the
    // accessors carry distinct names.
    for s in [spec("1[2-5]"), spec("xxx")] {
        assert_eq!(s.min_sequence().len(), s.len());
        assert_eq!(s.max_sequence().len(), s.len());
    }
}

#[test]
fn slicing_and_concatenation() {
    let s = spec("12[3-5]x");
    assert_eq!(s.first(2), spec("12"));
    assert_eq!(s.last(2), spec("[3-5]x"));
    assert_eq!(s.first(0), RangeSpec::empty());
    assert_eq!(spec("12").extend(&spec("[3-5]x")), s);
    assert_eq!(spec("12[3-5]").push(DigitMask::ALL), s);
}

#[test]
fn from_sequence_matches_only_that_sequence() {
    let s = RangeSpec::from_sequence(&seq("007"));
    assert_eq!(s.to_string(), "007");
    assert_eq!(s.sequence_count(), 1);
    assert!(s.matches(&seq("007")));
    assert!(!s.matches(&seq("006")));
}

#[test]
fn structural_order() {
    // A proper prefix sorts first.
    assert!(spec("1") < spec("1x"));
    assert!(spec("12") < spec("12x"));
    // Positions compare by smallest digit first.
    assert!(spec("1x") < spec("2"));
    assert!(spec("[09]") < spec("1"));
    // Same smallest digit: the raw bit pattern breaks the tie.
    assert!(spec("[23]") < spec("[29]"));
    assert!(spec("2") < spec("[23]"));
}

#[test]
fn order_is_not_min_order() {
    // "[09]" sorts before "1" even though min("[09]") = "0" < "1" agrees;
    // the divergence shows with overlapping sets: min("[19]") = "1" equals
    // min("1x"[..1]) yet the bit pattern decides.
    let a = spec("[19]");
    let b = spec("[12]");
    assert_eq!(a.min_sequence().first(1), b.min_sequence().first(1));
    assert!(b < a);
}
