//! ISBN codec integration tests

use proptest::prelude::*;
use rstest::rstest;
use shelfshare_core::isbn::{
    clean, convert_isbn10_to_isbn13, extract_isbns_from_text, is_valid, is_valid_isbn10,
    is_valid_isbn13, normalize_to_isbn13, IsbnError,
};

// === Cleaning ===

#[rstest]
#[case("978-0-13-235088-4", "9780132350884")]
#[case("0 306 40615 2", "0306406152")]
#[case("  0743273567  ", "0743273567")]
#[case("", "")]
#[case("   ", "")]
fn test_clean(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(clean(input), expected);
}

#[test]
fn test_clean_then_validate() {
    let cleaned = clean("978-0-13-235088-4");
    assert_eq!(cleaned, "9780132350884");
    assert!(is_valid_isbn13(&cleaned));
}

// === Validation ===

#[rstest]
#[case("0-13-235088-4", true)]
#[case("0306406152", true)]
#[case("080442957X", true)]
#[case("080442957x", true)] // Check character is case-insensitive
#[case("0-13-235088-5", false)] // Wrong check digit
#[case("030640615", false)] // Too short
#[case("03064061521", false)] // Too long
#[case("0000000000", false)] // All-zero
fn test_is_valid_isbn10(#[case] isbn: &str, #[case] expected: bool) {
    assert_eq!(is_valid_isbn10(isbn), expected, "ISBN-10: {}", isbn);
}

#[rstest]
#[case("978-0-13-235088-4", true)]
#[case("9780321125217", true)]
#[case("9780743273565", true)]
#[case("978-0-13-235088-5", false)] // Wrong check digit
#[case("978013235088", false)] // 12 digits
#[case("0000000000000", false)] // All-zero
fn test_is_valid_isbn13(#[case] isbn: &str, #[case] expected: bool) {
    assert_eq!(is_valid_isbn13(isbn), expected, "ISBN-13: {}", isbn);
}

#[test]
fn test_is_valid_accepts_both_forms() {
    assert!(is_valid("0-13-235088-4"));
    assert!(is_valid("978-0-13-235088-4"));
    assert!(!is_valid("0-13-235088-5"));
}

// === Normalization ===

#[rstest]
#[case("978-0-13-235088-4", Some("9780132350884"))]
#[case("0-13-235088-4", Some("9780132350884"))]
#[case("0743273567", Some("9780743273565"))]
#[case("0-13-235088-5", None)]
#[case("garbage", None)]
#[case("", None)]
fn test_normalize_to_isbn13(#[case] input: &str, #[case] expected: Option<&str>) {
    assert_eq!(normalize_to_isbn13(input).as_deref(), expected);
}

#[test]
fn test_normalize_is_idempotent() {
    for input in ["0-13-235088-4", "978-0-321-12521-7", "0743273567"] {
        let once = normalize_to_isbn13(input).unwrap();
        assert_eq!(normalize_to_isbn13(&once), Some(once.clone()));
    }
}

// === Conversion ===

#[test]
fn test_gatsby_round_trip() {
    let isbn13 = convert_isbn10_to_isbn13("0743273567").unwrap();
    assert_eq!(isbn13, "9780743273565");
    assert!(is_valid_isbn13(&isbn13));
}

#[test]
fn test_conversion_is_deterministic() {
    let a = convert_isbn10_to_isbn13("0306406152").unwrap();
    let b = convert_isbn10_to_isbn13("0306406152").unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_conversion_length_contract() {
    assert!(matches!(
        convert_isbn10_to_isbn13("123"),
        Err(IsbnError::InvalidLength { length: 3 })
    ));
    assert!(matches!(
        convert_isbn10_to_isbn13("9780743273565"),
        Err(IsbnError::InvalidLength { length: 13 })
    ));
}

// === Text extraction ===

#[test]
fn test_extract_ignores_short_numeric_noise() {
    let text = "ISBN: 978-0-13-235088-4 plus some prose 1234";
    let isbns: Vec<String> = extract_isbns_from_text(text).collect();
    assert_eq!(isbns, vec!["9780132350884"]);
}

#[test]
fn test_extract_mixed_formats_in_order() {
    let text = "shelf: 0-306-40615-2, then 9780321125217, done";
    let isbns: Vec<String> = extract_isbns_from_text(text).collect();
    assert_eq!(isbns, vec!["9780306406157", "9780321125217"]);
}

#[test]
fn test_extract_skips_bad_checksums() {
    let text = "fake 9780132350885 real 9780132350884";
    let isbns: Vec<String> = extract_isbns_from_text(text).collect();
    assert_eq!(isbns, vec!["9780132350884"]);
}

#[test]
fn test_extract_is_lazy_and_restartable() {
    let text = "0743273567 and 978-0-321-12521-7";
    let mut iter = extract_isbns_from_text(text);
    assert_eq!(iter.next().as_deref(), Some("9780743273565"));
    drop(iter);

    // A fresh call rescans from the start
    assert_eq!(extract_isbns_from_text(text).count(), 2);
}

// === Checksum properties ===

fn isbn13_check_digit_of(digits: &[u8]) -> u8 {
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, d)| *d as u32 * if i % 2 == 0 { 1 } else { 3 })
        .sum();
    ((10 - sum % 10) % 10) as u8
}

proptest! {
    #[test]
    fn valid_check_digit_always_validates(digits in prop::collection::vec(0u8..10, 12)) {
        prop_assume!(digits.iter().any(|d| *d != 0));

        let check = isbn13_check_digit_of(&digits);
        let isbn: String = digits
            .iter()
            .chain(std::iter::once(&check))
            .map(|d| char::from(b'0' + d))
            .collect();

        prop_assert!(is_valid_isbn13(&isbn));
        prop_assert_eq!(normalize_to_isbn13(&isbn), Some(isbn.clone()));
    }

    #[test]
    fn single_digit_mutation_invalidates(
        digits in prop::collection::vec(0u8..10, 12),
        position in 0usize..13,
        delta in 1u8..10,
    ) {
        prop_assume!(digits.iter().any(|d| *d != 0));

        let check = isbn13_check_digit_of(&digits);
        let mut all: Vec<u8> = digits.clone();
        all.push(check);
        all[position] = (all[position] + delta) % 10;

        // Both 1 and 3 are invertible mod 10, so changing any single digit
        // always breaks the checksum
        let mutated: String = all.iter().map(|d| char::from(b'0' + d)).collect();
        prop_assert!(!is_valid_isbn13(&mutated));
    }

    #[test]
    fn conversion_output_always_validates(digits in prop::collection::vec(0u8..10, 9)) {
        let isbn10: String = {
            let sum: u32 = digits
                .iter()
                .enumerate()
                .map(|(i, d)| (10 - i as u32) * *d as u32)
                .sum();
            let check = (11 - sum % 11) % 11;
            let mut s: String = digits.iter().map(|d| char::from(b'0' + d)).collect();
            s.push(if check == 10 { 'X' } else { char::from(b'0' + check as u8) });
            s
        };
        prop_assume!(isbn10.bytes().any(|b| b != b'0'));

        prop_assert!(is_valid_isbn10(&isbn10));
        let isbn13 = convert_isbn10_to_isbn13(&isbn10).unwrap();
        prop_assert!(is_valid_isbn13(&isbn13));
        prop_assert!(isbn13.starts_with("978"));
    }
}
