//! Identifier case conversion between PascalCase and snake_case.
//!
//! Both conversions are single forward passes over the input's code points
//! carrying one boolean of state. They are deliberately not exact inverses of
//! each other: acronyms and digit runs do not round-trip.

/// Convert a snake_case (or space separated) string to PascalCase.
///
/// `_` and spaces are dropped and mark the next character for upper-casing,
/// as does any numeric character, so `test123case` becomes `Test123Case`.
/// All other characters pass through unchanged unless they start a word.
/// Upper-casing follows [`char::to_uppercase`], so one input character may
/// produce several (`ß` becomes `SS`).
pub fn pascal_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut capitalize_next = true;

    for ch in s.chars() {
        if ch == '_' || ch == ' ' {
            capitalize_next = true;
            continue;
        }

        if capitalize_next {
            result.extend(ch.to_uppercase());
            capitalize_next = false;
        } else {
            result.push(ch);
        }

        if ch.is_numeric() {
            capitalize_next = true;
        }
    }

    result
}

/// Convert a PascalCase or camelCase string to snake_case.
///
/// An underscore is inserted wherever an upper-case letter or a digit follows
/// a character that is neither. Runs of upper-case letters (`ABCTest`) get no
/// internal underscores, and a leading upper-case letter gets no leading one.
///
/// Not idempotent on input containing digits: `a_1` becomes `a__1`, since
/// the underscore before the digit is neither upper-case nor a digit.
pub fn snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + s.len() / 2);
    let mut prev_upper_or_digit = true;

    for ch in s.chars() {
        let upper_or_digit = ch.is_uppercase() || ch.is_numeric();
        if !prev_upper_or_digit && upper_or_digit {
            result.push('_');
        }
        result.extend(ch.to_lowercase());
        prev_upper_or_digit = upper_or_digit;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "")]
    #[case("hello_world", "HelloWorld")]
    #[case("test123case", "Test123Case")]
    #[case("  leading_spaces", "LeadingSpaces")]
    #[case("___", "")]
    #[case("get_user", "GetUser")]
    #[case("list all users", "ListAllUsers")]
    #[case("already_Mixed_CASE", "AlreadyMixedCASE")]
    #[case("a1b", "A1B")]
    #[case("trailing_", "Trailing")]
    #[case("with-dash", "With-dash")]
    #[case("ünicode_wörds", "ÜnicodeWörds")]
    fn test_pascal_case(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(pascal_case(input), expected);
    }

    #[rstest]
    #[case("", "")]
    #[case("HelloWorld", "hello_world")]
    #[case("already_snake", "already_snake")]
    #[case("ABCTest", "abctest")]
    #[case("userId", "user_id")]
    #[case("HelloWorld123", "hello_world_123")]
    #[case("Test123Case", "test_123case")]
    #[case("lowercase", "lowercase")]
    #[case("a1", "a_1")]
    #[case("ÜberCase", "über_case")]
    fn test_snake_case(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(snake_case(input), expected);
    }

    #[test]
    fn test_pascal_case_expands_multi_char_uppercase() {
        assert_eq!(pascal_case("ß_x"), "SSX");
    }

    #[test]
    fn test_snake_case_idempotent_on_snake_input() {
        for s in ["already_snake", "a_b_c", "simple", "x", ""] {
            let once = snake_case(s);
            assert_eq!(snake_case(&once), once);
        }
    }

    #[test]
    fn test_snake_case_not_idempotent_before_digits() {
        assert_eq!(snake_case("a_1"), "a__1");
        assert_eq!(snake_case("HelloWorld123"), "hello_world_123");
        assert_eq!(snake_case("hello_world_123"), "hello_world__123");
    }

    #[test]
    fn test_snake_of_pascal_restores_word_boundaries() {
        for s in ["hello_world", "get_user_by_id", "single"] {
            assert_eq!(snake_case(&pascal_case(s)), s);
        }
    }

    #[test]
    fn test_round_trip_is_lossy_for_irregular_underscores() {
        assert_eq!(snake_case(&pascal_case("_leading")), "leading");
        assert_eq!(snake_case(&pascal_case("double__under")), "double_under");
        assert_eq!(snake_case(&pascal_case("trailing_")), "trailing");
    }

    proptest! {
        #[test]
        fn snake_case_idempotent_on_lower_and_underscores(s in "[a-z_]{0,32}") {
            let once = snake_case(&s);
            prop_assert_eq!(&once, &s);
            prop_assert_eq!(snake_case(&once), once);
        }

        #[test]
        fn snake_of_pascal_keeps_letters_in_order(s in "[a-z_]{0,32}") {
            let round_trip = snake_case(&pascal_case(&s));
            prop_assert_eq!(round_trip.replace('_', ""), s.replace('_', ""));
        }

        #[test]
        fn snake_of_pascal_round_trips_multi_letter_words(
            words in prop::collection::vec("[a-z]{2,8}", 1..6)
        ) {
            let s = words.join("_");
            prop_assert_eq!(snake_case(&pascal_case(&s)), s);
        }

        #[test]
        fn conversions_never_panic(s in "\\PC*") {
            let _ = pascal_case(&s);
            let _ = snake_case(&s);
        }
    }
}
