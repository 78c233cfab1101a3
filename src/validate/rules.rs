//! The formatting patterns behind the field validators.
//!
//! All character classes are ASCII: a word character is `[0-9A-Za-z_]` and a digit is `[0-9]`.

use once_cell::sync::Lazy;
use regex::Regex;

/// No leading or trailing whitespace and no run of more than one whitespace character.
pub const DESCRIPTION_PATTERN: &str = r"^\S+(\s\S+)*$";

/// `0` or a number without a leading zero, with up to two decimal places.
pub const AMOUNT_PATTERN: &str = r"^(0|[1-9][0-9]*)(\.[0-9]{1,2})?$";

/// `YYYY-MM-DD` with a month of 01-12 and a day of 01-31. Impossible days such as Feb 30 still
/// match, they are caught when the date is parsed.
pub const DATE_PATTERN: &str = r"^[0-9]{4}-(0[1-9]|1[0-2])-(0[1-9]|[12][0-9]|3[01])$";

/// Letters, optionally split into words by single spaces or hyphens.
pub const CATEGORY_PATTERN: &str = r"^[A-Za-z]+(?:[ -][A-Za-z]+)*$";

/// The same word twice in a row, ignoring case. Shown for reference, `regex` has no
/// backreferences so `has_duplicate_words` does the matching.
pub const DUPLICATE_WORDS_PATTERN: &str = r"\b(\w+)\s+\1\b";

const WORD_PATTERN: &str = r"[0-9A-Za-z_]+";

static DESCRIPTION: Lazy<Regex> = Lazy::new(|| compile(DESCRIPTION_PATTERN));
static AMOUNT: Lazy<Regex> = Lazy::new(|| compile(AMOUNT_PATTERN));
static DATE: Lazy<Regex> = Lazy::new(|| compile(DATE_PATTERN));
static CATEGORY: Lazy<Regex> = Lazy::new(|| compile(CATEGORY_PATTERN));
static WORD: Lazy<Regex> = Lazy::new(|| compile(WORD_PATTERN));

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("Invalid built-in pattern '{pattern}': {e}"))
}

pub(crate) fn is_description(value: &str) -> bool {
    DESCRIPTION.is_match(value)
}

pub(crate) fn is_amount(value: &str) -> bool {
    AMOUNT.is_match(value)
}

pub(crate) fn is_date(value: &str) -> bool {
    DATE.is_match(value)
}

pub(crate) fn is_category(value: &str) -> bool {
    CATEGORY.is_match(value)
}

/// Returns true when a whole word is immediately followed, after nothing but whitespace, by the
/// same word in any letter case. `"coffee Coffee"` is a duplicate, `"coffee coffees"` is not.
pub fn has_duplicate_words(value: &str) -> bool {
    let mut previous: Option<regex::Match<'_>> = None;
    for word in WORD.find_iter(value) {
        if let Some(prev) = previous {
            let gap = &value[prev.end()..word.start()];
            if !gap.is_empty()
                && gap.chars().all(char::is_whitespace)
                && prev.as_str().eq_ignore_ascii_case(word.as_str())
            {
                return true;
            }
        }
        previous = Some(word);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_pattern() {
        assert!(is_description("Coffee shop"));
        assert!(is_description("x"));
        assert!(is_description("Rent - June"));
        assert!(!is_description(" Coffee"));
        assert!(!is_description("Coffee "));
        assert!(!is_description("Coffee  shop"));
        assert!(!is_description("Coffee\t\tshop"));
        assert!(!is_description(""));
    }

    #[test]
    fn test_amount_pattern() {
        for ok in ["0", "0.5", "0.05", "12", "12.5", "12.50", "999999"] {
            assert!(is_amount(ok), "{ok} should match");
        }
        for bad in ["", "01", "00", "12.", ".5", "12.555", "-5", "+5", "1e3", "1,000", " 1"] {
            assert!(!is_amount(bad), "{bad} should not match");
        }
    }

    #[test]
    fn test_amount_pattern_is_ascii() {
        // Arabic-Indic digits are `\d` in Unicode mode
        assert!(!is_amount("\u{0661}\u{0662}"));
    }

    #[test]
    fn test_date_pattern() {
        assert!(is_date("2024-01-31"));
        assert!(is_date("2024-02-30"));
        assert!(!is_date("2024-13-01"));
        assert!(!is_date("2024-00-10"));
        assert!(!is_date("2024-01-32"));
        assert!(!is_date("24-01-01"));
        assert!(!is_date("2024/01/01"));
    }

    #[test]
    fn test_category_pattern() {
        assert!(is_category("Food"));
        assert!(is_category("Eating Out"));
        assert!(is_category("Self-care"));
        assert!(!is_category("Food "));
        assert!(!is_category("Food  Court"));
        assert!(!is_category("Food--Court"));
        assert!(!is_category("Food1"));
        assert!(!is_category("-Food"));
    }

    #[test]
    fn test_duplicate_words() {
        assert!(has_duplicate_words("coffee coffee"));
        assert!(has_duplicate_words("Coffee COFFEE"));
        assert!(has_duplicate_words("the the end"));
        assert!(has_duplicate_words("pay day day"));
        assert!(has_duplicate_words("a\tA"));
        assert!(!has_duplicate_words("coffee shop"));
        assert!(!has_duplicate_words("coffee coffees"));
        assert!(!has_duplicate_words("coffee, coffee"));
        assert!(!has_duplicate_words("coffee-coffee"));
        assert!(!has_duplicate_words("coffee"));
        assert!(!has_duplicate_words(""));
    }

    #[test]
    fn test_duplicate_words_ascii_word_boundaries() {
        // `é` is not a word character, so the runs are "caf" and "caf" with "é " in between
        assert!(!has_duplicate_words("café café"));
        assert!(has_duplicate_words("12 12"));
    }
}
