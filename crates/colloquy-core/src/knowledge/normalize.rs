//! Canonical text form used for matching

use regex::Regex;
use std::sync::OnceLock;

fn separator_runs() -> &'static Regex {
    static SEPARATORS: OnceLock<Regex> = OnceLock::new();
    SEPARATORS.get_or_init(|| Regex::new(r"[^\p{L}\p{N}]+").expect("separator pattern is valid"))
}

fn whitespace_runs() -> &'static Regex {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("whitespace pattern is valid"))
}

/// Lowercase `text`, turn every run of non-letter/non-digit characters into a
/// single space, and trim.
///
/// Idempotent: `normalize(&normalize(x)) == normalize(x)`.
pub fn normalize(text: &str) -> String {
    let lower = text.to_lowercase();
    separator_runs().replace_all(&lower, " ").trim().to_string()
}

/// Collapse whitespace runs to one space and trim; case and punctuation are kept
pub fn collapse_whitespace(text: &str) -> String {
    whitespace_runs().replace_all(text.trim(), " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_and_punctuation_insensitive() {
        assert_eq!(normalize("Hello, World!"), normalize("hello world"));
        assert_eq!(normalize("Hello, World!"), "hello world");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "  What's   the TIME?? ",
            "Ünïcödé—dash…ellipsis",
            "İstanbul",
            "!!!",
            "",
            "tab\tand\nnewline",
            "数字 123 と 文字",
        ];

        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", s);
        }
    }

    #[test]
    fn test_unicode_letters_and_digits_survive() {
        assert_eq!(normalize("Café — 42!"), "café 42");
        assert_eq!(normalize("数字123"), "数字123");
    }

    #[test]
    fn test_punctuation_only_is_empty() {
        assert_eq!(normalize("?!..."), "");
    }

    #[test]
    fn test_collapse_whitespace_keeps_case() {
        assert_eq!(collapse_whitespace("  I  like\tStars. "), "I like Stars.");
    }
}
