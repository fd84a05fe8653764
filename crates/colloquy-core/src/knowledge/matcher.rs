//! Three-pass question lookup
//!
//! Passes run in strict priority order against the normalized question:
//!
//! 1. **Exact**: stored question equals the input
//! 2. **Prefix**: input starts with the stored question
//! 3. **Containment**: input contains the stored question anywhere
//!
//! Within a pass the first pair in store order wins. There is no scoring.

use super::normalize::normalize;
use super::qa::QaPair;

/// Which pass produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Normalized forms are equal
    Exact,
    /// Input starts with the stored question
    Prefix,
    /// Input contains the stored question
    Containment,
}

/// Find the answer for `question`, or `None` when no pass matches
pub fn find_answer<'a>(question: &str, pairs: &'a [QaPair]) -> Option<&'a QaPair> {
    find_match(question, pairs).map(|(pair, _)| pair)
}

/// Like [`find_answer`] but also reports the winning pass
pub fn find_match<'a>(question: &str, pairs: &'a [QaPair]) -> Option<(&'a QaPair, MatchKind)> {
    let input = normalize(question);
    if input.is_empty() {
        return None;
    }

    // Empty normalized questions would match everything in passes 2 and 3.
    let candidates: Vec<(&QaPair, String)> = pairs
        .iter()
        .map(|p| (p, normalize(&p.question)))
        .filter(|(_, q)| !q.is_empty())
        .collect();

    let passes: [(MatchKind, fn(&str, &str) -> bool); 3] = [
        (MatchKind::Exact, |input, q| input == q),
        (MatchKind::Prefix, |input, q| input.starts_with(q)),
        (MatchKind::Containment, |input, q| input.contains(q)),
    ];

    passes.iter().find_map(|(kind, matches)| {
        candidates
            .iter()
            .find(|(_, q)| matches(&input, q))
            .map(|(pair, _)| (*pair, *kind))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<QaPair> {
        raw.iter().map(|(q, a)| QaPair::new(*q, *a)).collect()
    }

    #[test]
    fn test_exact_match_ignores_case_and_punctuation() {
        let store = pairs(&[("What is your name?", "Veya")]);
        let (pair, kind) = find_match("what IS your name", &store).unwrap();

        assert_eq!(pair.answer, "Veya");
        assert_eq!(kind, MatchKind::Exact);
    }

    #[test]
    fn test_exact_beats_earlier_prefix() {
        let store = pairs(&[("hi", "A"), ("hi there", "B")]);

        let (pair, kind) = find_match("Hi there!", &store).unwrap();
        assert_eq!(pair.answer, "B");
        assert_eq!(kind, MatchKind::Exact);
    }

    #[test]
    fn test_prefix_first_in_store_order_wins() {
        let store = pairs(&[("hi", "A"), ("hi there", "B")]);

        let (pair, kind) = find_match("hi there friend", &store).unwrap();
        assert_eq!(pair.answer, "A");
        assert_eq!(kind, MatchKind::Prefix);
    }

    #[test]
    fn test_containment_only_when_exact_and_prefix_fail() {
        let store = pairs(&[("weather", "Sunny"), ("good morning", "Morning!")]);

        // Prefix pass wins over a containment candidate listed earlier.
        let (pair, kind) = find_match("good morning, how is the weather", &store).unwrap();
        assert_eq!(pair.answer, "Morning!");
        assert_eq!(kind, MatchKind::Prefix);

        // Only containment applies here.
        let (pair, kind) = find_match("tell me about the weather today", &store).unwrap();
        assert_eq!(pair.answer, "Sunny");
        assert_eq!(kind, MatchKind::Containment);
    }

    #[test]
    fn test_no_match_is_none() {
        let store = pairs(&[("hi", "A")]);
        assert!(find_answer("orbital mechanics", &store).is_none());
        assert!(find_answer("", &store).is_none());
        assert!(find_answer("anything", &[]).is_none());
    }

    #[test]
    fn test_punctuation_only_question_never_matches() {
        let store = pairs(&[("???", "Wildcard"), ("stars", "Shiny")]);
        assert_eq!(find_answer("do you like stars", &store).unwrap().answer, "Shiny");
        assert!(find_answer("nothing here", &store).is_none());
    }

    #[test]
    fn test_matching_is_substring_based() {
        // "hi" is contained in "within", containment is not word-bounded.
        let store = pairs(&[("hi", "A")]);
        let (_, kind) = find_match("within", &store).unwrap();
        assert_eq!(kind, MatchKind::Containment);
    }
}
