//! Content heuristics for freeform input

/// Verdict of [`classify`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Not worth storing
    Garbage,
    /// May be stored
    Acceptable,
}

/// Undo accidental doubling such as `"helhel"` from retried or echoed input
///
/// Returns the first half when the trimmed text is two identical halves,
/// otherwise the trimmed text.
pub fn collapse_run_on_duplicate(text: &str) -> String {
    let trimmed = text.trim();
    let chars: Vec<char> = trimmed.chars().collect();

    if !chars.is_empty() && chars.len() % 2 == 0 {
        let (first, second) = chars.split_at(chars.len() / 2);
        if first == second {
            return first.iter().collect();
        }
    }

    trimmed.to_string()
}

/// Decide whether `text` carries enough content to learn
///
/// Garbage when, after trimming, the text is empty, an ellipsis, shorter than
/// `min_len` chars, or free of letters and digits.
pub fn classify(text: &str, min_len: usize) -> Classification {
    let trimmed = text.trim();

    let garbage = trimmed.is_empty()
        || trimmed == "..."
        || trimmed == "…"
        || trimmed.chars().count() < min_len
        || !trimmed.chars().any(char::is_alphanumeric);

    if garbage {
        Classification::Garbage
    } else {
        Classification::Acceptable
    }
}
