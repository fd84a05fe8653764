//! Shared question/answer store
//!
//! The QA list is curated by humans outside the engine and shared by every
//! agent. Each line holds `question=answer`; the engine only ever reads it, and
//! re-reads it on every lookup so edits take effect immediately.

use crate::error::ColloquyResult;
use crate::storage::{keys, KeyedAppendLog};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A curated question and its answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaPair {
    /// Question as written by the curator
    pub question: String,

    /// Answer returned on a match
    pub answer: String,
}

impl QaPair {
    /// Create a pair
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }

    /// Parse one stored line
    ///
    /// Blank lines and `#` comments yield `None`. A line without the delimiter
    /// answers itself. Pairs with an empty side after trimming are dropped.
    pub fn parse(line: &str, delimiter: char) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }

        let (question, answer) = match line.split_once(delimiter) {
            Some((q, a)) => (q.trim(), a.trim()),
            None => (line, line),
        };

        if question.is_empty() || answer.is_empty() {
            return None;
        }

        Some(Self::new(question, answer))
    }
}

/// Read-only view over the shared QA list
pub struct QaStore {
    /// Storage backend
    storage: Arc<dyn KeyedAppendLog>,

    /// Question/answer separator
    delimiter: char,
}

impl QaStore {
    /// Create a QA store
    pub fn new(storage: Arc<dyn KeyedAppendLog>, delimiter: char) -> Self {
        Self { storage, delimiter }
    }

    /// Current pairs in stored order
    pub async fn pairs(&self) -> ColloquyResult<Vec<QaPair>> {
        let lines = self.storage.read(keys::QA_PAIRS).await?;
        Ok(lines
            .iter()
            .filter_map(|line| QaPair::parse(line, self.delimiter))
            .collect())
    }

    /// The delimiter that marks a line as a QA pair
    pub fn delimiter(&self) -> char {
        self.delimiter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryLog;

    #[test]
    fn test_parse_pair() {
        let pair = QaPair::parse("  What is your name? = I'm Veya. ", '=').unwrap();
        assert_eq!(pair.question, "What is your name?");
        assert_eq!(pair.answer, "I'm Veya.");
    }

    #[test]
    fn test_parse_splits_on_first_delimiter_only() {
        let pair = QaPair::parse("what is 1+1=2=true", '=').unwrap();
        assert_eq!(pair.question, "what is 1+1");
        assert_eq!(pair.answer, "2=true");
    }

    #[test]
    fn test_parse_skips_blank_comment_and_empty_sides() {
        assert!(QaPair::parse("", '=').is_none());
        assert!(QaPair::parse("   ", '=').is_none());
        assert!(QaPair::parse("# curated by hand", '=').is_none());
        assert!(QaPair::parse("= orphan answer", '=').is_none());
        assert!(QaPair::parse("orphan question =", '=').is_none());
    }

    #[test]
    fn test_parse_line_without_delimiter_answers_itself() {
        let pair = QaPair::parse("hello", '=').unwrap();
        assert_eq!(pair, QaPair::new("hello", "hello"));
    }

    #[tokio::test]
    async fn test_store_keeps_order() {
        let storage = Arc::new(InMemoryLog::with_lines(
            keys::QA_PAIRS,
            ["# greetings", "hi=Hello!", "", "bye=See you."],
        ));
        let store = QaStore::new(storage, '=');

        let pairs = store.pairs().await.unwrap();
        assert_eq!(
            pairs,
            vec![QaPair::new("hi", "Hello!"), QaPair::new("bye", "See you.")]
        );
    }
}
