//! In-memory append log

use super::KeyedAppendLog;
use crate::error::ColloquyResult;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Process-local [`KeyedAppendLog`]; contents vanish with the process
#[derive(Debug, Default)]
pub struct InMemoryLog {
    entries: RwLock<HashMap<String, Vec<String>>>,
}

impl InMemoryLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a log pre-filled with lines under one key
    pub fn with_lines<I, S>(key: &str, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let log = Self::new();
        log.entries
            .write()
            .insert(key.to_string(), lines.into_iter().map(Into::into).collect());
        log
    }

    /// Number of keys that hold at least one line
    pub fn key_count(&self) -> usize {
        self.entries.read().len()
    }
}

#[async_trait]
impl KeyedAppendLog for InMemoryLog {
    async fn read(&self, key: &str) -> ColloquyResult<Vec<String>> {
        Ok(self.entries.read().get(key).cloned().unwrap_or_default())
    }

    async fn append(&self, key: &str, line: &str) -> ColloquyResult<()> {
        self.entries
            .write()
            .entry(key.to_string())
            .or_default()
            .push(line.to_string());
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_append_preserves_order() {
        let log = InMemoryLog::new();
        log.append("k", "first").await.unwrap();
        log.append("k", "second").await.unwrap();

        assert_eq!(log.read("k").await.unwrap(), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_missing_key_reads_empty() {
        let log = InMemoryLog::new();
        assert!(log.read("nothing").await.unwrap().is_empty());
        assert_eq!(log.key_count(), 0);
    }

    #[tokio::test]
    async fn test_keys_are_isolated() {
        let log = InMemoryLog::with_lines("a", ["one"]);
        log.append("b", "two").await.unwrap();

        assert_eq!(log.read("a").await.unwrap(), vec!["one"]);
        assert_eq!(log.read("b").await.unwrap(), vec!["two"]);
        assert_eq!(log.key_count(), 2);
    }
}
