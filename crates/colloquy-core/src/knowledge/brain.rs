//! Brain store - per-agent freeform lines
//!
//! Each agent owns an append-only list of utterances it has learned. Lines are
//! never edited or removed; the learning pipeline decides what gets in.

use super::normalize::collapse_whitespace;
use crate::agent::AgentId;
use crate::error::ColloquyResult;
use crate::storage::{keys, KeyedAppendLog};
use std::sync::Arc;

/// Append-only brain lines for every agent
pub struct BrainStore {
    /// Storage backend
    storage: Arc<dyn KeyedAppendLog>,
}

impl BrainStore {
    /// Create a brain store
    pub fn new(storage: Arc<dyn KeyedAppendLog>) -> Self {
        Self { storage }
    }

    /// All lines of `agent`, trimmed, without blanks
    ///
    /// Every stored line is visible here, so the duplicate check and the
    /// sampler see exactly what learning appended.
    pub async fn lines(&self, agent: &AgentId) -> ColloquyResult<Vec<String>> {
        let raw = self.storage.read(&keys::brain(agent)).await?;
        Ok(raw
            .into_iter()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect())
    }

    /// Lines eligible for sampling: long enough and not QA-formatted
    pub async fn pool(
        &self,
        agent: &AgentId,
        min_len: usize,
        qa_delimiter: char,
    ) -> ColloquyResult<Vec<String>> {
        let lines = self.lines(agent).await?;
        Ok(lines
            .into_iter()
            .filter(|line| is_speakable(line, min_len, qa_delimiter))
            .collect())
    }

    /// Whether `agent` already holds `line` under whitespace-normalized comparison
    pub async fn contains(&self, agent: &AgentId, line: &str) -> ColloquyResult<bool> {
        let needle = collapse_whitespace(line);
        let lines = self.lines(agent).await?;
        Ok(lines.iter().any(|existing| collapse_whitespace(existing) == needle))
    }

    /// Append a line to `agent`'s brain
    pub async fn append(&self, agent: &AgentId, line: &str) -> ColloquyResult<()> {
        self.storage.append(&keys::brain(agent), line).await
    }
}

/// Whether a stored line may be spoken by the sampler
pub fn is_speakable(line: &str, min_len: usize, qa_delimiter: char) -> bool {
    !line.contains(qa_delimiter) && line.chars().count() >= min_len
}
