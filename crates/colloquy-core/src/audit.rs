//! Audit log - append-only record of every interaction
//!
//! Records go to one of three streams:
//!
//! - **Interactions**: brain draws, QA hits and misses, learned lines, scheduled turns
//! - **Learning**: every learning attempt, including the verbatim skip reason
//! - **Unknown**: questions no QA pair could answer, for curators to pick up
//!
//! Each record is one JSON line. Records are never rewritten or compacted.

use crate::error::{ColloquyError, ColloquyResult};
use crate::storage::{keys, KeyedAppendLog};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// What kind of event a record describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuditKind {
    /// A brain line was sampled
    BrainDraw,
    /// A question matched a QA pair
    QaHit,
    /// A question matched nothing
    QaMiss,
    /// A line was added to a brain
    Learn,
    /// Learning input was empty
    SkipEmpty,
    /// Learning input looked like a QA pair
    SkipQa,
    /// Learning input failed the content heuristics
    SkipGarbage,
    /// Learning input was already known
    SkipDuplicate,
    /// The brain store rejected an otherwise acceptable line
    LearnFailed,
    /// A line spoken during a scheduled dialogue
    ScheduledSay,
}

/// Destination stream of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditStream {
    /// Generic interaction records
    Interactions,
    /// Learning attempts
    Learning,
    /// Unanswered questions
    Unknown,
}

impl AuditStream {
    /// Storage key of the stream
    pub fn key(self) -> &'static str {
        match self {
            Self::Interactions => keys::INTERACTIONS,
            Self::Learning => keys::LEARNING,
            Self::Unknown => keys::UNKNOWN,
        }
    }
}

/// A single audit entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// When the event happened
    pub timestamp: DateTime<Utc>,

    /// Agent involved (or a joint label such as `Both`)
    pub agent: String,

    /// Event kind
    pub kind: AuditKind,

    /// Free text describing the event
    pub payload: String,
}

impl AuditRecord {
    /// Create a record stamped with the current time
    pub fn now(agent: impl Into<String>, kind: AuditKind, payload: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            agent: agent.into(),
            kind,
            payload: payload.into(),
        }
    }
}

/// Writer for the audit streams
#[derive(Clone)]
pub struct AuditLog {
    storage: Arc<dyn KeyedAppendLog>,
}

impl AuditLog {
    /// Create an audit log over `storage`
    pub fn new(storage: Arc<dyn KeyedAppendLog>) -> Self {
        Self { storage }
    }

    /// Append a record to `stream`
    pub async fn record(&self, stream: AuditStream, record: &AuditRecord) -> ColloquyResult<()> {
        let line = serde_json::to_string(record)
            .map_err(|e| ColloquyError::serialization("encode_audit_record", e))?;

        self.storage.append(stream.key(), &line).await
    }

    /// Read back all records of `stream`, skipping lines that do not parse
    pub async fn records(&self, stream: AuditStream) -> ColloquyResult<Vec<AuditRecord>> {
        let lines = self.storage.read(stream.key()).await?;

        Ok(lines
            .iter()
            .filter_map(|line| match serde_json::from_str(line) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(stream = stream.key(), error = %e, "Skipping unreadable audit line");
                    None
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryLog;

    #[test]
    fn test_kind_wire_names() {
        let names: Vec<String> = [
            AuditKind::BrainDraw,
            AuditKind::QaHit,
            AuditKind::QaMiss,
            AuditKind::Learn,
            AuditKind::SkipEmpty,
            AuditKind::SkipQa,
            AuditKind::SkipGarbage,
            AuditKind::SkipDuplicate,
            AuditKind::ScheduledSay,
        ]
        .iter()
        .map(|k| serde_json::to_string(k).unwrap())
        .collect();

        assert_eq!(
            names,
            vec![
                "\"brain-draw\"",
                "\"qa-hit\"",
                "\"qa-miss\"",
                "\"learn\"",
                "\"skip-empty\"",
                "\"skip-qa\"",
                "\"skip-garbage\"",
                "\"skip-duplicate\"",
                "\"scheduled-say\"",
            ]
        );
    }

    #[tokio::test]
    async fn test_streams_are_separate_and_ordered() {
        let storage = Arc::new(InMemoryLog::new());
        let audit = AuditLog::new(storage.clone());

        audit
            .record(
                AuditStream::Interactions,
                &AuditRecord::now("Veya", AuditKind::QaHit, "Q: hi -> A: hello"),
            )
            .await
            .unwrap();
        audit
            .record(
                AuditStream::Learning,
                &AuditRecord::now("Veya", AuditKind::SkipEmpty, "empty after trim"),
            )
            .await
            .unwrap();
        audit
            .record(
                AuditStream::Interactions,
                &AuditRecord::now("Orion", AuditKind::BrainDraw, "Stars."),
            )
            .await
            .unwrap();

        let interactions = audit.records(AuditStream::Interactions).await.unwrap();
        assert_eq!(interactions.len(), 2);
        assert_eq!(interactions[0].kind, AuditKind::QaHit);
        assert_eq!(interactions[1].agent, "Orion");

        let learning = audit.records(AuditStream::Learning).await.unwrap();
        assert_eq!(learning.len(), 1);
        assert!(audit.records(AuditStream::Unknown).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_lines_are_skipped() {
        let storage = Arc::new(InMemoryLog::with_lines(keys::INTERACTIONS, ["not json"]));
        let audit = AuditLog::new(storage);

        assert!(audit.records(AuditStream::Interactions).await.unwrap().is_empty());
    }
}
