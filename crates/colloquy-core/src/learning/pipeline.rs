//! Learning pipeline - decides what enters an agent's brain
//!
//! Every attempt leaves exactly one record in the learning stream, whatever
//! the outcome. That stream is the only trace of rejected input, so a failed
//! audit write is reported to the caller rather than ignored.

use super::sanitize::{classify, collapse_run_on_duplicate, Classification};
use crate::agent::Agent;
use crate::audit::{AuditKind, AuditLog, AuditRecord, AuditStream};
use crate::error::ColloquyResult;
use crate::knowledge::BrainStore;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of a learning attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum LearnOutcome {
    /// The line was appended to the brain
    Learned,
    /// Nothing left after trimming
    SkippedEmpty,
    /// Input contained the QA delimiter
    SkippedQaFormat,
    /// Input failed the content heuristics
    SkippedGarbage,
    /// Input was already known
    SkippedDuplicate,
    /// The brain store could not be written
    Failed(String),
}

/// How a caller-facing boundary should report an outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeStatus {
    /// Stored
    Success,
    /// Accepted, but nothing changed
    NoEffect,
    /// Refused
    Rejected,
    /// Storage fault
    Failure,
}

impl LearnOutcome {
    /// Boundary status for this outcome
    pub fn status(&self) -> OutcomeStatus {
        match self {
            Self::Learned => OutcomeStatus::Success,
            Self::SkippedGarbage | Self::SkippedDuplicate => OutcomeStatus::NoEffect,
            Self::SkippedEmpty | Self::SkippedQaFormat => OutcomeStatus::Rejected,
            Self::Failed(_) => OutcomeStatus::Failure,
        }
    }

    /// Audit kind recorded for this outcome
    pub fn audit_kind(&self) -> AuditKind {
        match self {
            Self::Learned => AuditKind::Learn,
            Self::SkippedEmpty => AuditKind::SkipEmpty,
            Self::SkippedQaFormat => AuditKind::SkipQa,
            Self::SkippedGarbage => AuditKind::SkipGarbage,
            Self::SkippedDuplicate => AuditKind::SkipDuplicate,
            Self::Failed(_) => AuditKind::LearnFailed,
        }
    }

    /// Human-readable reason, recorded verbatim in the learning stream
    pub fn reason(&self) -> String {
        match self {
            Self::Learned => "learned".to_string(),
            Self::SkippedEmpty => "empty after trim".to_string(),
            Self::SkippedQaFormat => "contains QA delimiter".to_string(),
            Self::SkippedGarbage => "garbage".to_string(),
            Self::SkippedDuplicate => "duplicate".to_string(),
            Self::Failed(reason) => format!("failed: {}", reason),
        }
    }
}

/// Sanitizes freeform input and appends what survives to a brain
pub struct LearningPipeline {
    brain: Arc<BrainStore>,
    audit: AuditLog,
    min_len: usize,
    qa_delimiter: char,
}

impl LearningPipeline {
    /// Create a pipeline
    pub fn new(brain: Arc<BrainStore>, audit: AuditLog, min_len: usize, qa_delimiter: char) -> Self {
        Self {
            brain,
            audit,
            min_len,
            qa_delimiter,
        }
    }

    /// Try to teach `raw` to `agent`
    ///
    /// Returns `Err` only when the audit trail cannot be written.
    pub async fn learn(&self, agent: &Agent, raw: &str) -> ColloquyResult<LearnOutcome> {
        // Serializes the duplicate check with the append.
        let _guard = agent.lock_learning().await;

        let phrase = collapse_run_on_duplicate(raw);
        let outcome = self.evaluate(agent, &phrase).await?;

        let outcome = if outcome == LearnOutcome::Learned {
            match self.brain.append(agent.id(), &phrase).await {
                Ok(()) => LearnOutcome::Learned,
                Err(e) => {
                    warn!(agent = %agent.id(), error = %e, "Brain append failed");
                    LearnOutcome::Failed(e.to_string())
                }
            }
        } else {
            outcome
        };

        let record = AuditRecord::now(
            agent.id().name(),
            outcome.audit_kind(),
            format!("{} | raw: {} | phrase: {}", outcome.reason(), raw, phrase),
        );

        if let LearnOutcome::Failed(_) = outcome {
            // Best effort; the caller already sees the failure.
            if let Err(e) = self.audit.record(AuditStream::Learning, &record).await {
                warn!(agent = %agent.id(), error = %e, "Could not audit failed learn");
            }
            return Ok(outcome);
        }

        self.audit.record(AuditStream::Learning, &record).await?;

        if outcome == LearnOutcome::Learned {
            self.audit
                .record(
                    AuditStream::Interactions,
                    &AuditRecord::now(agent.id().name(), AuditKind::Learn, phrase.clone()),
                )
                .await?;
            info!(agent = %agent.id(), phrase = %phrase, "Learned new line");
        } else {
            debug!(agent = %agent.id(), reason = %outcome.reason(), "Learning skipped");
        }

        Ok(outcome)
    }

    /// Run the checks that precede the append
    async fn evaluate(&self, agent: &Agent, phrase: &str) -> ColloquyResult<LearnOutcome> {
        if phrase.is_empty() {
            return Ok(LearnOutcome::SkippedEmpty);
        }
        if phrase.contains(self.qa_delimiter) {
            return Ok(LearnOutcome::SkippedQaFormat);
        }
        if classify(phrase, self.min_len) == Classification::Garbage {
            return Ok(LearnOutcome::SkippedGarbage);
        }
        if self.brain.contains(agent.id(), phrase).await? {
            return Ok(LearnOutcome::SkippedDuplicate);
        }
        Ok(LearnOutcome::Learned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentId;
    use crate::error::ColloquyError;
    use crate::storage::{InMemoryLog, KeyedAppendLog};
    use async_trait::async_trait;

    fn setup() -> (LearningPipeline, Arc<BrainStore>, AuditLog, Agent) {
        let storage = Arc::new(InMemoryLog::new());
        let brain = Arc::new(BrainStore::new(storage.clone()));
        let audit = AuditLog::new(storage);
        let pipeline = LearningPipeline::new(brain.clone(), audit.clone(), 4, '=');
        let agent = Agent::new(AgentId::new("Veya"), "-", 3);
        (pipeline, brain, audit, agent)
    }

    #[tokio::test]
    async fn test_learn_then_duplicate() {
        let (pipeline, brain, _, agent) = setup();

        let first = pipeline.learn(&agent, "new fact").await.unwrap();
        let second = pipeline.learn(&agent, "  new   fact ").await.unwrap();

        assert_eq!(first, LearnOutcome::Learned);
        assert_eq!(second, LearnOutcome::SkippedDuplicate);
        assert_eq!(brain.lines(agent.id()).await.unwrap(), vec!["new fact"]);
    }

    #[tokio::test]
    async fn test_hash_prefixed_line_is_learned_once_and_visible() {
        let (pipeline, brain, _, agent) = setup();

        let first = pipeline.learn(&agent, "#1 rule is be kind").await.unwrap();
        let second = pipeline.learn(&agent, "#1 rule is be kind").await.unwrap();

        assert_eq!(first, LearnOutcome::Learned);
        assert_eq!(second, LearnOutcome::SkippedDuplicate);
        assert_eq!(brain.lines(agent.id()).await.unwrap(), vec!["#1 rule is be kind"]);
        assert_eq!(
            brain.pool(agent.id(), 4, '=').await.unwrap(),
            vec!["#1 rule is be kind"]
        );
    }

    #[tokio::test]
    async fn test_skip_branches() {
        let (pipeline, brain, _, agent) = setup();

        assert_eq!(pipeline.learn(&agent, "   ").await.unwrap(), LearnOutcome::SkippedEmpty);
        assert_eq!(
            pipeline.learn(&agent, "hi=hello").await.unwrap(),
            LearnOutcome::SkippedQaFormat
        );
        assert_eq!(pipeline.learn(&agent, "...").await.unwrap(), LearnOutcome::SkippedGarbage);
        assert_eq!(pipeline.learn(&agent, "ok").await.unwrap(), LearnOutcome::SkippedGarbage);

        assert!(brain.lines(agent.id()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_doubled_input_is_collapsed_before_storing() {
        let (pipeline, brain, _, agent) = setup();

        let outcome = pipeline.learn(&agent, "Comets are shy.Comets are shy.").await.unwrap();

        assert_eq!(outcome, LearnOutcome::Learned);
        assert_eq!(brain.lines(agent.id()).await.unwrap(), vec!["Comets are shy."]);
    }

    #[tokio::test]
    async fn test_every_attempt_is_audited() {
        let (pipeline, _, audit, agent) = setup();

        pipeline.learn(&agent, "").await.unwrap();
        pipeline.learn(&agent, "q=a").await.unwrap();
        pipeline.learn(&agent, "!!!!").await.unwrap();
        pipeline.learn(&agent, "Stars are far away.").await.unwrap();
        pipeline.learn(&agent, "Stars are far away.").await.unwrap();

        let learning = audit.records(AuditStream::Learning).await.unwrap();
        let kinds: Vec<AuditKind> = learning.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![
                AuditKind::SkipEmpty,
                AuditKind::SkipQa,
                AuditKind::SkipGarbage,
                AuditKind::Learn,
                AuditKind::SkipDuplicate,
            ]
        );
        assert!(learning[1].payload.contains("contains QA delimiter"));

        // Only the learned line shows up among interactions.
        let interactions = audit.records(AuditStream::Interactions).await.unwrap();
        assert_eq!(interactions.len(), 1);
        assert_eq!(interactions[0].kind, AuditKind::Learn);
        assert_eq!(interactions[0].payload, "Stars are far away.");
    }

    #[tokio::test]
    async fn test_concurrent_identical_learns_store_once() {
        let (pipeline, brain, _, agent) = setup();
        let pipeline = Arc::new(pipeline);
        let agent = Arc::new(agent);

        let mut handles = Vec::new();
        for _ in 0..8 {
            let pipeline = pipeline.clone();
            let agent = agent.clone();
            handles.push(tokio::spawn(async move {
                pipeline.learn(&agent, "Orbits are patient.").await.unwrap()
            }));
        }

        let mut learned = 0;
        for handle in handles {
            if handle.await.unwrap() == LearnOutcome::Learned {
                learned += 1;
            }
        }

        assert_eq!(learned, 1);
        assert_eq!(brain.lines(agent.id()).await.unwrap().len(), 1);
    }

    /// Store whose brain keys refuse writes
    struct ReadOnlyBrain(InMemoryLog);

    #[async_trait]
    impl KeyedAppendLog for ReadOnlyBrain {
        async fn read(&self, key: &str) -> ColloquyResult<Vec<String>> {
            self.0.read(key).await
        }

        async fn append(&self, key: &str, line: &str) -> ColloquyResult<()> {
            if key.starts_with("agent::") {
                return Err(ColloquyError::storage(
                    "append",
                    std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
                ));
            }
            self.0.append(key, line).await
        }

        fn backend_name(&self) -> &'static str {
            "read-only"
        }
    }

    #[tokio::test]
    async fn test_brain_write_failure_is_reported() {
        let storage = Arc::new(ReadOnlyBrain(InMemoryLog::new()));
        let brain = Arc::new(BrainStore::new(storage.clone()));
        let audit = AuditLog::new(storage);
        let pipeline = LearningPipeline::new(brain, audit.clone(), 4, '=');
        let agent = Agent::new(AgentId::new("Veya"), "-", 3);

        let outcome = pipeline.learn(&agent, "A perfectly fine line").await.unwrap();

        assert!(matches!(outcome, LearnOutcome::Failed(_)));
        assert_eq!(outcome.status(), OutcomeStatus::Failure);
        let learning = audit.records(AuditStream::Learning).await.unwrap();
        assert_eq!(learning[0].kind, AuditKind::LearnFailed);
    }

    #[test]
    fn test_outcome_status_mapping() {
        assert_eq!(LearnOutcome::Learned.status(), OutcomeStatus::Success);
        assert_eq!(LearnOutcome::SkippedGarbage.status(), OutcomeStatus::NoEffect);
        assert_eq!(LearnOutcome::SkippedDuplicate.status(), OutcomeStatus::NoEffect);
        assert_eq!(LearnOutcome::SkippedEmpty.status(), OutcomeStatus::Rejected);
        assert_eq!(LearnOutcome::SkippedQaFormat.status(), OutcomeStatus::Rejected);
    }
}
