//! Engine facade - coordinates knowledge, learning, sampling and dialogue
//!
//! [`Colloquy`] is what a transport layer talks to. It validates caller input
//! (unknown agents, empty text) before anything reaches the core, and makes
//! sure every attempted interaction passes through the audit log.

use crate::agent::{Agent, AgentRegistry};
use crate::audit::{AuditKind, AuditLog, AuditRecord, AuditStream};
use crate::config::EngineConfig;
use crate::dialogue::{DialogueScheduler, DialogueStatus, Subscription};
use crate::error::{ColloquyError, ColloquyResult};
use crate::knowledge::{find_match, BrainStore, QaStore};
use crate::learning::{LearnOutcome, LearningPipeline};
use crate::sampler::NonRepeatingSampler;
use crate::storage::{InMemoryLog, KeyedAppendLog};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Label used in audit records for questions put to both agents
const JOINT_LABEL: &str = "Both";

/// Placeholder for an agent's missing part of a joint answer
const MISSING_PART: &str = "…";

/// Reply to a single-agent question
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AskReply {
    /// Whether a QA pair matched
    pub matched: bool,

    /// Matched answer, or the configured unknown-answer filler
    pub answer: String,
}

/// Reply to a question put to both agents
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BothReply {
    /// Whether a QA pair matched
    pub matched: bool,

    /// `(agent name, text)` in speaking order
    pub replies: Vec<(String, String)>,
}

/// The knowledge-matching and dialogue engine
pub struct Colloquy {
    config: EngineConfig,
    agents: AgentRegistry,
    qa: QaStore,
    brain: Arc<BrainStore>,
    pipeline: LearningPipeline,
    sampler: NonRepeatingSampler,
    audit: AuditLog,
    scheduler: DialogueScheduler,
    storage: Arc<dyn KeyedAppendLog>,
}

impl Colloquy {
    /// Build an engine over `storage`
    pub fn new(config: EngineConfig, storage: Arc<dyn KeyedAppendLog>) -> ColloquyResult<Self> {
        let agents = AgentRegistry::from_config(&config)?;
        let brain = Arc::new(BrainStore::new(storage.clone()));
        let audit = AuditLog::new(storage.clone());
        let qa = QaStore::new(storage.clone(), config.qa_delimiter);
        let pipeline = LearningPipeline::new(
            brain.clone(),
            audit.clone(),
            config.min_line_len,
            config.qa_delimiter,
        );
        let sampler = NonRepeatingSampler::new(config.filler_line.clone());
        let scheduler = DialogueScheduler::new(
            agents.clone(),
            brain.clone(),
            audit.clone(),
            config.dialogue.clone(),
            config.min_line_len,
            config.qa_delimiter,
        )?;

        info!(
            backend = storage.backend_name(),
            agents = ?agents.all().iter().map(|a| a.id().name()).collect::<Vec<_>>(),
            "Colloquy engine ready"
        );

        Ok(Self {
            config,
            agents,
            qa,
            brain,
            pipeline,
            sampler,
            audit,
            scheduler,
            storage,
        })
    }

    /// Build an engine with default configuration over an in-memory store
    pub fn in_memory() -> ColloquyResult<Self> {
        Self::new(EngineConfig::default(), Arc::new(InMemoryLog::new()))
    }

    /// Resolve an agent by name
    pub fn agent(&self, name: &str) -> ColloquyResult<Arc<Agent>> {
        self.agents.resolve(name)
    }

    /// All agents in speaking order
    pub fn agents(&self) -> &AgentRegistry {
        &self.agents
    }

    /// Draw a line from an agent's brain, avoiding its recent picks
    pub async fn lookup_brain_line(&self, name: &str) -> ColloquyResult<String> {
        let agent = self.agent(name)?;
        let pool = self
            .brain
            .pool(agent.id(), self.config.min_line_len, self.config.qa_delimiter)
            .await?;

        let line = {
            let mut rng = rand::thread_rng();
            self.sampler.sample(agent.cooldown(), &pool, &mut rng)
        };

        self.audit
            .record(
                AuditStream::Interactions,
                &AuditRecord::now(agent.id().name(), AuditKind::BrainDraw, line.clone()),
            )
            .await?;

        debug!(agent = %agent.id(), pool = pool.len(), "Brain line drawn");
        Ok(line)
    }

    /// Look up the answer to a question put to one agent
    pub async fn ask(&self, name: &str, question: &str) -> ColloquyResult<AskReply> {
        let agent = self.agent(name)?;
        let question = require_text("input", question)?;

        let pairs = self.qa.pairs().await?;
        match find_match(question, &pairs) {
            Some((pair, kind)) => {
                self.audit
                    .record(
                        AuditStream::Interactions,
                        &AuditRecord::now(
                            agent.id().name(),
                            AuditKind::QaHit,
                            format!("Q: {} → A: {}", question, pair.answer),
                        ),
                    )
                    .await?;

                debug!(agent = %agent.id(), pass = ?kind, "Question answered");
                Ok(AskReply {
                    matched: true,
                    answer: pair.answer.clone(),
                })
            }
            None => {
                self.record_miss(agent.id().name(), question).await?;
                Ok(AskReply {
                    matched: false,
                    answer: self.config.unknown_answer.clone(),
                })
            }
        }
    }

    /// Look up a question for both agents at once
    ///
    /// A matched answer is split on the joint delimiter, one part per agent.
    pub async fn ask_both(&self, question: &str) -> ColloquyResult<BothReply> {
        let question = require_text("input", question)?;
        let pairs = self.qa.pairs().await?;

        let Some((pair, _)) = find_match(question, &pairs) else {
            self.record_miss(JOINT_LABEL, question).await?;
            let replies = self
                .agents
                .all()
                .iter()
                .map(|a| (a.id().name().to_string(), a.miss_line().to_string()))
                .collect();
            return Ok(BothReply {
                matched: false,
                replies,
            });
        };

        let parts: Vec<&str> = pair
            .answer
            .split(self.config.joint_delimiter)
            .map(str::trim)
            .collect();
        let replies: Vec<(String, String)> = self
            .agents
            .all()
            .iter()
            .enumerate()
            .map(|(i, a)| {
                let text = parts
                    .get(i)
                    .filter(|p| !p.is_empty())
                    .copied()
                    .unwrap_or(MISSING_PART);
                (a.id().name().to_string(), text.to_string())
            })
            .collect();

        let summary = replies
            .iter()
            .map(|(name, text)| format!("{}: {}", name, text))
            .collect::<Vec<_>>()
            .join(" | ");
        self.audit
            .record(
                AuditStream::Interactions,
                &AuditRecord::now(
                    JOINT_LABEL,
                    AuditKind::QaHit,
                    format!("Q: {} → {}", question, summary),
                ),
            )
            .await?;

        Ok(BothReply {
            matched: true,
            replies,
        })
    }

    /// Offer a freeform phrase for an agent to learn
    pub async fn learn(&self, name: &str, phrase: &str) -> ColloquyResult<LearnOutcome> {
        let agent = self.agent(name)?;
        self.pipeline.learn(&agent, phrase).await
    }

    /// Start the scheduled dialogue; `false` if it was already running
    pub async fn start_dialogue(&self) -> bool {
        self.scheduler.start().await
    }

    /// Stop the scheduled dialogue; `false` if it was not running
    pub async fn stop_dialogue(&self) -> bool {
        self.scheduler.stop().await
    }

    /// Listen to scheduled dialogue turns
    pub fn subscribe(&self) -> Subscription {
        self.scheduler.subscribe()
    }

    /// Scheduler status
    pub async fn dialogue_status(&self) -> DialogueStatus {
        self.scheduler.status().await
    }

    /// The dialogue scheduler
    pub fn scheduler(&self) -> &DialogueScheduler {
        &self.scheduler
    }

    /// The audit log
    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }

    /// The underlying store
    pub fn storage(&self) -> Arc<dyn KeyedAppendLog> {
        self.storage.clone()
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    async fn record_miss(&self, agent: &str, question: &str) -> ColloquyResult<()> {
        let record = AuditRecord::now(agent, AuditKind::QaMiss, question);
        self.audit.record(AuditStream::Interactions, &record).await?;
        self.audit.record(AuditStream::Unknown, &record).await?;
        debug!(agent, question, "Question not answered");
        Ok(())
    }
}

fn require_text<'a>(field: &str, text: &'a str) -> ColloquyResult<&'a str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ColloquyError::validation(field, "must not be empty", text));
    }
    Ok(trimmed)
}
