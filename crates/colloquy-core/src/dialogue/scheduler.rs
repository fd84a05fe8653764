//! Dialogue scheduler - timed, turn-taking exchange between the two agents
//!
//! The scheduler is either idle or running. A run starts with one immediate
//! turn, then produces one turn per tick until `max_turns` is reached or
//! [`DialogueScheduler::stop`] is called. All run state sits behind a single
//! async mutex held for a whole step, so ticks never overlap.

use super::audience::{Audience, Subscription};
use super::compose::{compose, Voice};
use super::DialogueTurn;
use crate::agent::{Agent, AgentId, AgentRegistry};
use crate::audit::{AuditKind, AuditLog, AuditRecord, AuditStream};
use crate::config::DialogueConfig;
use crate::error::ColloquyResult;
use crate::knowledge::BrainStore;
use parking_lot::Mutex as SyncMutex;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Whether a run is in progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// No run in progress
    Idle,
    /// Producing turns
    Running,
}

/// Result of a single step
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// A turn was produced and broadcast
    Spoke(DialogueTurn),
    /// The turn bound was reached; the scheduler is now idle
    Finished,
    /// Nothing to do, the scheduler is not running
    Idle,
}

/// Snapshot of the scheduler for status endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DialogueStatus {
    /// Current run status
    pub status: RunStatus,
    /// Turns produced in the current (or last) run
    pub turn: u32,
    /// Turn bound of a run
    pub max_turns: u32,
    /// Current topic, once a run has started
    pub topic: Option<String>,
    /// Registered listeners
    pub listeners: usize,
}

struct RunState {
    status: RunStatus,
    run_id: u64,
    turn: u32,
    last_speaker: Option<AgentId>,
    topic: Option<String>,
    next_switch_at: u32,
    rng: StdRng,
}

struct Inner {
    agents: AgentRegistry,
    brain: Arc<BrainStore>,
    audit: AuditLog,
    audience: Audience,
    config: DialogueConfig,
    min_line_len: usize,
    qa_delimiter: char,
    state: Mutex<RunState>,
    task: SyncMutex<Option<JoinHandle<()>>>,
}

/// Owner of the scheduled dialogue; clones share the same scheduler
#[derive(Clone)]
pub struct DialogueScheduler {
    inner: Arc<Inner>,
}

impl DialogueScheduler {
    /// Create an idle scheduler
    pub fn new(
        agents: AgentRegistry,
        brain: Arc<BrainStore>,
        audit: AuditLog,
        config: DialogueConfig,
        min_line_len: usize,
        qa_delimiter: char,
    ) -> ColloquyResult<Self> {
        Self::with_rng(
            agents,
            brain,
            audit,
            config,
            min_line_len,
            qa_delimiter,
            StdRng::from_entropy(),
        )
    }

    /// Create an idle scheduler driven by the given random source
    pub fn with_rng(
        agents: AgentRegistry,
        brain: Arc<BrainStore>,
        audit: AuditLog,
        config: DialogueConfig,
        min_line_len: usize,
        qa_delimiter: char,
        rng: StdRng,
    ) -> ColloquyResult<Self> {
        config.validate()?;
        let audience = Audience::new(config.listener_buffer);

        Ok(Self {
            inner: Arc::new(Inner {
                agents,
                brain,
                audit,
                audience,
                config,
                min_line_len,
                qa_delimiter,
                state: Mutex::new(RunState {
                    status: RunStatus::Idle,
                    run_id: 0,
                    turn: 0,
                    last_speaker: None,
                    topic: None,
                    next_switch_at: 0,
                    rng,
                }),
                task: SyncMutex::new(None),
            }),
        })
    }

    /// Start a run; returns `false` if one is already in progress
    ///
    /// The first turn is produced before this returns.
    pub async fn start(&self) -> bool {
        let mut state = self.inner.state.lock().await;
        if state.status == RunStatus::Running {
            debug!("Dialogue already running");
            return false;
        }

        state.status = RunStatus::Running;
        state.run_id += 1;
        state.turn = 0;
        state.last_speaker = None;
        let topic = self.inner.pick_topic(&mut state.rng, None);
        state.next_switch_at = self.inner.topic_period(&mut state.rng);
        info!(run = state.run_id, topic = %topic, "Dialogue started");
        state.topic = Some(topic);

        self.inner.step_locked(&mut state).await;

        // Spawned under the state lock so a concurrent stop sees the handle.
        let handle = tokio::spawn(Inner::run_ticks(self.inner.clone(), state.run_id));
        if let Some(previous) = self.inner.task.lock().replace(handle) {
            previous.abort();
        }

        true
    }

    /// Stop the current run; returns `false` if none was in progress
    pub async fn stop(&self) -> bool {
        let mut state = self.inner.state.lock().await;
        let was_running = state.status == RunStatus::Running;
        state.status = RunStatus::Idle;

        if let Some(handle) = self.inner.task.lock().take() {
            handle.abort();
        }

        if was_running {
            info!(run = state.run_id, turns = state.turn, "Dialogue stopped");
        }
        was_running
    }

    /// Run one tick by hand
    pub async fn step_once(&self) -> StepOutcome {
        let mut state = self.inner.state.lock().await;
        if state.status != RunStatus::Running {
            return StepOutcome::Idle;
        }
        self.inner.step_locked(&mut state).await
    }

    /// Register a listener for broadcast turns
    pub fn subscribe(&self) -> Subscription {
        self.inner.audience.subscribe()
    }

    /// Current status
    pub async fn status(&self) -> DialogueStatus {
        let state = self.inner.state.lock().await;
        DialogueStatus {
            status: state.status,
            turn: state.turn,
            max_turns: self.inner.config.max_turns,
            topic: state.topic.clone(),
            listeners: self.inner.audience.len(),
        }
    }

    /// Whether a run is in progress
    pub async fn is_running(&self) -> bool {
        self.inner.state.lock().await.status == RunStatus::Running
    }
}

impl Inner {
    /// Recurring tick loop of one run
    async fn run_ticks(inner: Arc<Inner>, run_id: u64) {
        let period = inner.config.tick_interval();
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;

            let mut state = inner.state.lock().await;
            if state.status != RunStatus::Running || state.run_id != run_id {
                break;
            }
            if inner.step_locked(&mut state).await == StepOutcome::Finished {
                break;
            }
        }

        debug!(run = run_id, "Tick loop exited");
    }

    async fn step_locked(&self, state: &mut RunState) -> StepOutcome {
        if state.turn >= self.config.max_turns {
            state.status = RunStatus::Idle;
            info!(run = state.run_id, turns = state.turn, "Dialogue reached turn limit");
            return StepOutcome::Finished;
        }

        if state.turn >= state.next_switch_at {
            let topic = self.pick_topic(&mut state.rng, state.topic.as_deref());
            debug!(turn = state.turn, topic = %topic, "Switching topic");
            state.topic = Some(topic);
            state.next_switch_at = state.turn + self.topic_period(&mut state.rng);
        }

        let speaker = match &state.last_speaker {
            None => self.agents.first().clone(),
            Some(last) => self.agents.partner_of(last).clone(),
        };
        let partner = self.agents.partner_of(speaker.id()).clone();
        let topic = state.topic.clone().unwrap_or_default();

        let speaker_facts = self.facts_of(&speaker).await;
        let partner_facts = self.facts_of(&partner).await;
        let text = compose(
            &Voice::new(speaker.id().name(), &speaker_facts),
            &Voice::new(partner.id().name(), &partner_facts),
            &topic,
            &mut state.rng,
        );

        let turn = DialogueTurn::now(speaker.id().name(), text);

        let record = AuditRecord {
            timestamp: turn.timestamp,
            agent: turn.speaker.clone(),
            kind: AuditKind::ScheduledSay,
            payload: turn.text.clone(),
        };
        if let Err(e) = self.audit.record(AuditStream::Interactions, &record).await {
            warn!(error = %e, "Could not audit scheduled turn");
        }

        state.last_speaker = Some(speaker.id().clone());
        state.turn += 1;

        let delivered = self.audience.broadcast(&turn);
        debug!(
            turn = state.turn,
            speaker = %turn.speaker,
            listeners = delivered,
            "Dialogue turn broadcast"
        );

        StepOutcome::Spoke(turn)
    }

    async fn facts_of(&self, agent: &Agent) -> Vec<String> {
        match self
            .brain
            .pool(agent.id(), self.min_line_len, self.qa_delimiter)
            .await
        {
            Ok(facts) => facts,
            Err(e) => {
                warn!(agent = %agent.id(), error = %e, "Could not read brain for dialogue");
                Vec::new()
            }
        }
    }

    /// Pick a topic, avoiding `current` when there is a choice
    fn pick_topic(&self, rng: &mut StdRng, current: Option<&str>) -> String {
        let topics = &self.config.topics;
        let choices: Vec<&String> = topics
            .iter()
            .filter(|t| Some(t.as_str()) != current)
            .collect();

        choices
            .choose(rng)
            .map(|t| t.to_string())
            .or_else(|| topics.first().cloned())
            .unwrap_or_default()
    }

    /// Turns until the next topic switch
    fn topic_period(&self, rng: &mut StdRng) -> u32 {
        rng.gen_range(self.config.topic_switch_min..=self.config.topic_switch_max)
    }
}
