//! # Colloquy Core
//!
//! Knowledge matching, guarded learning and scheduled dialogue for a pair of
//! chat agents.
//!
//! - **Knowledge**: a shared question/answer store matched in three passes
//!   (exact, prefix, containment) over normalized text
//! - **Brains**: per-agent line logs that grow through a sanitizing
//!   [`LearningPipeline`](learning::LearningPipeline)
//! - **Sampling**: brain lines drawn without short-term repeats
//! - **Dialogue**: a timed, alternating conversation fanned out to any number
//!   of listeners
//! - **Audit**: every attempted interaction lands in an append-only log
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use colloquy_core::{Colloquy, EngineConfig, FileLog};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = Colloquy::new(EngineConfig::default(), Arc::new(FileLog::new("data")))?;
//!
//!     engine.learn("Veya", "I enjoy discussing orbital mechanics.").await?;
//!     let reply = engine.ask("Orion", "What is your name?").await?;
//!     println!("{}", reply.answer);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Storage Layout
//!
//! Everything is persisted through a [`KeyedAppendLog`]:
//!
//! ```text
//! global::qa             question=answer pairs (read only)
//! agent::{name}::brain   one learned line per entry
//! log::interactions      audit: draws, hits, misses, learns, dialogue
//! log::learning          audit: every learning decision
//! log::unknown           audit: unanswered questions
//! ```

pub mod agent;
pub mod audit;
pub mod config;
pub mod dialogue;
pub mod engine;
pub mod error;
pub mod knowledge;
pub mod learning;
pub mod sampler;
pub mod storage;

pub use agent::{Agent, AgentId, AgentRegistry};
pub use audit::{AuditKind, AuditLog, AuditRecord, AuditStream};
pub use config::{AgentConfig, DialogueConfig, EngineConfig};
pub use dialogue::{DialogueScheduler, DialogueStatus, DialogueTurn, RunStatus, Subscription};
pub use engine::{AskReply, BothReply, Colloquy};
pub use error::{ColloquyError, ColloquyResult};
pub use knowledge::{find_answer, normalize, QaPair};
pub use learning::{LearnOutcome, LearningPipeline, OutcomeStatus};
pub use sampler::{CooldownHistory, NonRepeatingSampler};
pub use storage::{FileLog, InMemoryLog, KeyedAppendLog};
