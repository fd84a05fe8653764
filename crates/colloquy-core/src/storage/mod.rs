//! # Append-only storage
//!
//! Every persistent structure in Colloquy (brain lines, the QA list, audit
//! streams) is an ordered sequence of text lines that only ever grows. The
//! [`KeyedAppendLog`] trait captures exactly that, so the engine never needs
//! to know whether it is talking to files or to memory.
//!
//! ## Key Scopes
//!
//! - **Agent**: `agent::<agent_id>::brain` - Agent-owned freeform lines
//! - **Global**: `global::qa` - Curated question/answer pairs shared by all agents
//! - **Log**: `log::<stream>` - Audit streams
//!
//! ## Example
//!
//! ```rust
//! use colloquy_core::storage::{InMemoryLog, KeyedAppendLog};
//!
//! # async fn example() -> colloquy_core::ColloquyResult<()> {
//! let log = InMemoryLog::new();
//! log.append("agent::veya::brain", "I like the stars.").await?;
//! assert_eq!(log.read("agent::veya::brain").await?.len(), 1);
//! # Ok(())
//! # }
//! ```

mod file;
mod memory;

pub use file::FileLog;
pub use memory::InMemoryLog;

use crate::error::ColloquyResult;
use async_trait::async_trait;

/// Append-only store of text lines addressed by key
#[async_trait]
pub trait KeyedAppendLog: Send + Sync {
    /// Read every line stored under `key`, oldest first
    ///
    /// A key that was never written reads as an empty sequence.
    async fn read(&self, key: &str) -> ColloquyResult<Vec<String>>;

    /// Append one line under `key`
    async fn append(&self, key: &str, line: &str) -> ColloquyResult<()>;

    /// Backend name for diagnostics
    fn backend_name(&self) -> &'static str;
}

/// Key helpers shared by every component
pub mod keys {
    use crate::agent::AgentId;

    /// Shared question/answer list
    pub const QA_PAIRS: &str = "global::qa";

    /// Generic interaction records
    pub const INTERACTIONS: &str = "log::interactions";

    /// Learning attempts with skip reasons
    pub const LEARNING: &str = "log::learning";

    /// Questions nobody could answer
    pub const UNKNOWN: &str = "log::unknown";

    /// Brain partition of one agent
    pub fn brain(agent: &AgentId) -> String {
        format!("agent::{}::brain", agent.key())
    }
}
