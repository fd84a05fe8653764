//! # Agents
//!
//! Colloquy runs two fixed conversational agents. Each one owns a brain
//! partition in the store, a short cooldown history used by the sampler, and
//! a learning lock that serializes writes to its brain.
//!
//! Agents are created once from [`EngineConfig`](crate::config::EngineConfig)
//! and live for the whole process.

mod registry;

pub use registry::AgentRegistry;

use crate::sampler::CooldownHistory;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identity of an agent
///
/// Equality and hashing use the lowercase key, so `"Veya"` and `"veya"` name
/// the same agent.
#[derive(Debug, Clone)]
pub struct AgentId {
    key: String,
    name: String,
}

impl AgentId {
    /// Create an identity from a display name
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into().trim().to_string();
        Self {
            key: name.to_lowercase(),
            name,
        }
    }

    /// Lowercase lookup key
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for AgentId {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for AgentId {}

impl Hash for AgentId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A conversational agent and its in-process state
#[derive(Debug)]
pub struct Agent {
    /// Identity
    id: AgentId,

    /// Reply used when a joint question goes unanswered
    miss_line: String,

    /// Recent sampler picks
    cooldown: CooldownHistory,

    /// Held for the duration of a learning attempt
    learn_lock: tokio::sync::Mutex<()>,
}

impl Agent {
    /// Create an agent
    pub fn new(id: AgentId, miss_line: impl Into<String>, cooldown_capacity: usize) -> Self {
        Self {
            id,
            miss_line: miss_line.into(),
            cooldown: CooldownHistory::new(cooldown_capacity),
            learn_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Agent identity
    pub fn id(&self) -> &AgentId {
        &self.id
    }

    /// Reply used when a joint question goes unanswered
    pub fn miss_line(&self) -> &str {
        &self.miss_line
    }

    /// Sampler cooldown history
    pub fn cooldown(&self) -> &CooldownHistory {
        &self.cooldown
    }

    /// Acquire the learning lock
    pub async fn lock_learning(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.learn_lock.lock().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_agent_id_is_case_insensitive() {
        let a = AgentId::new("Veya");
        let b = AgentId::new("  veya ");

        assert_eq!(a, b);
        assert_eq!(a.key(), "veya");
        assert_eq!(a.name(), "Veya");
        assert_eq!(b.name(), "veya");

        let set: HashSet<AgentId> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_agent_display_uses_name() {
        let agent = Agent::new(AgentId::new("Orion"), "Later.", 3);
        assert_eq!(agent.id().to_string(), "Orion");
        assert_eq!(agent.miss_line(), "Later.");
        assert_eq!(agent.cooldown().capacity(), 3);
    }
}
