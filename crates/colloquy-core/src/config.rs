//! Engine configuration

use crate::error::{ColloquyError, ColloquyResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration of one conversational agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Display name; lookups are case-insensitive
    pub name: String,

    /// What the agent says when a joint question has no answer
    pub miss_line: String,
}

impl AgentConfig {
    /// Create an agent configuration
    pub fn new(name: impl Into<String>, miss_line: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            miss_line: miss_line.into(),
        }
    }
}

/// Configuration for the scheduled two-agent dialogue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogueConfig {
    /// Delay between scheduled turns, in milliseconds
    pub tick_interval_ms: u64,

    /// Number of turns after which a run stops on its own
    pub max_turns: u32,

    /// Topics the agents talk about
    pub topics: Vec<String>,

    /// Minimum number of turns spent on one topic
    pub topic_switch_min: u32,

    /// Maximum number of turns spent on one topic
    pub topic_switch_max: u32,

    /// Per-listener buffer; a listener that falls this far behind misses turns
    pub listener_buffer: usize,
}

impl DialogueConfig {
    /// Tick interval as a [`Duration`]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Check the dialogue settings for consistency
    pub fn validate(&self) -> ColloquyResult<()> {
        if self.topics.is_empty() {
            return Err(ColloquyError::config("dialogue.topics must not be empty"));
        }
        if self.tick_interval_ms == 0 {
            return Err(ColloquyError::config("dialogue.tick_interval_ms must be positive"));
        }
        if self.topic_switch_min == 0 || self.topic_switch_min > self.topic_switch_max {
            return Err(ColloquyError::config(
                "dialogue.topic_switch_min must be in 1..=topic_switch_max",
            ));
        }
        if self.listener_buffer == 0 {
            return Err(ColloquyError::config("dialogue.listener_buffer must be positive"));
        }

        Ok(())
    }
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 4_000,
            max_turns: 40,
            topics: [
                "the night sky",
                "the ocean",
                "music",
                "memory",
                "time",
                "dreams",
                "cities at night",
                "learning something new",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            topic_switch_min: 4,
            topic_switch_max: 7,
            listener_buffer: 32,
        }
    }
}

/// Configuration for the whole engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// The two conversational agents, in speaking order
    pub agents: Vec<AgentConfig>,

    /// Minimum length (in chars) of an acceptable brain line
    pub min_line_len: usize,

    /// How many recent picks the sampler avoids per agent
    pub cooldown_capacity: usize,

    /// Separator between question and answer in the QA store
    pub qa_delimiter: char,

    /// Separator between per-agent parts of a joint answer
    pub joint_delimiter: char,

    /// Line returned when an agent has nothing in its brain yet
    pub filler_line: String,

    /// Answer returned when no QA pair matches
    pub unknown_answer: String,

    /// Scheduled dialogue settings
    pub dialogue: DialogueConfig,
}

impl EngineConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the agent list
    pub fn with_agents(mut self, agents: Vec<AgentConfig>) -> Self {
        self.agents = agents;
        self
    }

    /// Set the minimum brain line length
    pub fn with_min_line_len(mut self, len: usize) -> Self {
        self.min_line_len = len;
        self
    }

    /// Set the sampler cooldown capacity
    pub fn with_cooldown_capacity(mut self, capacity: usize) -> Self {
        self.cooldown_capacity = capacity;
        self
    }

    /// Set the dialogue settings
    pub fn with_dialogue(mut self, dialogue: DialogueConfig) -> Self {
        self.dialogue = dialogue;
        self
    }

    /// Check the configuration for consistency
    pub fn validate(&self) -> ColloquyResult<()> {
        if self.agents.len() != 2 {
            return Err(ColloquyError::config(format!(
                "exactly two agents are required, got {}",
                self.agents.len()
            )));
        }

        let first = self.agents[0].name.trim().to_lowercase();
        let second = self.agents[1].name.trim().to_lowercase();
        if first.is_empty() || second.is_empty() {
            return Err(ColloquyError::config("agent names must not be empty"));
        }
        if first == second {
            return Err(ColloquyError::config(format!(
                "agent names must differ, both are '{}'",
                first
            )));
        }

        if self.cooldown_capacity == 0 {
            return Err(ColloquyError::config("cooldown_capacity must be at least 1"));
        }
        if self.qa_delimiter == self.joint_delimiter {
            return Err(ColloquyError::config(
                "qa_delimiter and joint_delimiter must differ",
            ));
        }

        self.dialogue.validate()
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            agents: vec![
                AgentConfig::new("Veya", "Sorry, I don't know that yet."),
                AgentConfig::new("Orion", "Let's circle back later."),
            ],
            min_line_len: 4,
            cooldown_capacity: 3,
            qa_delimiter: '=',
            joint_delimiter: '|',
            filler_line: "I'm thinking about that.".to_string(),
            unknown_answer: "Sorry, I don't know that yet.".to_string(),
            dialogue: DialogueConfig::default(),
        }
    }
}
