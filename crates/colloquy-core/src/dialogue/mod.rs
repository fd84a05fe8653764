//! # Scheduled Dialogue
//!
//! An unattended conversation between the two agents. The
//! [`DialogueScheduler`] decides who speaks and when, [`compose`] decides what
//! is said, and the [`Audience`] fans every turn out to live listeners.
//!
//! ```text
//!  tick ──► scheduler ──► compose(speaker, partner, topic, rng)
//!                │
//!                ├──► audit (scheduled-say)
//!                └──► audience ──► listener 1..n
//! ```

pub mod audience;
pub mod compose;
pub mod scheduler;

pub use audience::{Audience, Subscription};
pub use compose::{compose, UtteranceStyle, Voice};
pub use scheduler::{DialogueScheduler, DialogueStatus, RunStatus, StepOutcome};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One line spoken during a scheduled dialogue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueTurn {
    /// When the line was produced
    #[serde(rename = "ts")]
    pub timestamp: DateTime<Utc>,

    /// Display name of the speaking agent
    pub speaker: String,

    /// What was said
    pub text: String,
}

impl DialogueTurn {
    /// Create a turn stamped with the current time
    pub fn now(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            speaker: speaker.into(),
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_wire_format() {
        let turn = DialogueTurn::now("Veya", "Hello, Orion.");
        let json = serde_json::to_value(&turn).unwrap();

        assert_eq!(json["speaker"], "Veya");
        assert_eq!(json["text"], "Hello, Orion.");
        assert!(json["ts"].is_string());
    }
}
