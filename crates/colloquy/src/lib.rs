//! # Colloquy - Two-Agent Dialogue Engine for Rust
//!
//! **Colloquy** brings together:
//!
//! - **Colloquy Core**: knowledge matching, guarded learning, non-repeating
//!   brain sampling and a scheduled dialogue between two agents
//! - **Colloquy Server**: a JSON-over-HTTP surface with a live server-sent
//!   events feed of the dialogue
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use colloquy::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = Colloquy::in_memory()?;
//!
//!     engine.learn("Veya", "I enjoy discussing orbital mechanics.").await?;
//!     println!("{}", engine.lookup_brain_line("Veya").await?);
//!
//!     let mut listener = engine.subscribe();
//!     engine.start_dialogue().await;
//!     if let Some(turn) = listener.recv().await {
//!         println!("{}: {}", turn.speaker, turn.text);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │               Colloquy                  │
//! │           (Umbrella Crate)              │
//! └──────────────────┬──────────────────────┘
//!                    │
//!          ┌─────────┴─────────┐
//!          │                   │
//!     ┌────▼────┐        ┌─────▼─────┐
//!     │  Core   │◄───────┤  Server   │
//!     └─────────┘        └───────────┘
//! ```

#![doc(html_root_url = "https://docs.rs/colloquy/0.1.0")]
#![warn(missing_docs)]

// Re-export sub-crates
pub use colloquy_core as engine;

#[cfg(feature = "server")]
pub use colloquy_server as server;

/// Commonly used types and traits
pub mod prelude {
    pub use crate::engine::{
        AskReply, AuditKind, AuditRecord, AuditStream, BothReply, Colloquy, ColloquyError,
        ColloquyResult, DialogueConfig, DialogueStatus, DialogueTurn, EngineConfig, FileLog,
        InMemoryLog, KeyedAppendLog, LearnOutcome, OutcomeStatus, Subscription,
    };

    #[cfg(feature = "server")]
    pub use crate::server::{app, AppState, ServerConfig};
}
