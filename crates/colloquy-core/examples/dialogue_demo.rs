//! # Dialogue Demo
//!
//! Walks through the engine end to end against an in-memory store:
//!
//! 1. Question lookup against a small QA set, for one agent and for both
//! 2. Guarded learning (accepted, duplicate, QA-shaped and garbage input)
//! 3. Brain line sampling
//! 4. A short scheduled dialogue streamed to a listener
//!
//! ## Run This Example
//!
//! ```bash
//! cargo run -p colloquy-core --example dialogue_demo
//! ```

use colloquy_core::storage::keys;
use colloquy_core::{AuditStream, Colloquy, DialogueConfig, EngineConfig, InMemoryLog};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    info!("=== Colloquy Demo ===\n");

    let storage = Arc::new(InMemoryLog::with_lines(
        keys::QA_PAIRS,
        [
            "# greetings",
            "What is your name?=We are Veya and Orion.",
            "How are you?=Wonderful, thank you! | Steady as ever.",
            "Tell me about the stars=They are very far away.",
        ],
    ));

    let config = EngineConfig::default().with_dialogue(DialogueConfig {
        tick_interval_ms: 200,
        max_turns: 6,
        ..DialogueConfig::default()
    });
    let engine = Colloquy::new(config, storage)?;

    // ========================================
    // 1. QUESTIONS
    // ========================================
    info!("=== 1. Questions ===");
    for question in ["what is your name", "Tell me about the stars tonight", "Why?"] {
        let reply = engine.ask("Veya", question).await?;
        info!("Q: {} -> {} (matched: {})", question, reply.answer, reply.matched);
    }

    let joint = engine.ask_both("How are you?").await?;
    for (agent, text) in &joint.replies {
        info!("{}: {}", agent, text);
    }
    info!("");

    // ========================================
    // 2. LEARNING
    // ========================================
    info!("=== 2. Learning ===");
    for phrase in [
        "I enjoy discussing orbital mechanics.",
        "I enjoy discussing orbital mechanics.",
        "favorite color=blue",
        "!!!",
        "Tides follow the moon. Tides follow the moon.",
    ] {
        let outcome = engine.learn("Veya", phrase).await?;
        info!("{:?} <- {:?}", outcome, phrase);
    }
    engine.learn("Orion", "Comets keep odd hours.").await?;
    info!("");

    // ========================================
    // 3. SAMPLING
    // ========================================
    info!("=== 3. Brain Lines ===");
    for _ in 0..4 {
        info!("Veya: {}", engine.lookup_brain_line("Veya").await?);
    }
    info!("");

    // ========================================
    // 4. SCHEDULED DIALOGUE
    // ========================================
    info!("=== 4. Scheduled Dialogue ===");
    let mut listener = engine.subscribe();
    engine.start_dialogue().await;

    let max_turns = engine.config().dialogue.max_turns;
    for _ in 0..max_turns {
        let Some(turn) = listener.recv().await else {
            break;
        };
        info!("[{}] {}: {}", turn.timestamp.format("%H:%M:%S%.3f"), turn.speaker, turn.text);
    }
    engine.stop_dialogue().await;
    info!("{:?}", engine.dialogue_status().await);
    info!("");

    let unknown = engine.audit().records(AuditStream::Unknown).await?;
    info!("Unanswered questions: {}", unknown.len());
    let learning = engine.audit().records(AuditStream::Learning).await?;
    info!("Learning decisions recorded: {}", learning.len());

    Ok(())
}
