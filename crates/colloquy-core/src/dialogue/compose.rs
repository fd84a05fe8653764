//! Utterance templates for scheduled dialogue
//!
//! [`compose`] is a pure function of both speakers' remembered facts, the
//! current topic and a random source. Tests inject a seeded RNG to make
//! output reproducible.

use rand::seq::SliceRandom;
use rand::Rng;

/// Upper bound of the "ask the partner" band
pub const QUESTION_BAND: f64 = 0.35;

/// Upper bound of the "link own fact to topic" band
pub const STATEMENT_BAND: f64 = 0.70;

const OPENERS: &[&str] = &[
    "You know what I've been wondering?",
    "Here's a thought.",
    "I was just thinking.",
    "Can I tell you something?",
    "Something just occurred to me.",
];

/// One side of the conversation as seen by the composer
#[derive(Debug, Clone, Copy)]
pub struct Voice<'a> {
    /// Display name
    pub name: &'a str,

    /// Lines this agent remembers
    pub facts: &'a [String],
}

impl<'a> Voice<'a> {
    /// Create a voice
    pub fn new(name: &'a str, facts: &'a [String]) -> Self {
        Self { name, facts }
    }
}

/// Which template family produced an utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UtteranceStyle {
    /// A question addressed to the partner
    Question,
    /// A statement tying the speaker's memory to the topic
    Statement,
    /// A generic opener
    Opener,
}

impl UtteranceStyle {
    /// Style selected by a roll in `[0, 1)`
    pub fn from_roll(roll: f64) -> Self {
        if roll < QUESTION_BAND {
            Self::Question
        } else if roll < STATEMENT_BAND {
            Self::Statement
        } else {
            Self::Opener
        }
    }
}

/// Compose what `speaker` says next to `partner` about `topic`
pub fn compose<R: Rng + ?Sized>(
    speaker: &Voice<'_>,
    partner: &Voice<'_>,
    topic: &str,
    rng: &mut R,
) -> String {
    match UtteranceStyle::from_roll(rng.gen::<f64>()) {
        UtteranceStyle::Question => ask_partner(partner, topic, rng),
        UtteranceStyle::Statement => link_fact(speaker, topic, rng),
        UtteranceStyle::Opener => opener(topic, rng),
    }
}

fn ask_partner<R: Rng + ?Sized>(partner: &Voice<'_>, topic: &str, rng: &mut R) -> String {
    if let Some(fact) = partner.facts.choose(rng) {
        if rng.gen_bool(0.5) {
            return format!(
                "{}, you once told me \"{}\" How does that fit with {}?",
                partner.name, fact, topic
            );
        }
    }
    format!("{}, what do you think about {}?", partner.name, topic)
}

fn link_fact<R: Rng + ?Sized>(speaker: &Voice<'_>, topic: &str, rng: &mut R) -> String {
    match speaker.facts.choose(rng) {
        Some(fact) => format!("{} That's how I see {}.", fact, topic),
        None => format!("I keep coming back to {}.", topic),
    }
}

fn opener<R: Rng + ?Sized>(topic: &str, rng: &mut R) -> String {
    let line = OPENERS.choose(rng).copied().unwrap_or(OPENERS[0]);
    if rng.gen_bool(0.5) {
        format!("{} Especially about {}.", line, topic)
    } else {
        line.to_string()
    }
}
