//! # Knowledge
//!
//! What the agents know: a per-agent brain of freeform lines and a shared,
//! human-curated list of question/answer pairs, plus the normalizer and
//! matcher used to look answers up.

pub mod brain;
pub mod matcher;
pub mod normalize;
pub mod qa;

pub use brain::BrainStore;
pub use matcher::{find_answer, find_match, MatchKind};
pub use normalize::{collapse_whitespace, normalize};
pub use qa::{QaPair, QaStore};
