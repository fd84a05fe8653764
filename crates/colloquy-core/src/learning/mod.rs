//! # Learning
//!
//! Freeform text submitted for an agent passes through the sanitizer and is
//! either appended to that agent's brain or only audited.

pub mod pipeline;
pub mod sanitize;

pub use pipeline::{LearnOutcome, LearningPipeline, OutcomeStatus};
pub use sanitize::{classify, collapse_run_on_duplicate, Classification};
