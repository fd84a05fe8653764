//! Non-repeating sampler
//!
//! Picks a brain line for an agent while steering clear of its last few
//! picks. The cooldown is short-term and in-process only; it biases selection
//! and never blocks it. When every line is cooling down, the full pool is used.

use parking_lot::Mutex;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::VecDeque;

/// Bounded history of an agent's most recent picks, oldest first
#[derive(Debug)]
pub struct CooldownHistory {
    capacity: usize,
    recent: Mutex<VecDeque<String>>,
}

impl CooldownHistory {
    /// Create an empty history holding at most `capacity` lines
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            recent: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Maximum number of remembered picks
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Snapshot of the remembered picks, oldest first
    pub fn snapshot(&self) -> Vec<String> {
        self.recent.lock().iter().cloned().collect()
    }

    /// Choose from `pool` and remember the choice, as one atomic step
    ///
    /// Returns `None` only when `pool` is empty.
    pub fn choose<R: Rng + ?Sized>(&self, pool: &[String], rng: &mut R) -> Option<String> {
        let mut recent = self.recent.lock();

        let fresh: Vec<&String> = pool.iter().filter(|line| !recent.contains(line)).collect();
        let picked = if fresh.is_empty() {
            pool.choose(rng)?.clone()
        } else {
            (*fresh.choose(rng)?).clone()
        };

        recent.push_back(picked.clone());
        while recent.len() > self.capacity {
            recent.pop_front();
        }

        Some(picked)
    }
}

/// Draws brain lines, falling back to a filler when there is nothing to say
#[derive(Debug, Clone)]
pub struct NonRepeatingSampler {
    filler: String,
}

impl NonRepeatingSampler {
    /// Create a sampler that answers `filler` for an empty pool
    pub fn new(filler: impl Into<String>) -> Self {
        Self {
            filler: filler.into(),
        }
    }

    /// Pick a line from `pool`, avoiding lines in `history`
    pub fn sample<R: Rng + ?Sized>(
        &self,
        history: &CooldownHistory,
        pool: &[String],
        rng: &mut R,
    ) -> String {
        history
            .choose(pool, rng)
            .unwrap_or_else(|| self.filler.clone())
    }

    /// Line returned for an empty pool
    pub fn filler(&self) -> &str {
        &self.filler
    }
}
