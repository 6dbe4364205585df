//! Reviewer selection
//!
//! Picks reviewers uniformly at random from a candidate pool. The random
//! source is owned by the picker and seeded once, so a fixed seed gives a
//! reproducible sequence of picks.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::config::SelectionConfig;
use crate::model::User;

/// Random reviewer picker shared by all requests
#[derive(Debug)]
pub struct ReviewerPicker {
    rng: Mutex<StdRng>,
}

impl ReviewerPicker {
    /// Create a picker with a fixed seed
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Create a picker seeded from OS entropy
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn from_config(config: &SelectionConfig) -> Self {
        match config.seed {
            Some(seed) => Self::from_seed(seed),
            None => Self::from_entropy(),
        }
    }

    /// Pick up to `limit` distinct candidates and return their ids.
    ///
    /// Returns every candidate when the pool is no larger than `limit`;
    /// otherwise takes the first `limit` entries of a random permutation.
    pub fn pick(&self, candidates: &[User], limit: usize) -> Vec<String> {
        if candidates.is_empty() || limit == 0 {
            return Vec::new();
        }

        if candidates.len() <= limit {
            return candidates.iter().map(|u| u.id.clone()).collect();
        }

        let mut order: Vec<usize> = (0..candidates.len()).collect();
        {
            // A poisoned lock still holds a usable generator.
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            order.shuffle(&mut *rng);
        }

        order
            .into_iter()
            .take(limit)
            .map(|i| candidates[i].id.clone())
            .collect()
    }
}

impl Default for ReviewerPicker {
    fn default() -> Self {
        Self::from_entropy()
    }
}
