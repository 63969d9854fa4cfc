//! Reviewer selection shared by every workflow that assigns reviewers.

use std::collections::HashSet;
use std::sync::Arc;

use uuid::Uuid;

use super::randomizer::Randomizer;
use crate::models::User;

/// Picks reviewers out of a pool of team members.
#[derive(Clone)]
pub struct ReviewerSelector {
    randomizer: Arc<dyn Randomizer>,
}

impl ReviewerSelector {
    pub fn new(randomizer: Arc<dyn Randomizer>) -> Self {
        Self { randomizer }
    }

    /// Select up to `max_count` eligible reviewers from `pool`.
    ///
    /// A candidate is eligible when it is active, is not `exclude_author` and
    /// is not in `exclude_current`. When no more than `max_count` candidates
    /// are eligible they are all returned in pool order and the randomizer is
    /// not consulted. Otherwise the candidates are shuffled once and the first
    /// `max_count` are returned.
    pub fn select(
        &self,
        pool: &[User],
        exclude_author: Uuid,
        exclude_current: &HashSet<Uuid>,
        max_count: usize,
    ) -> Vec<User> {
        if max_count == 0 {
            return Vec::new();
        }

        let mut candidates: Vec<User> = pool
            .iter()
            .filter(|u| {
                u.id != exclude_author && u.is_active && !exclude_current.contains(&u.id)
            })
            .cloned()
            .collect();

        if candidates.len() <= max_count {
            return candidates;
        }

        self.randomizer
            .shuffle(candidates.len(), &mut |i, j| candidates.swap(i, j));
        candidates.truncate(max_count);
        candidates
    }
}
