//! Business event counters.
//!
//! Workflows report what they did through [`BusinessMetrics`]. Recording is
//! fire-and-forget and happens after the transaction commits, so a counter
//! never reflects a rolled back change.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use utoipa::ToSchema;

/// Observer for business events emitted by the workflows.
pub trait BusinessMetrics: Send + Sync {
    fn team_created(&self);
    fn users_upserted(&self, count: usize);
    fn pull_request_created(&self, reviewers: usize);
    fn pull_request_merged(&self);
    fn reviewer_reassigned(&self);
    fn users_deactivated(&self, count: usize);
}

/// Lock-free in-process counters.
#[derive(Debug, Default)]
pub struct BusinessCounters {
    teams_created: AtomicU64,
    users_upserted: AtomicU64,
    pull_requests_created: AtomicU64,
    reviewers_assigned: AtomicU64,
    pull_requests_merged: AtomicU64,
    reviewers_reassigned: AtomicU64,
    users_deactivated: AtomicU64,
}

/// Point-in-time copy of [`BusinessCounters`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct CountersSnapshot {
    pub teams_created: u64,
    pub users_upserted: u64,
    pub pull_requests_created: u64,
    pub reviewers_assigned: u64,
    pub pull_requests_merged: u64,
    pub reviewers_reassigned: u64,
    pub users_deactivated: u64,
}

impl BusinessCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> CountersSnapshot {
        CountersSnapshot {
            teams_created: self.teams_created.load(Ordering::Relaxed),
            users_upserted: self.users_upserted.load(Ordering::Relaxed),
            pull_requests_created: self.pull_requests_created.load(Ordering::Relaxed),
            reviewers_assigned: self.reviewers_assigned.load(Ordering::Relaxed),
            pull_requests_merged: self.pull_requests_merged.load(Ordering::Relaxed),
            reviewers_reassigned: self.reviewers_reassigned.load(Ordering::Relaxed),
            users_deactivated: self.users_deactivated.load(Ordering::Relaxed),
        }
    }
}

impl BusinessMetrics for BusinessCounters {
    fn team_created(&self) {
        self.teams_created.fetch_add(1, Ordering::Relaxed);
    }

    fn users_upserted(&self, count: usize) {
        self.users_upserted
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    fn pull_request_created(&self, reviewers: usize) {
        self.pull_requests_created.fetch_add(1, Ordering::Relaxed);
        self.reviewers_assigned
            .fetch_add(reviewers as u64, Ordering::Relaxed);
    }

    fn pull_request_merged(&self) {
        self.pull_requests_merged.fetch_add(1, Ordering::Relaxed);
    }

    fn reviewer_reassigned(&self) {
        self.reviewers_reassigned.fetch_add(1, Ordering::Relaxed);
    }

    fn users_deactivated(&self, count: usize) {
        self.users_deactivated
            .fetch_add(count as u64, Ordering::Relaxed);
    }
}
