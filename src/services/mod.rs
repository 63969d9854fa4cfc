//! Business workflows and the collaborators they depend on.
//!
//! Each workflow runs its body inside a single transaction obtained from a
//! [`TransactionManager`] and returns an already classified
//! [`AppError`](crate::error::AppError) on failure.

pub mod add_team;
pub mod clock;
pub mod get_review;
pub mod get_team;
pub mod metrics;
pub mod pull_request_create;
pub mod pull_request_merge;
pub mod pull_request_reassign;
pub mod randomizer;
pub mod reviewer_selection;
pub mod set_is_active;
pub mod stats_pr_assignments;
pub mod team_deactivate_users;
pub mod testing;

#[cfg(test)]
pub(crate) mod tests_support;

use std::sync::Arc;

pub use clock::{Clock, SystemClock};
pub use metrics::{BusinessCounters, BusinessMetrics, CountersSnapshot};
pub use randomizer::{Randomizer, ThreadRandomizer};
pub use reviewer_selection::ReviewerSelector;

use crate::repository::TransactionManager;

/// Every workflow, wired to the same collaborators.
pub struct Workflows {
    pub add_team: add_team::AddTeam,
    pub get_team: get_team::GetTeam,
    pub set_is_active: set_is_active::SetIsActive,
    pub get_review: get_review::GetReview,
    pub create_pull_request: pull_request_create::CreatePullRequest,
    pub merge_pull_request: pull_request_merge::MergePullRequest,
    pub reassign_reviewer: pull_request_reassign::ReassignReviewer,
    pub deactivate_team_users: team_deactivate_users::DeactivateTeamUsers,
    pub reviewer_statistics: stats_pr_assignments::ReviewerStatistics,
}

impl Workflows {
    pub fn new(
        transactions: Arc<dyn TransactionManager>,
        randomizer: Arc<dyn Randomizer>,
        clock: Arc<dyn Clock>,
        metrics: Arc<dyn BusinessMetrics>,
        max_reviewers: usize,
    ) -> Self {
        let selector = ReviewerSelector::new(randomizer);
        Self {
            add_team: add_team::AddTeam::new(transactions.clone(), clock.clone(), metrics.clone()),
            get_team: get_team::GetTeam::new(transactions.clone()),
            set_is_active: set_is_active::SetIsActive::new(transactions.clone()),
            get_review: get_review::GetReview::new(transactions.clone()),
            create_pull_request: pull_request_create::CreatePullRequest::new(
                transactions.clone(),
                selector.clone(),
                clock.clone(),
                metrics.clone(),
                max_reviewers,
            ),
            merge_pull_request: pull_request_merge::MergePullRequest::new(
                transactions.clone(),
                clock,
                metrics.clone(),
            ),
            reassign_reviewer: pull_request_reassign::ReassignReviewer::new(
                transactions.clone(),
                selector.clone(),
                metrics.clone(),
            ),
            deactivate_team_users: team_deactivate_users::DeactivateTeamUsers::new(
                transactions.clone(),
                selector,
                metrics,
            ),
            reviewer_statistics: stats_pr_assignments::ReviewerStatistics::new(transactions),
        }
    }
}
