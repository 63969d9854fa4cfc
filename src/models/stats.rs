//! Reviewer assignment statistics.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Number of pull requests a reviewer is assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ReviewerStats {
    pub reviewer_id: Uuid,
    pub assignment_count: u64,
}

/// Response for `GET /statistics/reviewers`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReviewersStatsResponse {
    pub reviewers: Vec<ReviewerStats>,
}
