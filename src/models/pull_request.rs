//! Pull request, status and reviewer assignment models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Pull request stored in database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    pub id: Uuid,
    pub name: String,
    pub author_id: Uuid,
    pub status_id: Uuid,
    pub created_at: DateTime<Utc>,
    /// `None` until the pull request is merged.
    pub merged_at: Option<DateTime<Utc>>,
}

/// Pull request lifecycle status.
///
/// `Merged` is terminal: reviewers can no longer be assigned or replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum PrStatusValue {
    Open,
    Merged,
}

impl PrStatusValue {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Merged => "MERGED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "OPEN" => Some(Self::Open),
            "MERGED" => Some(Self::Merged),
            _ => None,
        }
    }
}

impl std::fmt::Display for PrStatusValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status row referenced by a pull request. Mutated in place on transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrStatus {
    pub id: Uuid,
    pub status: PrStatusValue,
}

/// Reviewer assignment (join between pull request and user).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrReviewer {
    pub id: Uuid,
    pub pr_id: Uuid,
    pub reviewer_id: Uuid,
}

/// Request body for `POST /pullRequest/create`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreatePullRequestRequest {
    pub pull_request_id: Uuid,
    pub pull_request_name: String,
    pub author_id: Uuid,
}

/// Request body for `POST /pullRequest/merge`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct MergePullRequestRequest {
    pub pull_request_id: Uuid,
}

/// Request body for `POST /pullRequest/reassign`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ReassignPullRequestRequest {
    pub pull_request_id: Uuid,
    pub old_reviewer_id: Uuid,
}

/// Full pull request view.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PullRequestResponse {
    pub pull_request_id: Uuid,
    pub pull_request_name: String,
    pub author_id: Uuid,
    pub status: PrStatusValue,
    pub assigned_reviewers: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merged_at: Option<DateTime<Utc>>,
}

impl PullRequestResponse {
    pub fn new(pr: PullRequest, status: PrStatusValue, assigned_reviewers: Vec<Uuid>) -> Self {
        Self {
            pull_request_id: pr.id,
            pull_request_name: pr.name,
            author_id: pr.author_id,
            status,
            assigned_reviewers,
            created_at: pr.created_at,
            merged_at: pr.merged_at,
        }
    }
}

/// Wrapper used by the create and merge endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PullRequestEnvelope {
    pub pr: PullRequestResponse,
}

/// Response for `POST /pullRequest/reassign`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReassignPullRequestResponse {
    pub pr: PullRequestResponse,
    pub replaced_by: Uuid,
}

/// Short pull request view used in lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PullRequestShort {
    pub pull_request_id: Uuid,
    pub pull_request_name: String,
    pub author_id: Uuid,
    pub status: PrStatusValue,
}

impl PullRequestShort {
    pub fn new(pr: &PullRequest, status: PrStatusValue) -> Self {
        Self {
            pull_request_id: pr.id,
            pull_request_name: pr.name.clone(),
            author_id: pr.author_id,
            status,
        }
    }
}
