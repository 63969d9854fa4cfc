//! Domain models and API request/response types.

pub mod pull_request;
pub mod stats;
pub mod team;
pub mod user;

// Re-export commonly used types
pub use pull_request::{
    CreatePullRequestRequest, MergePullRequestRequest, PrReviewer, PrStatus, PrStatusValue,
    PullRequest, PullRequestEnvelope, PullRequestResponse, PullRequestShort,
    ReassignPullRequestRequest, ReassignPullRequestResponse,
};
pub use stats::{ReviewerStats, ReviewersStatsResponse};
pub use team::{
    AddTeamRequest, DeactivateTeamUsersRequest, DeactivateTeamUsersResponse, GetTeamQuery, Team,
    TeamMember, TeamResponse,
};
pub use user::{
    GetReviewQuery, SetIsActiveRequest, SetIsActiveResponse, User, UserResponse,
    UserReviewsResponse,
};
