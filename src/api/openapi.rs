//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::{api, error, models, services};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "PR Reviewers Server",
        version = "0.1.0",
        description = "Teams, users and pull requests with automatic reviewer assignment"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::health,
        api::health::ready,
        api::health::info,
        // Team endpoints
        api::teams::add_team,
        api::teams::get_team,
        api::teams::deactivate_users,
        // User endpoints
        api::users::set_is_active,
        api::users::get_review,
        // Pull request endpoints
        api::pull_requests::create,
        api::pull_requests::merge,
        api::pull_requests::reassign,
        // Statistics endpoints
        api::statistics::reviewers,
    ),
    components(
        schemas(
            // Common
            error::ErrorResponse,
            // Health
            api::health::HealthResponse,
            api::health::ReadyResponse,
            api::health::ServerInfoResponse,
            services::CountersSnapshot,
            // Teams
            models::TeamMember,
            models::AddTeamRequest,
            models::TeamResponse,
            models::DeactivateTeamUsersRequest,
            models::DeactivateTeamUsersResponse,
            // Users
            models::SetIsActiveRequest,
            models::UserResponse,
            models::SetIsActiveResponse,
            models::UserReviewsResponse,
            // Pull requests
            models::PrStatusValue,
            models::CreatePullRequestRequest,
            models::MergePullRequestRequest,
            models::ReassignPullRequestRequest,
            models::PullRequestResponse,
            models::PullRequestEnvelope,
            models::ReassignPullRequestResponse,
            models::PullRequestShort,
            // Statistics
            models::ReviewerStats,
            models::ReviewersStatsResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Teams", description = "Team membership and bulk deactivation"),
        (name = "Users", description = "User activity and review assignments"),
        (name = "Pull Requests", description = "Pull request lifecycle and reviewer assignment"),
        (name = "Statistics", description = "Reviewer workload statistics")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        for expected in [
            "/api/v1/team/add",
            "/api/v1/team/get",
            "/api/v1/team/deactivateUsers",
            "/api/v1/users/setIsActive",
            "/api/v1/users/getReview",
            "/api/v1/pullRequest/create",
            "/api/v1/pullRequest/merge",
            "/api/v1/pullRequest/reassign",
            "/api/v1/statistics/reviewers",
        ] {
            assert!(
                paths.iter().any(|p| p.as_str() == expected),
                "missing {}",
                expected
            );
        }
    }
}
