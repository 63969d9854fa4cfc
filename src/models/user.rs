//! User models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::pull_request::PullRequestShort;

/// User stored in database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub is_active: bool,
    pub team_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Request body for `POST /users/setIsActive`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SetIsActiveRequest {
    pub user_id: Uuid,
    pub is_active: bool,
}

/// User info response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub user_id: Uuid,
    pub username: String,
    pub team_name: String,
    pub is_active: bool,
}

/// Response for `POST /users/setIsActive`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SetIsActiveResponse {
    pub user: UserResponse,
}

/// Query parameters for `GET /users/getReview`.
#[derive(Debug, Clone, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GetReviewQuery {
    pub user_id: Uuid,
}

/// Pull requests a user is assigned to review.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserReviewsResponse {
    pub user_id: Uuid,
    pub pull_requests: Vec<PullRequestShort>,
}
