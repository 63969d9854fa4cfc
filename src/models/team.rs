//! Team models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::pull_request::PullRequestShort;

/// Team stored in database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Team member as exchanged over the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TeamMember {
    pub user_id: Uuid,
    pub username: String,
    pub is_active: bool,
}

/// Request body for `POST /team/add`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AddTeamRequest {
    pub team_name: String,
    pub members: Vec<TeamMember>,
}

/// Team with its members.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TeamResponse {
    pub team_name: String,
    pub members: Vec<TeamMember>,
}

impl From<&super::User> for TeamMember {
    fn from(user: &super::User) -> Self {
        Self {
            user_id: user.id,
            username: user.name.clone(),
            is_active: user.is_active,
        }
    }
}

impl TeamResponse {
    pub fn new(team_name: String, members: &[super::User]) -> Self {
        Self {
            team_name,
            members: members.iter().map(TeamMember::from).collect(),
        }
    }
}

/// Query parameters for `GET /team/get`.
#[derive(Debug, Clone, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GetTeamQuery {
    pub team_name: String,
}

/// Request body for `PATCH /team/deactivateUsers`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct DeactivateTeamUsersRequest {
    pub team_name: String,
    pub user_ids: Vec<Uuid>,
}

/// Response for `PATCH /team/deactivateUsers`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeactivateTeamUsersResponse {
    pub team: TeamResponse,
    pub affected_pull_requests: Vec<PullRequestShort>,
}
