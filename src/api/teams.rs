//! Team API handlers.

use actix_web::{HttpResponse, web};
use tracing::info;

use super::{AppState, require_non_blank};
use crate::error::{AppError, AppResult};
use crate::models::{
    AddTeamRequest, DeactivateTeamUsersRequest, DeactivateTeamUsersResponse, GetTeamQuery,
    TeamResponse,
};
use crate::services::{add_team, team_deactivate_users};

/// Create a team or upsert its members.
///
/// Members that already exist are moved into the team and updated when their
/// name or activity flag differs.
#[utoipa::path(
    post,
    path = "/api/v1/team/add",
    tag = "Teams",
    request_body = AddTeamRequest,
    responses(
        (status = 201, description = "Team created or members updated", body = TeamResponse),
        (status = 304, description = "Team exists and nothing changed"),
        (status = 400, description = "Invalid request or duplicate user ids", body = crate::error::ErrorResponse),
    )
)]
pub async fn add_team(
    state: web::Data<AppState>,
    body: web::Json<AddTeamRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    require_non_blank("team_name", &req.team_name)?;
    if req.members.is_empty() {
        return Err(AppError::InvalidInput(
            "members must not be empty".to_string(),
        ));
    }
    for member in &req.members {
        require_non_blank("username", &member.username)?;
    }

    let output = state
        .workflows
        .add_team
        .run(add_team::Input {
            team_name: req.team_name,
            members: req
                .members
                .into_iter()
                .map(|m| add_team::Member {
                    user_id: m.user_id,
                    username: m.username,
                    is_active: m.is_active,
                })
                .collect(),
        })
        .await?;

    info!(
        team_name = %output.team.name,
        team_created = output.team_created,
        members = output.processed.len(),
        "Team saved"
    );

    Ok(HttpResponse::Created().json(TeamResponse::new(output.team.name, &output.processed)))
}

/// Get a team with all of its members.
#[utoipa::path(
    get,
    path = "/api/v1/team/get",
    tag = "Teams",
    params(GetTeamQuery),
    responses(
        (status = 200, description = "Team", body = TeamResponse),
        (status = 400, description = "Missing team name", body = crate::error::ErrorResponse),
        (status = 404, description = "Team not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_team(
    state: web::Data<AppState>,
    query: web::Query<GetTeamQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();
    require_non_blank("team_name", &query.team_name)?;

    let output = state.workflows.get_team.run(&query.team_name).await?;

    Ok(HttpResponse::Ok().json(TeamResponse::new(output.team.name, &output.members)))
}

/// Deactivate team members and reassign their open reviews.
///
/// For every open pull request reviewed by a deactivated user, the vacated
/// slot is filled with another active teammate when one is available and
/// dropped otherwise.
#[utoipa::path(
    patch,
    path = "/api/v1/team/deactivateUsers",
    tag = "Teams",
    request_body = DeactivateTeamUsersRequest,
    responses(
        (status = 200, description = "Users deactivated", body = DeactivateTeamUsersResponse),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 404, description = "Team, users or affected pull requests not found", body = crate::error::ErrorResponse),
        (status = 409, description = "User belongs to another team", body = crate::error::ErrorResponse),
    )
)]
pub async fn deactivate_users(
    state: web::Data<AppState>,
    body: web::Json<DeactivateTeamUsersRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    require_non_blank("team_name", &req.team_name)?;
    if req.user_ids.is_empty() {
        return Err(AppError::InvalidInput(
            "user_ids must not be empty".to_string(),
        ));
    }

    let output = state
        .workflows
        .deactivate_team_users
        .run(team_deactivate_users::Input {
            team_name: req.team_name,
            user_ids: req.user_ids,
        })
        .await?;

    info!(
        team_name = %output.team.name,
        affected = output.affected_pull_requests.len(),
        "Team users deactivated"
    );

    Ok(HttpResponse::Ok().json(DeactivateTeamUsersResponse {
        team: TeamResponse::new(output.team.name, &output.members),
        affected_pull_requests: output.affected_pull_requests,
    }))
}

/// Configure team routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/team/add").route(web::post().to(add_team)))
        .service(web::resource("/team/get").route(web::get().to(get_team)))
        .service(
            web::resource("/team/deactivateUsers").route(web::patch().to(deactivate_users)),
        );
}
