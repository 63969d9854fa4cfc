//! User API handlers.

use actix_web::{HttpResponse, web};
use tracing::info;

use super::AppState;
use crate::error::AppResult;
use crate::models::{
    GetReviewQuery, SetIsActiveRequest, SetIsActiveResponse, UserResponse, UserReviewsResponse,
};
use crate::services::set_is_active;

/// Set a user's `is_active` flag.
#[utoipa::path(
    post,
    path = "/api/v1/users/setIsActive",
    tag = "Users",
    request_body = SetIsActiveRequest,
    responses(
        (status = 200, description = "User updated", body = SetIsActiveResponse),
        (status = 304, description = "User already has the requested value"),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn set_is_active(
    state: web::Data<AppState>,
    body: web::Json<SetIsActiveRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let output = state
        .workflows
        .set_is_active
        .run(set_is_active::Input {
            user_id: req.user_id,
            is_active: req.is_active,
        })
        .await?;

    info!(user_id = %output.user.id, is_active = output.user.is_active, "User updated");

    Ok(HttpResponse::Ok().json(SetIsActiveResponse {
        user: UserResponse {
            user_id: output.user.id,
            username: output.user.name,
            team_name: output.team.name,
            is_active: output.user.is_active,
        },
    }))
}

/// List pull requests the user is assigned to review.
#[utoipa::path(
    get,
    path = "/api/v1/users/getReview",
    tag = "Users",
    params(GetReviewQuery),
    responses(
        (status = 200, description = "Assigned pull requests", body = UserReviewsResponse),
        (status = 400, description = "Invalid user id", body = crate::error::ErrorResponse),
        (status = 404, description = "User not found or has no assignments", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_review(
    state: web::Data<AppState>,
    query: web::Query<GetReviewQuery>,
) -> AppResult<HttpResponse> {
    let output = state.workflows.get_review.run(query.user_id).await?;

    Ok(HttpResponse::Ok().json(UserReviewsResponse {
        user_id: output.user_id,
        pull_requests: output.pull_requests,
    }))
}

/// Configure user routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/users/setIsActive").route(web::post().to(set_is_active)))
        .service(web::resource("/users/getReview").route(web::get().to(get_review)));
}
