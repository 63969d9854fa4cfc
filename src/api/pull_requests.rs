//! Pull request API handlers.

use actix_web::{HttpResponse, web};
use tracing::info;

use super::{AppState, require_non_blank};
use crate::error::AppResult;
use crate::models::{
    CreatePullRequestRequest, MergePullRequestRequest, PullRequestEnvelope, PullRequestResponse,
    ReassignPullRequestRequest, ReassignPullRequestResponse,
};
use crate::services::{pull_request_create, pull_request_reassign};

/// Create a pull request and assign reviewers from the author's team.
///
/// Up to the configured number of active teammates are assigned. An author
/// without eligible teammates gets a pull request with no reviewers.
#[utoipa::path(
    post,
    path = "/api/v1/pullRequest/create",
    tag = "Pull Requests",
    request_body = CreatePullRequestRequest,
    responses(
        (status = 201, description = "Pull request created", body = PullRequestEnvelope),
        (status = 400, description = "Invalid request or pull request exists", body = crate::error::ErrorResponse),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<CreatePullRequestRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    require_non_blank("pull_request_name", &req.pull_request_name)?;

    let output = state
        .workflows
        .create_pull_request
        .run(pull_request_create::Input {
            pull_request_id: req.pull_request_id,
            name: req.pull_request_name,
            author_id: req.author_id,
        })
        .await?;

    info!(
        pr_id = %output.pull_request.id,
        reviewers = output.assigned_reviewers.len(),
        "Pull request created"
    );

    Ok(HttpResponse::Created().json(PullRequestEnvelope {
        pr: PullRequestResponse::new(
            output.pull_request,
            output.status,
            output.assigned_reviewers,
        ),
    }))
}

/// Merge a pull request. Merging an already merged pull request is a no-op.
#[utoipa::path(
    post,
    path = "/api/v1/pullRequest/merge",
    tag = "Pull Requests",
    request_body = MergePullRequestRequest,
    responses(
        (status = 200, description = "Pull request merged", body = PullRequestEnvelope),
        (status = 404, description = "Pull request not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn merge(
    state: web::Data<AppState>,
    body: web::Json<MergePullRequestRequest>,
) -> AppResult<HttpResponse> {
    let output = state
        .workflows
        .merge_pull_request
        .run(body.pull_request_id)
        .await?;

    if !output.already_merged {
        info!(pr_id = %output.pull_request.id, "Pull request merged");
    }

    Ok(HttpResponse::Ok().json(PullRequestEnvelope {
        pr: PullRequestResponse::new(
            output.pull_request,
            output.status,
            output.assigned_reviewers,
        ),
    }))
}

/// Replace one reviewer of an open pull request with another teammate.
#[utoipa::path(
    post,
    path = "/api/v1/pullRequest/reassign",
    tag = "Pull Requests",
    request_body = ReassignPullRequestRequest,
    responses(
        (status = 200, description = "Reviewer replaced", body = ReassignPullRequestResponse),
        (status = 404, description = "Pull request, reviewer or candidate not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Pull request already merged", body = crate::error::ErrorResponse),
    )
)]
pub async fn reassign(
    state: web::Data<AppState>,
    body: web::Json<ReassignPullRequestRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let output = state
        .workflows
        .reassign_reviewer
        .run(pull_request_reassign::Input {
            pull_request_id: req.pull_request_id,
            old_reviewer_id: req.old_reviewer_id,
        })
        .await?;

    info!(
        pr_id = %output.pull_request.id,
        old_reviewer = %req.old_reviewer_id,
        new_reviewer = %output.replaced_by,
        "Reviewer reassigned"
    );

    Ok(HttpResponse::Ok().json(ReassignPullRequestResponse {
        replaced_by: output.replaced_by,
        pr: PullRequestResponse::new(
            output.pull_request,
            output.status,
            output.assigned_reviewers,
        ),
    }))
}

/// Configure pull request routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/pullRequest/create").route(web::post().to(create)))
        .service(web::resource("/pullRequest/merge").route(web::post().to(merge)))
        .service(web::resource("/pullRequest/reassign").route(web::post().to(reassign)));
}
