//! Statistics API handlers.

use actix_web::{HttpResponse, web};

use super::AppState;
use crate::error::AppResult;
use crate::models::ReviewersStatsResponse;

/// Number of pull requests each reviewer is assigned to, busiest first.
#[utoipa::path(
    get,
    path = "/api/v1/statistics/reviewers",
    tag = "Statistics",
    responses(
        (status = 200, description = "Assignment counts", body = ReviewersStatsResponse),
        (status = 404, description = "No assignments exist", body = crate::error::ErrorResponse),
    )
)]
pub async fn reviewers(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let reviewers = state.workflows.reviewer_statistics.run().await?;

    Ok(HttpResponse::Ok().json(ReviewersStatsResponse { reviewers }))
}

/// Configure statistics routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/statistics/reviewers").route(web::get().to(reviewers)));
}
