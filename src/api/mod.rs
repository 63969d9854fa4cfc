//! API endpoint modules.

pub mod health;
pub mod openapi;
pub mod pull_requests;
pub mod statistics;
pub mod teams;
pub mod users;

use std::sync::Arc;

use actix_web::web;

use crate::error::AppError;
use crate::repository::TransactionManager;
use crate::services::{BusinessCounters, Clock, Randomizer, Workflows};

pub use health::configure_health_routes;
pub use openapi::ApiDoc;
pub use pull_requests::configure_routes as configure_pull_request_routes;
pub use statistics::configure_routes as configure_statistics_routes;
pub use teams::configure_routes as configure_team_routes;
pub use users::configure_routes as configure_user_routes;

/// Shared state handed to every handler.
pub struct AppState {
    pub workflows: Workflows,
    pub transactions: Arc<dyn TransactionManager>,
    pub counters: Arc<BusinessCounters>,
}

impl AppState {
    pub fn new(
        transactions: Arc<dyn TransactionManager>,
        randomizer: Arc<dyn Randomizer>,
        clock: Arc<dyn Clock>,
        max_reviewers: usize,
    ) -> Self {
        let counters = Arc::new(BusinessCounters::new());
        let workflows = Workflows::new(
            transactions.clone(),
            randomizer,
            clock,
            counters.clone(),
            max_reviewers,
        );
        Self {
            workflows,
            transactions,
            counters,
        }
    }
}

/// Register every `/api/v1` route along with extractor error handling.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::InvalidInput(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::InvalidInput(err.to_string()).into()),
    )
    .service(
        web::scope("/api/v1")
            .configure(configure_health_routes)
            .configure(configure_team_routes)
            .configure(configure_user_routes)
            .configure(configure_pull_request_routes)
            .configure(configure_statistics_routes),
    );
}

/// Reject blank identifiers that deserialize fine but carry no meaning.
pub(crate) fn require_non_blank(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::InvalidInput(format!("{} must not be empty", field)));
    }
    Ok(())
}
