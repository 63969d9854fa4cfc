//! Pull requests a user is assigned to review.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::error::{AppError, AppResult, StorageOp};
use crate::models::PullRequestShort;
use crate::repository::{Transaction, TransactionManager};

#[derive(Debug, Clone)]
pub struct Output {
    pub user_id: Uuid,
    pub pull_requests: Vec<PullRequestShort>,
}

pub struct GetReview {
    transactions: Arc<dyn TransactionManager>,
}

impl GetReview {
    pub fn new(transactions: Arc<dyn TransactionManager>) -> Self {
        Self { transactions }
    }

    pub async fn run(&self, user_id: Uuid) -> AppResult<Output> {
        let tx = self
            .transactions
            .begin()
            .await
            .map_err(AppError::storage(StorageOp::BeginTransaction))?;
        let output = self.execute(tx.as_ref(), user_id).await?;
        tx.commit()
            .await
            .map_err(AppError::storage(StorageOp::CommitTransaction))?;
        Ok(output)
    }

    async fn execute(&self, tx: &dyn Transaction, user_id: Uuid) -> AppResult<Output> {
        let user = tx
            .get_user(user_id)
            .await
            .map_err(AppError::storage(StorageOp::GetUser))?
            .ok_or(AppError::UserNotFound(user_id))?;

        let assignments = tx
            .get_assignments_by_reviewer(user.id)
            .await
            .map_err(AppError::storage(StorageOp::GetPrReviewers))?;
        if assignments.is_empty() {
            return Err(AppError::NoActiveReviewers(user.id));
        }

        let pr_ids: Vec<Uuid> = assignments.iter().map(|a| a.pr_id).collect();
        let pull_requests = tx
            .get_pull_requests(&pr_ids)
            .await
            .map_err(AppError::storage(StorageOp::GetPullRequest))?;
        let status_ids: Vec<Uuid> = pull_requests.iter().map(|pr| pr.status_id).collect();
        let statuses = tx
            .get_pr_statuses(&status_ids)
            .await
            .map_err(AppError::storage(StorageOp::GetPrStatus))?;

        let pull_requests = pull_requests
            .iter()
            .filter_map(|pr| {
                let status = statuses.iter().find(|s| s.id == pr.status_id);
                if status.is_none() {
                    debug!(pr_id = %pr.id, "Status not found for pull request, skipping");
                }
                status.map(|s| PullRequestShort::new(pr, s.status))
            })
            .collect();

        Ok(Output {
            user_id: user.id,
            pull_requests,
        })
    }
}
