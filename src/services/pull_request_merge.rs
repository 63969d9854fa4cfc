//! Mark a pull request as merged.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use super::clock::Clock;
use super::metrics::BusinessMetrics;
use crate::error::{AppError, AppResult, StorageOp};
use crate::models::{PrStatus, PrStatusValue, PullRequest};
use crate::repository::{Transaction, TransactionManager};

#[derive(Debug, Clone)]
pub struct Output {
    pub pull_request: PullRequest,
    pub status: PrStatusValue,
    pub assigned_reviewers: Vec<Uuid>,
    /// The pull request was merged before this call; nothing was written.
    pub already_merged: bool,
}

pub struct MergePullRequest {
    transactions: Arc<dyn TransactionManager>,
    clock: Arc<dyn Clock>,
    metrics: Arc<dyn BusinessMetrics>,
}

impl MergePullRequest {
    pub fn new(
        transactions: Arc<dyn TransactionManager>,
        clock: Arc<dyn Clock>,
        metrics: Arc<dyn BusinessMetrics>,
    ) -> Self {
        Self {
            transactions,
            clock,
            metrics,
        }
    }

    pub async fn run(&self, pull_request_id: Uuid) -> AppResult<Output> {
        let tx = self
            .transactions
            .begin()
            .await
            .map_err(AppError::storage(StorageOp::BeginTransaction))?;
        let output = self.execute(tx.as_ref(), pull_request_id).await?;
        tx.commit()
            .await
            .map_err(AppError::storage(StorageOp::CommitTransaction))?;

        if !output.already_merged {
            self.metrics.pull_request_merged();
        }
        Ok(output)
    }

    async fn execute(&self, tx: &dyn Transaction, pull_request_id: Uuid) -> AppResult<Output> {
        let pull_request = tx
            .get_pull_request(pull_request_id)
            .await
            .map_err(AppError::storage(StorageOp::GetPullRequest))?
            .ok_or(AppError::PullRequestNotFound(pull_request_id))?;
        let status = tx
            .get_pr_status(pull_request.status_id)
            .await
            .map_err(AppError::storage(StorageOp::GetPrStatus))?
            .ok_or_else(|| {
                AppError::missing_row(StorageOp::GetPrStatus, "pr status", pull_request.status_id)
            })?;
        let assigned_reviewers = tx
            .get_reviewers_by_pr(pull_request.id)
            .await
            .map_err(AppError::storage(StorageOp::GetPrReviewers))?
            .into_iter()
            .map(|r| r.reviewer_id)
            .collect();

        if status.status == PrStatusValue::Merged {
            debug!(pr_id = %pull_request.id, "Pull request already merged");
            return Ok(Output {
                pull_request,
                status: status.status,
                assigned_reviewers,
                already_merged: true,
            });
        }

        let status = tx
            .update_pr_status(&PrStatus {
                status: PrStatusValue::Merged,
                ..status
            })
            .await
            .map_err(AppError::storage(StorageOp::UpdatePrStatus))?;
        let pull_request = tx
            .mark_pull_request_merged(pull_request.id, self.clock.now())
            .await
            .map_err(AppError::storage(StorageOp::UpdatePrMergeTime))?;

        Ok(Output {
            pull_request,
            status: status.status,
            assigned_reviewers,
            already_merged: false,
        })
    }
}
