//! Replace one reviewer of an open pull request.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use super::metrics::BusinessMetrics;
use super::reviewer_selection::ReviewerSelector;
use crate::error::{AppError, AppResult, StorageOp};
use crate::models::{PrReviewer, PrStatusValue, PullRequest};
use crate::repository::{Transaction, TransactionManager};

#[derive(Debug, Clone)]
pub struct Input {
    pub pull_request_id: Uuid,
    pub old_reviewer_id: Uuid,
}

#[derive(Debug, Clone)]
pub struct Output {
    pub pull_request: PullRequest,
    pub status: PrStatusValue,
    pub assigned_reviewers: Vec<Uuid>,
    pub replaced_by: Uuid,
}

pub struct ReassignReviewer {
    transactions: Arc<dyn TransactionManager>,
    selector: ReviewerSelector,
    metrics: Arc<dyn BusinessMetrics>,
}

impl ReassignReviewer {
    pub fn new(
        transactions: Arc<dyn TransactionManager>,
        selector: ReviewerSelector,
        metrics: Arc<dyn BusinessMetrics>,
    ) -> Self {
        Self {
            transactions,
            selector,
            metrics,
        }
    }

    pub async fn run(&self, input: Input) -> AppResult<Output> {
        let tx = self
            .transactions
            .begin()
            .await
            .map_err(AppError::storage(StorageOp::BeginTransaction))?;
        let output = self.execute(tx.as_ref(), input).await?;
        tx.commit()
            .await
            .map_err(AppError::storage(StorageOp::CommitTransaction))?;

        self.metrics.reviewer_reassigned();
        Ok(output)
    }

    async fn execute(&self, tx: &dyn Transaction, input: Input) -> AppResult<Output> {
        let pull_request = tx
            .get_pull_request(input.pull_request_id)
            .await
            .map_err(AppError::storage(StorageOp::GetPullRequest))?
            .ok_or(AppError::PullRequestNotFound(input.pull_request_id))?;

        let status = tx
            .get_pr_status(pull_request.status_id)
            .await
            .map_err(AppError::storage(StorageOp::GetPrStatus))?
            .ok_or_else(|| {
                AppError::missing_row(StorageOp::GetPrStatus, "pr status", pull_request.status_id)
            })?;
        if status.status == PrStatusValue::Merged {
            return Err(AppError::PullRequestAlreadyMerged(pull_request.id));
        }

        let current: HashSet<Uuid> = tx
            .get_reviewers_by_pr(pull_request.id)
            .await
            .map_err(AppError::storage(StorageOp::GetPrReviewers))?
            .into_iter()
            .map(|r| r.reviewer_id)
            .collect();
        if !current.contains(&input.old_reviewer_id) {
            return Err(AppError::ReviewerNotFound(input.old_reviewer_id));
        }

        let author = tx
            .get_user(pull_request.author_id)
            .await
            .map_err(AppError::storage(StorageOp::GetUser))?
            .ok_or(AppError::AuthorNotFound(pull_request.author_id))?;
        let teammates = tx
            .get_active_users_by_team(author.team_id)
            .await
            .map_err(AppError::storage(StorageOp::GetUsers))?;

        let replacement = self
            .selector
            .select(&teammates, author.id, &current, 1)
            .into_iter()
            .next()
            .ok_or(AppError::NoAvailableReviewers(author.team_id))?;

        debug!(
            pr_id = %pull_request.id,
            old_reviewer = %input.old_reviewer_id,
            new_reviewer = %replacement.id,
            "Swapping reviewer"
        );
        tx.delete_pr_reviewer(pull_request.id, input.old_reviewer_id)
            .await
            .map_err(AppError::storage(StorageOp::RemoveReviewer))?;
        tx.save_pr_reviewer(&PrReviewer {
            id: Uuid::now_v7(),
            pr_id: pull_request.id,
            reviewer_id: replacement.id,
        })
        .await
        .map_err(AppError::storage(StorageOp::AssignReviewer))?;

        let assigned_reviewers = tx
            .get_reviewers_by_pr(pull_request.id)
            .await
            .map_err(AppError::storage(StorageOp::GetPrReviewers))?
            .into_iter()
            .map(|r| r.reviewer_id)
            .collect();

        Ok(Output {
            pull_request,
            status: status.status,
            assigned_reviewers,
            replaced_by: replacement.id,
        })
    }
}
