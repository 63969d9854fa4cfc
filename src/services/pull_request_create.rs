//! Pull request creation with automatic reviewer assignment.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use super::clock::Clock;
use super::metrics::BusinessMetrics;
use super::reviewer_selection::ReviewerSelector;
use crate::error::{AppError, AppResult, StorageOp};
use crate::models::{PrReviewer, PrStatus, PrStatusValue, PullRequest};
use crate::repository::{RepositoryError, Transaction, TransactionManager};

#[derive(Debug, Clone)]
pub struct Input {
    pub pull_request_id: Uuid,
    pub name: String,
    pub author_id: Uuid,
}

#[derive(Debug, Clone)]
pub struct Output {
    pub pull_request: PullRequest,
    pub status: PrStatusValue,
    /// May be empty when the author has no eligible teammates.
    pub assigned_reviewers: Vec<Uuid>,
}

pub struct CreatePullRequest {
    transactions: Arc<dyn TransactionManager>,
    selector: ReviewerSelector,
    clock: Arc<dyn Clock>,
    metrics: Arc<dyn BusinessMetrics>,
    max_reviewers: usize,
}

impl CreatePullRequest {
    pub fn new(
        transactions: Arc<dyn TransactionManager>,
        selector: ReviewerSelector,
        clock: Arc<dyn Clock>,
        metrics: Arc<dyn BusinessMetrics>,
        max_reviewers: usize,
    ) -> Self {
        Self {
            transactions,
            selector,
            clock,
            metrics,
            max_reviewers,
        }
    }

    pub async fn run(&self, input: Input) -> AppResult<Output> {
        let tx = self
            .transactions
            .begin()
            .await
            .map_err(AppError::storage(StorageOp::BeginTransaction))?;
        let output = self.execute(tx.as_ref(), input, self.clock.now()).await?;
        tx.commit()
            .await
            .map_err(AppError::storage(StorageOp::CommitTransaction))?;

        self.metrics
            .pull_request_created(output.assigned_reviewers.len());
        Ok(output)
    }

    async fn execute(
        &self,
        tx: &dyn Transaction,
        input: Input,
        now: DateTime<Utc>,
    ) -> AppResult<Output> {
        debug!(pr_id = %input.pull_request_id, "Checking pull request does not exist");
        if tx
            .get_pull_request(input.pull_request_id)
            .await
            .map_err(AppError::storage(StorageOp::GetPullRequest))?
            .is_some()
        {
            return Err(AppError::PullRequestExists(input.pull_request_id));
        }

        let author = tx
            .get_user(input.author_id)
            .await
            .map_err(AppError::storage(StorageOp::GetUser))?
            .ok_or(AppError::AuthorNotFound(input.author_id))?;

        debug!(team_id = %author.team_id, "Loading active teammates");
        let teammates = tx
            .get_active_users_by_team(author.team_id)
            .await
            .map_err(AppError::storage(StorageOp::GetUsers))?;

        let status = PrStatus {
            id: Uuid::now_v7(),
            status: PrStatusValue::Open,
        };
        tx.save_pr_status(&status)
            .await
            .map_err(AppError::storage(StorageOp::SetPrStatus))?;

        let pull_request = tx
            .save_pull_request(&PullRequest {
                id: input.pull_request_id,
                name: input.name,
                author_id: author.id,
                status_id: status.id,
                created_at: now,
                merged_at: None,
            })
            .await
            .map_err(|err| match err {
                // Lost a race with a concurrent create of the same id
                RepositoryError::Constraint(_) => {
                    AppError::PullRequestExists(input.pull_request_id)
                }
                other => AppError::storage(StorageOp::SavePullRequest)(other),
            })?;

        let selected =
            self.selector
                .select(&teammates, author.id, &HashSet::new(), self.max_reviewers);

        let mut assigned_reviewers = Vec::with_capacity(selected.len());
        for reviewer in &selected {
            tx.save_pr_reviewer(&PrReviewer {
                id: Uuid::now_v7(),
                pr_id: pull_request.id,
                reviewer_id: reviewer.id,
            })
            .await
            .map_err(AppError::storage(StorageOp::AssignReviewer))?;
            assigned_reviewers.push(reviewer.id);
        }

        debug!(
            pr_id = %pull_request.id,
            reviewers = assigned_reviewers.len(),
            "Pull request created"
        );
        Ok(Output {
            pull_request,
            status: status.status,
            assigned_reviewers,
        })
    }
}
