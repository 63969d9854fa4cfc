//! Reviewer assignment counts.

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::error::{AppError, AppResult, StorageOp};
use crate::models::ReviewerStats;
use crate::repository::TransactionManager;

pub struct ReviewerStatistics {
    transactions: Arc<dyn TransactionManager>,
}

impl ReviewerStatistics {
    pub fn new(transactions: Arc<dyn TransactionManager>) -> Self {
        Self { transactions }
    }

    /// Assignment count per reviewer, busiest first.
    pub async fn run(&self) -> AppResult<Vec<ReviewerStats>> {
        let tx = self
            .transactions
            .begin()
            .await
            .map_err(AppError::storage(StorageOp::BeginTransaction))?;
        let assignments = tx
            .get_all_pr_reviewers()
            .await
            .map_err(AppError::storage(StorageOp::GetPrReviewers))?;
        tx.commit()
            .await
            .map_err(AppError::storage(StorageOp::CommitTransaction))?;

        if assignments.is_empty() {
            return Err(AppError::PrsReviewersNotFound);
        }

        let mut counts: HashMap<Uuid, u64> = HashMap::new();
        for assignment in &assignments {
            *counts.entry(assignment.reviewer_id).or_default() += 1;
        }

        let mut stats: Vec<ReviewerStats> = counts
            .into_iter()
            .map(|(reviewer_id, assignment_count)| ReviewerStats {
                reviewer_id,
                assignment_count,
            })
            .collect();
        stats.sort_by(|a, b| {
            b.assignment_count
                .cmp(&a.assignment_count)
                .then_with(|| a.reviewer_id.cmp(&b.reviewer_id))
        });
        Ok(stats)
    }
}
