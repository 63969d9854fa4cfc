//! Bulk deactivation of team members with reviewer backfill.
//!
//! Deactivating a user leaves stale reviewer assignments on open pull
//! requests. This workflow deactivates the requested users and then, per
//! affected pull request, replaces each vacated reviewer slot with an eligible
//! teammate. When the team has nobody left to offer, the vacated slots are
//! simply removed.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use super::metrics::BusinessMetrics;
use super::reviewer_selection::ReviewerSelector;
use crate::error::{AppError, AppResult, StorageOp};
use crate::models::{PrReviewer, PrStatusValue, PullRequestShort, Team, User};
use crate::repository::{Transaction, TransactionManager};

#[derive(Debug, Clone)]
pub struct Input {
    pub team_name: String,
    pub user_ids: Vec<Uuid>,
}

#[derive(Debug, Clone)]
pub struct Output {
    pub team: Team,
    /// Every member of the team after deactivation.
    pub members: Vec<User>,
    pub affected_pull_requests: Vec<PullRequestShort>,
}

pub struct DeactivateTeamUsers {
    transactions: Arc<dyn TransactionManager>,
    selector: ReviewerSelector,
    metrics: Arc<dyn BusinessMetrics>,
}

/// Result of the per pull request cascade.
enum Cascade {
    /// No reviewers at all; reported as-is.
    Untouched,
    /// None of the current reviewers is being deactivated.
    Skipped,
    Reassigned { added: usize, removed: usize },
}

impl DeactivateTeamUsers {
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
        let (output, deactivated) = self.execute(tx.as_ref(), input).await?;
        tx.commit()
            .await
            .map_err(AppError::storage(StorageOp::CommitTransaction))?;

        self.metrics.users_deactivated(deactivated);
        Ok(output)
    }

    async fn execute(&self, tx: &dyn Transaction, input: Input) -> AppResult<(Output, usize)> {
        let team = tx
            .get_team_by_name(&input.team_name)
            .await
            .map_err(AppError::storage(StorageOp::GetTeam))?
            .ok_or_else(|| AppError::TeamNotFound(input.team_name.clone()))?;

        let mut seen = HashSet::new();
        let requested: Vec<Uuid> = input
            .user_ids
            .into_iter()
            .filter(|id| seen.insert(*id))
            .collect();

        debug!(team_name = %team.name, users = requested.len(), "Loading users to deactivate");
        let users = tx
            .get_users_by_ids(&requested)
            .await
            .map_err(AppError::storage(StorageOp::GetUsers))?;
        if users.is_empty() {
            return Err(AppError::UsersByIdsNotFound);
        }
        if let Some(stranger) = users.iter().find(|u| u.team_id != team.id) {
            return Err(AppError::UserNotBelongsToTeam {
                user_id: stranger.id,
                team_name: team.name.clone(),
            });
        }
        let loaded: HashSet<Uuid> = users.iter().map(|u| u.id).collect();
        if let Some(missing) = requested.iter().find(|id| !loaded.contains(id)) {
            return Err(AppError::UserNotFound(*missing));
        }

        let affected = self.find_affected_pull_requests(tx, &requested).await?;

        let to_update: Vec<User> = users
            .iter()
            .filter(|u| u.is_active)
            .map(|u| User {
                is_active: false,
                ..u.clone()
            })
            .collect();
        if !to_update.is_empty() {
            tx.update_users(&to_update)
                .await
                .map_err(AppError::storage(StorageOp::UpdateUsersBatch))?;
        }

        let mut affected_pull_requests = Vec::with_capacity(affected.len());
        for pr in affected {
            match self.cascade(tx, &pr, &loaded).await? {
                Cascade::Skipped => continue,
                Cascade::Untouched => {
                    debug!(pr_id = %pr.pull_request_id, "Pull request has no reviewers");
                }
                Cascade::Reassigned { added, removed } => {
                    debug!(
                        pr_id = %pr.pull_request_id,
                        added,
                        removed,
                        "Reviewers reassigned"
                    );
                }
            }
            affected_pull_requests.push(pr);
        }

        let members = tx
            .get_users_by_team(team.id)
            .await
            .map_err(AppError::storage(StorageOp::GetUsers))?;

        Ok((
            Output {
                team,
                members,
                affected_pull_requests,
            },
            to_update.len(),
        ))
    }

    /// Open pull requests on which any of `user_ids` is a reviewer.
    async fn find_affected_pull_requests(
        &self,
        tx: &dyn Transaction,
        user_ids: &[Uuid],
    ) -> AppResult<Vec<PullRequestShort>> {
        let assignments = tx
            .get_assignments_by_reviewers(user_ids)
            .await
            .map_err(AppError::storage(StorageOp::GetPrReviewers))?;
        if assignments.is_empty() {
            return Err(AppError::NoUsersAssignedToPrs);
        }

        let mut seen = HashSet::new();
        let pr_ids: Vec<Uuid> = assignments
            .iter()
            .map(|a| a.pr_id)
            .filter(|id| seen.insert(*id))
            .collect();

        let pull_requests = tx
            .get_pull_requests(&pr_ids)
            .await
            .map_err(AppError::storage(StorageOp::GetPullRequest))?;
        let status_ids: Vec<Uuid> = pull_requests.iter().map(|pr| pr.status_id).collect();
        let statuses = tx
            .get_pr_statuses(&status_ids)
            .await
            .map_err(AppError::storage(StorageOp::GetPrStatus))?;

        let mut affected = Vec::new();
        for pr in &pull_requests {
            match statuses.iter().find(|s| s.id == pr.status_id) {
                Some(status) if status.status == PrStatusValue::Open => {
                    affected.push(PullRequestShort::new(pr, status.status));
                }
                Some(_) => {}
                None => debug!(pr_id = %pr.id, "Status not found for pull request, skipping"),
            }
        }

        debug!(
            total = pull_requests.len(),
            open = affected.len(),
            "Found affected pull requests"
        );
        if affected.is_empty() {
            return Err(AppError::NoPrsToAffect);
        }
        Ok(affected)
    }

    async fn cascade(
        &self,
        tx: &dyn Transaction,
        pr: &PullRequestShort,
        deactivated: &HashSet<Uuid>,
    ) -> AppResult<Cascade> {
        let pr_id = pr.pull_request_id;
        let current: Vec<Uuid> = tx
            .get_reviewers_by_pr(pr_id)
            .await
            .map_err(AppError::storage(StorageOp::GetPrReviewers))?
            .into_iter()
            .map(|r| r.reviewer_id)
            .collect();
        if current.is_empty() {
            return Ok(Cascade::Untouched);
        }

        let vacated: Vec<Uuid> = current
            .iter()
            .copied()
            .filter(|id| deactivated.contains(id))
            .collect();
        if vacated.is_empty() {
            return Ok(Cascade::Skipped);
        }

        let author = tx
            .get_user(pr.author_id)
            .await
            .map_err(AppError::storage(StorageOp::GetUser))?
            .ok_or(AppError::AuthorNotFound(pr.author_id))?;
        let teammates = tx
            .get_active_users_by_team(author.team_id)
            .await
            .map_err(AppError::storage(StorageOp::GetUsers))?;

        let exclude: HashSet<Uuid> = current.iter().copied().collect();
        let replacements = self
            .selector
            .select(&teammates, author.id, &exclude, vacated.len());

        if replacements.is_empty() {
            warn!(
                pr_id = %pr_id,
                team_id = %author.team_id,
                "No available reviewers, removing vacated slots only"
            );
        }

        for reviewer in &replacements {
            tx.save_pr_reviewer(&PrReviewer {
                id: Uuid::now_v7(),
                pr_id,
                reviewer_id: reviewer.id,
            })
            .await
            .map_err(AppError::storage(StorageOp::AssignReviewer))?;
        }
        for reviewer_id in &vacated {
            tx.delete_pr_reviewer(pr_id, *reviewer_id)
                .await
                .map_err(AppError::storage(StorageOp::RemoveReviewer))?;
        }

        Ok(Cascade::Reassigned {
            added: replacements.len(),
            removed: vacated.len(),
        })
    }
}
