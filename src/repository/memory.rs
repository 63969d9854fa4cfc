//! In-memory implementation of the repository contracts.
//!
//! Transactions are serialized: `begin` takes an owned lock on the committed
//! tables and works on a private copy, which replaces the committed tables on
//! `commit`. Dropping an uncommitted transaction discards the copy.
//!
//! The store also records how many write calls were attempted and can be told
//! to fail specific calls, which lets workflow tests assert read-only paths
//! and rollback behaviour.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use super::{
    PrReviewerRepository, PrStatusRepository, PullRequestRepository, RepoResult,
    RepositoryError, TeamRepository, Transaction, TransactionManager, UserRepository,
};
use crate::models::{PrReviewer, PrStatus, PullRequest, Team, User};

/// Committed contents of the store. Row order is insertion order.
#[derive(Debug, Clone, Default)]
pub struct StoreSnapshot {
    pub teams: Vec<Team>,
    pub users: Vec<User>,
    pub pull_requests: Vec<PullRequest>,
    pub statuses: Vec<PrStatus>,
    pub reviewers: Vec<PrReviewer>,
}

impl StoreSnapshot {
    /// Reviewer ids currently assigned to a pull request.
    pub fn reviewer_ids(&self, pr_id: Uuid) -> Vec<Uuid> {
        self.reviewers
            .iter()
            .filter(|r| r.pr_id == pr_id)
            .map(|r| r.reviewer_id)
            .collect()
    }

    pub fn user(&self, id: Uuid) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn pull_request(&self, id: Uuid) -> Option<&PullRequest> {
        self.pull_requests.iter().find(|pr| pr.id == id)
    }

    pub fn status(&self, id: Uuid) -> Option<&PrStatus> {
        self.statuses.iter().find(|s| s.id == id)
    }
}

#[derive(Default)]
struct Instrumentation {
    writes: AtomicUsize,
    faults: std::sync::Mutex<HashMap<&'static str, Fault>>,
}

#[derive(Debug, Clone, Copy)]
enum FaultKind {
    Backend,
    Constraint,
}

/// Successful calls allowed before the injected failure, and its kind.
#[derive(Debug, Clone, Copy)]
struct Fault {
    remaining: usize,
    kind: FaultKind,
}

impl Instrumentation {
    fn check(&self, method: &'static str) -> RepoResult<()> {
        let mut faults = match self.faults.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match faults.get_mut(method) {
            Some(Fault { remaining: 0, kind }) => {
                let kind = *kind;
                faults.remove(method);
                Err(match kind {
                    FaultKind::Backend => {
                        RepositoryError::Backend(format!("injected failure in {}", method))
                    }
                    FaultKind::Constraint => RepositoryError::Constraint(format!(
                        "injected constraint violation in {}",
                        method
                    )),
                })
            }
            Some(fault) => {
                fault.remaining -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn write(&self, method: &'static str) -> RepoResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.check(method)
    }
}

/// In-memory store implementing [`TransactionManager`].
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<StoreSnapshot>>,
    instrumentation: Arc<Instrumentation>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mutate committed tables directly, bypassing instrumentation.
    pub async fn seed(&self, f: impl FnOnce(&mut StoreSnapshot)) {
        let mut tables = self.tables.lock().await;
        f(&mut tables);
    }

    /// Copy of the committed tables.
    pub async fn snapshot(&self) -> StoreSnapshot {
        self.tables.lock().await.clone()
    }

    /// Number of write calls attempted through transactions so far.
    pub fn write_count(&self) -> usize {
        self.instrumentation.writes.load(Ordering::SeqCst)
    }

    /// Make the next call to `method` fail.
    pub fn fail_on(&self, method: &'static str) {
        self.fail_after(method, 0);
    }

    /// Let `successes` calls to `method` succeed, then fail the next one.
    pub fn fail_after(&self, method: &'static str, successes: usize) {
        self.inject(
            method,
            Fault {
                remaining: successes,
                kind: FaultKind::Backend,
            },
        );
    }

    /// Make the next call to `method` fail as if a concurrent writer had
    /// already claimed the row.
    pub fn conflict_on(&self, method: &'static str) {
        self.inject(
            method,
            Fault {
                remaining: 0,
                kind: FaultKind::Constraint,
            },
        );
    }

    fn inject(&self, method: &'static str, fault: Fault) {
        let mut faults = match self.instrumentation.faults.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        faults.insert(method, fault);
    }
}

#[async_trait]
impl TransactionManager for InMemoryStore {
    async fn begin(&self) -> RepoResult<Box<dyn Transaction>> {
        self.instrumentation.check("begin")?;
        let committed = self.tables.clone().lock_owned().await;
        let working = committed.clone();
        Ok(Box::new(InMemoryTransaction {
            committed,
            working: Mutex::new(working),
            instrumentation: self.instrumentation.clone(),
        }))
    }
}

/// Transaction over [`InMemoryStore`].
pub struct InMemoryTransaction {
    committed: OwnedMutexGuard<StoreSnapshot>,
    working: Mutex<StoreSnapshot>,
    instrumentation: Arc<Instrumentation>,
}

#[async_trait]
impl Transaction for InMemoryTransaction {
    async fn commit(self: Box<Self>) -> RepoResult<()> {
        self.instrumentation.check("commit")?;
        let InMemoryTransaction {
            mut committed,
            working,
            ..
        } = *self;
        *committed = working.into_inner();
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryTransaction {
    async fn get_user(&self, id: Uuid) -> RepoResult<Option<User>> {
        self.instrumentation.check("get_user")?;
        Ok(self.working.lock().await.user(id).cloned())
    }

    async fn get_users_by_ids(&self, ids: &[Uuid]) -> RepoResult<Vec<User>> {
        self.instrumentation.check("get_users_by_ids")?;
        let tables = self.working.lock().await;
        Ok(tables
            .users
            .iter()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }

    async fn get_users_by_team(&self, team_id: Uuid) -> RepoResult<Vec<User>> {
        self.instrumentation.check("get_users_by_team")?;
        let tables = self.working.lock().await;
        Ok(tables
            .users
            .iter()
            .filter(|u| u.team_id == team_id)
            .cloned()
            .collect())
    }

    async fn get_active_users_by_team(&self, team_id: Uuid) -> RepoResult<Vec<User>> {
        self.instrumentation.check("get_active_users_by_team")?;
        let tables = self.working.lock().await;
        Ok(tables
            .users
            .iter()
            .filter(|u| u.team_id == team_id && u.is_active)
            .cloned()
            .collect())
    }

    async fn update_user(&self, user: &User) -> RepoResult<User> {
        self.instrumentation.write("update_user")?;
        let mut tables = self.working.lock().await;
        update_user_row(&mut tables, user)
    }

    async fn save_users(&self, users: &[User]) -> RepoResult<Vec<User>> {
        self.instrumentation.write("save_users")?;
        let mut tables = self.working.lock().await;
        for user in users {
            if tables.user(user.id).is_some() {
                return Err(RepositoryError::Constraint(format!(
                    "user {} already exists",
                    user.id
                )));
            }
            if !tables.teams.iter().any(|t| t.id == user.team_id) {
                return Err(RepositoryError::Constraint(format!(
                    "team {} does not exist",
                    user.team_id
                )));
            }
            tables.users.push(user.clone());
        }
        Ok(users.to_vec())
    }

    async fn update_users(&self, users: &[User]) -> RepoResult<Vec<User>> {
        self.instrumentation.write("update_users")?;
        let mut tables = self.working.lock().await;
        users
            .iter()
            .map(|user| update_user_row(&mut tables, user))
            .collect()
    }
}

fn update_user_row(tables: &mut StoreSnapshot, user: &User) -> RepoResult<User> {
    let row = tables
        .users
        .iter_mut()
        .find(|u| u.id == user.id)
        .ok_or(RepositoryError::MissingRow {
            entity: "user",
            id: user.id,
        })?;
    row.name = user.name.clone();
    row.is_active = user.is_active;
    row.team_id = user.team_id;
    Ok(row.clone())
}

#[async_trait]
impl TeamRepository for InMemoryTransaction {
    async fn save_team(&self, team: &Team) -> RepoResult<Team> {
        self.instrumentation.write("save_team")?;
        let mut tables = self.working.lock().await;
        if tables.teams.iter().any(|t| t.name == team.name) {
            return Err(RepositoryError::Constraint(format!(
                "team name {} already taken",
                team.name
            )));
        }
        tables.teams.push(team.clone());
        Ok(team.clone())
    }

    async fn get_team(&self, id: Uuid) -> RepoResult<Option<Team>> {
        self.instrumentation.check("get_team")?;
        let tables = self.working.lock().await;
        Ok(tables.teams.iter().find(|t| t.id == id).cloned())
    }

    async fn get_team_by_name(&self, name: &str) -> RepoResult<Option<Team>> {
        self.instrumentation.check("get_team_by_name")?;
        let tables = self.working.lock().await;
        Ok(tables.teams.iter().find(|t| t.name == name).cloned())
    }
}

#[async_trait]
impl PullRequestRepository for InMemoryTransaction {
    async fn save_pull_request(&self, pr: &PullRequest) -> RepoResult<PullRequest> {
        self.instrumentation.write("save_pull_request")?;
        let mut tables = self.working.lock().await;
        if tables.pull_request(pr.id).is_some() {
            return Err(RepositoryError::Constraint(format!(
                "pull request {} already exists",
                pr.id
            )));
        }
        tables.pull_requests.push(pr.clone());
        Ok(pr.clone())
    }

    async fn get_pull_request(&self, id: Uuid) -> RepoResult<Option<PullRequest>> {
        self.instrumentation.check("get_pull_request")?;
        Ok(self.working.lock().await.pull_request(id).cloned())
    }

    async fn get_pull_requests(&self, ids: &[Uuid]) -> RepoResult<Vec<PullRequest>> {
        self.instrumentation.check("get_pull_requests")?;
        let tables = self.working.lock().await;
        Ok(tables
            .pull_requests
            .iter()
            .filter(|pr| ids.contains(&pr.id))
            .cloned()
            .collect())
    }

    async fn mark_pull_request_merged(
        &self,
        id: Uuid,
        merged_at: DateTime<Utc>,
    ) -> RepoResult<PullRequest> {
        self.instrumentation.write("mark_pull_request_merged")?;
        let mut tables = self.working.lock().await;
        let row = tables
            .pull_requests
            .iter_mut()
            .find(|pr| pr.id == id)
            .ok_or(RepositoryError::MissingRow {
                entity: "pull request",
                id,
            })?;
        row.merged_at = Some(merged_at);
        Ok(row.clone())
    }
}

#[async_trait]
impl PrStatusRepository for InMemoryTransaction {
    async fn save_pr_status(&self, status: &PrStatus) -> RepoResult<PrStatus> {
        self.instrumentation.write("save_pr_status")?;
        self.working.lock().await.statuses.push(*status);
        Ok(*status)
    }

    async fn get_pr_status(&self, id: Uuid) -> RepoResult<Option<PrStatus>> {
        self.instrumentation.check("get_pr_status")?;
        Ok(self.working.lock().await.status(id).copied())
    }

    async fn get_pr_statuses(&self, ids: &[Uuid]) -> RepoResult<Vec<PrStatus>> {
        self.instrumentation.check("get_pr_statuses")?;
        let tables = self.working.lock().await;
        Ok(tables
            .statuses
            .iter()
            .filter(|s| ids.contains(&s.id))
            .copied()
            .collect())
    }

    async fn update_pr_status(&self, status: &PrStatus) -> RepoResult<PrStatus> {
        self.instrumentation.write("update_pr_status")?;
        let mut tables = self.working.lock().await;
        let row = tables
            .statuses
            .iter_mut()
            .find(|s| s.id == status.id)
            .ok_or(RepositoryError::MissingRow {
                entity: "pr status",
                id: status.id,
            })?;
        row.status = status.status;
        Ok(*row)
    }
}

#[async_trait]
impl PrReviewerRepository for InMemoryTransaction {
    async fn save_pr_reviewer(&self, reviewer: &PrReviewer) -> RepoResult<PrReviewer> {
        self.instrumentation.write("save_pr_reviewer")?;
        let mut tables = self.working.lock().await;
        if tables
            .reviewers
            .iter()
            .any(|r| r.pr_id == reviewer.pr_id && r.reviewer_id == reviewer.reviewer_id)
        {
            return Err(RepositoryError::Constraint(format!(
                "reviewer {} already assigned to {}",
                reviewer.reviewer_id, reviewer.pr_id
            )));
        }
        tables.reviewers.push(*reviewer);
        Ok(*reviewer)
    }

    async fn get_reviewers_by_pr(&self, pr_id: Uuid) -> RepoResult<Vec<PrReviewer>> {
        self.instrumentation.check("get_reviewers_by_pr")?;
        let tables = self.working.lock().await;
        Ok(tables
            .reviewers
            .iter()
            .filter(|r| r.pr_id == pr_id)
            .copied()
            .collect())
    }

    async fn get_assignments_by_reviewer(&self, reviewer_id: Uuid) -> RepoResult<Vec<PrReviewer>> {
        self.instrumentation.check("get_assignments_by_reviewer")?;
        let tables = self.working.lock().await;
        Ok(tables
            .reviewers
            .iter()
            .filter(|r| r.reviewer_id == reviewer_id)
            .copied()
            .collect())
    }

    async fn get_assignments_by_reviewers(
        &self,
        reviewer_ids: &[Uuid],
    ) -> RepoResult<Vec<PrReviewer>> {
        self.instrumentation.check("get_assignments_by_reviewers")?;
        let tables = self.working.lock().await;
        Ok(tables
            .reviewers
            .iter()
            .filter(|r| reviewer_ids.contains(&r.reviewer_id))
            .copied()
            .collect())
    }

    async fn get_all_pr_reviewers(&self) -> RepoResult<Vec<PrReviewer>> {
        self.instrumentation.check("get_all_pr_reviewers")?;
        Ok(self.working.lock().await.reviewers.clone())
    }

    async fn delete_pr_reviewer(&self, pr_id: Uuid, reviewer_id: Uuid) -> RepoResult<()> {
        self.instrumentation.write("delete_pr_reviewer")?;
        self.working
            .lock()
            .await
            .reviewers
            .retain(|r| !(r.pr_id == pr_id && r.reviewer_id == reviewer_id));
        Ok(())
    }
}
