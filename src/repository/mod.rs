//! Repository contracts consumed by the workflows.
//!
//! Workflows never talk to a database directly. They open a [`Transaction`]
//! through a [`TransactionManager`] and perform every read and write through
//! that handle. Committing is explicit; dropping the handle without calling
//! [`Transaction::commit`] rolls back everything done through it.
//!
//! Two backends implement these traits: PostgreSQL via SeaORM (`crate::db`)
//! and [`InMemoryStore`], used by tests and local experiments.

mod memory;

pub use memory::{InMemoryStore, InMemoryTransaction, StoreSnapshot};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{PrReviewer, PrStatus, PullRequest, Team, User};

/// Errors raised by repository implementations.
///
/// Absence is not an error: single-row reads return `Ok(None)` and multi-row
/// reads return an empty `Vec`.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// An update targeted a row that does not exist.
    #[error("{entity} {id} does not exist")]
    MissingRow { entity: &'static str, id: Uuid },

    /// A stored value could not be mapped to the domain model.
    #[error("invalid stored value: {0}")]
    InvalidData(String),

    /// Uniqueness or foreign key violation detected by the store.
    #[error("constraint violation: {0}")]
    Constraint(String),

    /// Backend specific failure without a richer type.
    #[error("{0}")]
    Backend(String),
}

pub type RepoResult<T> = Result<T, RepositoryError>;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_user(&self, id: Uuid) -> RepoResult<Option<User>>;

    /// Users matching any of `ids`. Unknown ids are silently skipped.
    async fn get_users_by_ids(&self, ids: &[Uuid]) -> RepoResult<Vec<User>>;

    async fn get_users_by_team(&self, team_id: Uuid) -> RepoResult<Vec<User>>;

    async fn get_active_users_by_team(&self, team_id: Uuid) -> RepoResult<Vec<User>>;

    /// Overwrite name, activity flag and team of an existing user.
    async fn update_user(&self, user: &User) -> RepoResult<User>;

    async fn save_users(&self, users: &[User]) -> RepoResult<Vec<User>>;

    async fn update_users(&self, users: &[User]) -> RepoResult<Vec<User>>;
}

#[async_trait]
pub trait TeamRepository: Send + Sync {
    async fn save_team(&self, team: &Team) -> RepoResult<Team>;

    async fn get_team(&self, id: Uuid) -> RepoResult<Option<Team>>;

    async fn get_team_by_name(&self, name: &str) -> RepoResult<Option<Team>>;
}

#[async_trait]
pub trait PullRequestRepository: Send + Sync {
    async fn save_pull_request(&self, pr: &PullRequest) -> RepoResult<PullRequest>;

    async fn get_pull_request(&self, id: Uuid) -> RepoResult<Option<PullRequest>>;

    async fn get_pull_requests(&self, ids: &[Uuid]) -> RepoResult<Vec<PullRequest>>;

    async fn mark_pull_request_merged(
        &self,
        id: Uuid,
        merged_at: DateTime<Utc>,
    ) -> RepoResult<PullRequest>;
}

#[async_trait]
pub trait PrStatusRepository: Send + Sync {
    async fn save_pr_status(&self, status: &PrStatus) -> RepoResult<PrStatus>;

    async fn get_pr_status(&self, id: Uuid) -> RepoResult<Option<PrStatus>>;

    async fn get_pr_statuses(&self, ids: &[Uuid]) -> RepoResult<Vec<PrStatus>>;

    /// Mutate the status value in place.
    async fn update_pr_status(&self, status: &PrStatus) -> RepoResult<PrStatus>;
}

#[async_trait]
pub trait PrReviewerRepository: Send + Sync {
    async fn save_pr_reviewer(&self, reviewer: &PrReviewer) -> RepoResult<PrReviewer>;

    async fn get_reviewers_by_pr(&self, pr_id: Uuid) -> RepoResult<Vec<PrReviewer>>;

    async fn get_assignments_by_reviewer(&self, reviewer_id: Uuid) -> RepoResult<Vec<PrReviewer>>;

    async fn get_assignments_by_reviewers(
        &self,
        reviewer_ids: &[Uuid],
    ) -> RepoResult<Vec<PrReviewer>>;

    async fn get_all_pr_reviewers(&self) -> RepoResult<Vec<PrReviewer>>;

    async fn delete_pr_reviewer(&self, pr_id: Uuid, reviewer_id: Uuid) -> RepoResult<()>;
}

/// Transaction-scoped access to every repository.
#[async_trait]
pub trait Transaction:
    UserRepository + TeamRepository + PullRequestRepository + PrStatusRepository + PrReviewerRepository
{
    /// Make every write performed through this handle visible to others.
    async fn commit(self: Box<Self>) -> RepoResult<()>;
}

/// Opens transactions against a backing store.
#[async_trait]
pub trait TransactionManager: Send + Sync {
    async fn begin(&self) -> RepoResult<Box<dyn Transaction>>;
}
