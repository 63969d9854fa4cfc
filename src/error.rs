//! Domain error types for the PR reviewers server.
//!
//! Every workflow returns an already classified [`AppError`]. Expected absence
//! becomes a specific not-found or business-rule variant; unexpected repository
//! failures become [`AppError::Storage`], tagged with the step that failed.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use std::fmt;
use uuid::Uuid;

use crate::repository::RepositoryError;

/// Storage step that failed, used to tag infrastructure errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageOp {
    BeginTransaction,
    CommitTransaction,
    GetTeam,
    SaveTeam,
    GetUser,
    GetUsers,
    SaveUsersBatch,
    UpdateUsersBatch,
    UpdateUser,
    GetPullRequest,
    SavePullRequest,
    GetPrStatus,
    SetPrStatus,
    UpdatePrStatus,
    UpdatePrMergeTime,
    GetPrReviewers,
    AssignReviewer,
    RemoveReviewer,
}

impl StorageOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BeginTransaction => "begin transaction",
            Self::CommitTransaction => "commit transaction",
            Self::GetTeam => "get team",
            Self::SaveTeam => "save team",
            Self::GetUser => "get user",
            Self::GetUsers => "get users",
            Self::SaveUsersBatch => "save users batch",
            Self::UpdateUsersBatch => "update users batch",
            Self::UpdateUser => "update user",
            Self::GetPullRequest => "get pull request",
            Self::SavePullRequest => "save pull request",
            Self::GetPrStatus => "get pr status",
            Self::SetPrStatus => "save pr status",
            Self::UpdatePrStatus => "update pr status",
            Self::UpdatePrMergeTime => "update pr merge time",
            Self::GetPrReviewers => "get assigned reviewers",
            Self::AssignReviewer => "assign reviewer",
            Self::RemoveReviewer => "remove reviewer",
        }
    }
}

impl fmt::Display for StorageOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Application-level errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("team {0} not found")]
    TeamNotFound(String),

    #[error("user {0} not found")]
    UserNotFound(Uuid),

    #[error("pull request {0} not found")]
    PullRequestNotFound(Uuid),

    #[error("author {0} not found")]
    AuthorNotFound(Uuid),

    #[error("reviewer {0} is not assigned to this pull request")]
    ReviewerNotFound(Uuid),

    #[error("none of the requested users exist")]
    UsersByIdsNotFound,

    #[error("no reviewer assignments exist")]
    PrsReviewersNotFound,

    #[error("pull request {0} already exists")]
    PullRequestExists(Uuid),

    #[error("pull request {0} is already merged")]
    PullRequestAlreadyMerged(Uuid),

    #[error("user {user_id} does not belong to team {team_name}")]
    UserNotBelongsToTeam { user_id: Uuid, team_name: String },

    #[error("duplicate user id {0} in request")]
    DuplicateUsers(Uuid),

    #[error("user {0} already has the requested is_active value")]
    UserDontNeedChange(Uuid),

    #[error("team {0} exists and no users were added or changed")]
    NoUsersWereUpdated(String),

    #[error("no available reviewers in team {0}")]
    NoAvailableReviewers(Uuid),

    #[error("user {0} is not assigned to any pull request")]
    NoActiveReviewers(Uuid),

    #[error("no open pull requests are affected")]
    NoPrsToAffect,

    #[error("none of the users are assigned to pull requests")]
    NoUsersAssignedToPrs,

    #[error("failed to {op}")]
    Storage {
        op: StorageOp,
        #[source]
        source: RepositoryError,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl AppError {
    /// Build a mapper that tags a repository error with the failed step.
    ///
    /// ```ignore
    /// tx.get_user(id).await.map_err(AppError::storage(StorageOp::GetUser))?;
    /// ```
    pub fn storage(op: StorageOp) -> impl FnOnce(RepositoryError) -> AppError {
        move |source| AppError::Storage { op, source }
    }

    /// A row that must exist by referential integrity was not found.
    pub fn missing_row(op: StorageOp, entity: &'static str, id: Uuid) -> AppError {
        AppError::Storage {
            op,
            source: RepositoryError::MissingRow { entity, id },
        }
    }

    /// Machine-readable error code returned to clients.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::TeamNotFound(_)
            | AppError::UserNotFound(_)
            | AppError::PullRequestNotFound(_)
            | AppError::AuthorNotFound(_)
            | AppError::ReviewerNotFound(_)
            | AppError::UsersByIdsNotFound
            | AppError::PrsReviewersNotFound
            | AppError::NoActiveReviewers(_)
            | AppError::NoPrsToAffect
            | AppError::NoUsersAssignedToPrs => "NOT_FOUND",
            AppError::NoAvailableReviewers(_) => "NO_CANDIDATE",
            AppError::PullRequestExists(_) => "PR_EXISTS",
            AppError::PullRequestAlreadyMerged(_) => "PR_MERGED",
            AppError::NoUsersWereUpdated(_) => "TEAM_EXISTS",
            AppError::UserDontNeedChange(_) => "NOT_MODIFIED",
            AppError::UserNotBelongsToTeam { .. }
            | AppError::DuplicateUsers(_)
            | AppError::InvalidInput(_) => "BAD_REQUEST",
            AppError::Storage { .. } => "INTERNAL_ERROR",
        }
    }

    /// Returns true for errors caused by a failing store rather than the request.
    pub fn is_infrastructure(&self) -> bool {
        matches!(self, AppError::Storage { .. })
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::TeamNotFound(_)
            | AppError::UserNotFound(_)
            | AppError::PullRequestNotFound(_)
            | AppError::AuthorNotFound(_)
            | AppError::ReviewerNotFound(_)
            | AppError::UsersByIdsNotFound
            | AppError::PrsReviewersNotFound
            | AppError::NoActiveReviewers(_)
            | AppError::NoPrsToAffect
            | AppError::NoUsersAssignedToPrs
            | AppError::NoAvailableReviewers(_) => StatusCode::NOT_FOUND,
            AppError::PullRequestExists(_)
            | AppError::DuplicateUsers(_)
            | AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::PullRequestAlreadyMerged(_) | AppError::UserNotBelongsToTeam { .. } => {
                StatusCode::CONFLICT
            }
            AppError::UserDontNeedChange(_) | AppError::NoUsersWereUpdated(_) => {
                StatusCode::NOT_MODIFIED
            }
            AppError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.is_infrastructure() {
            tracing::error!(error = ?self, "Storage error");
        }
        let message = match self {
            AppError::Storage { op, .. } => {
                format!("An internal error occurred while trying to {}", op)
            }
            _ => self.to_string(),
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.code().to_string(),
            message,
        })
    }
}

/// Error response body matching OpenAPI schema.
#[derive(Debug, serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}
