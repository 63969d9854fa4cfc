//! Toggle a single user's activity flag.
//!
//! Existing reviewer assignments are left alone; use the team deactivation
//! workflow to cascade.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::error::{AppError, AppResult, StorageOp};
use crate::models::{Team, User};
use crate::repository::{Transaction, TransactionManager};

#[derive(Debug, Clone)]
pub struct Input {
    pub user_id: Uuid,
    pub is_active: bool,
}

#[derive(Debug, Clone)]
pub struct Output {
    pub user: User,
    pub team: Team,
}

pub struct SetIsActive {
    transactions: Arc<dyn TransactionManager>,
}

impl SetIsActive {
    pub fn new(transactions: Arc<dyn TransactionManager>) -> Self {
        Self { transactions }
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
        Ok(output)
    }

    async fn execute(&self, tx: &dyn Transaction, input: Input) -> AppResult<Output> {
        let user = tx
            .get_user(input.user_id)
            .await
            .map_err(AppError::storage(StorageOp::GetUser))?
            .ok_or(AppError::UserNotFound(input.user_id))?;
        let team = tx
            .get_team(user.team_id)
            .await
            .map_err(AppError::storage(StorageOp::GetTeam))?
            .ok_or_else(|| AppError::missing_row(StorageOp::GetTeam, "team", user.team_id))?;

        if user.is_active == input.is_active {
            debug!(user_id = %user.id, is_active = user.is_active, "User already in requested state");
            return Err(AppError::UserDontNeedChange(user.id));
        }

        let user = tx
            .update_user(&User {
                is_active: input.is_active,
                ..user
            })
            .await
            .map_err(AppError::storage(StorageOp::UpdateUser))?;

        Ok(Output { user, team })
    }
}
