//! Team lookup by name.

use std::sync::Arc;

use crate::error::{AppError, AppResult, StorageOp};
use crate::models::{Team, User};
use crate::repository::TransactionManager;

#[derive(Debug, Clone)]
pub struct Output {
    pub team: Team,
    pub members: Vec<User>,
}

pub struct GetTeam {
    transactions: Arc<dyn TransactionManager>,
}

impl GetTeam {
    pub fn new(transactions: Arc<dyn TransactionManager>) -> Self {
        Self { transactions }
    }

    pub async fn run(&self, team_name: &str) -> AppResult<Output> {
        let tx = self
            .transactions
            .begin()
            .await
            .map_err(AppError::storage(StorageOp::BeginTransaction))?;

        let team = tx
            .get_team_by_name(team_name)
            .await
            .map_err(AppError::storage(StorageOp::GetTeam))?
            .ok_or_else(|| AppError::TeamNotFound(team_name.to_string()))?;
        let members = tx
            .get_users_by_team(team.id)
            .await
            .map_err(AppError::storage(StorageOp::GetUsers))?;

        tx.commit()
            .await
            .map_err(AppError::storage(StorageOp::CommitTransaction))?;
        Ok(Output { team, members })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryStore;
    use crate::services::tests_support::seed_team;

    #[tokio::test]
    async fn test_returns_all_members() {
        let store = InMemoryStore::new();
        let seeded = seed_team(&store, "backend", 3).await;
        seed_team(&store, "frontend", 2).await;

        let output = GetTeam::new(Arc::new(store.clone()))
            .run("backend")
            .await
            .unwrap();

        assert_eq!(output.team.id, seeded.team.id);
        assert_eq!(output.members, seeded.members);
    }

    #[tokio::test]
    async fn test_unknown_team() {
        let store = InMemoryStore::new();

        let result = GetTeam::new(Arc::new(store)).run("ghosts").await;

        assert!(matches!(result, Err(AppError::TeamNotFound(_))));
    }
}
