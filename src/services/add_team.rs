//! Create a team or upsert its members.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use super::clock::Clock;
use super::metrics::BusinessMetrics;
use crate::error::{AppError, AppResult, StorageOp};
use crate::models::{Team, User};
use crate::repository::{Transaction, TransactionManager};

#[derive(Debug, Clone)]
pub struct Member {
    pub user_id: Uuid,
    pub username: String,
    pub is_active: bool,
}

#[derive(Debug, Clone)]
pub struct Input {
    pub team_name: String,
    pub members: Vec<Member>,
}

#[derive(Debug, Clone)]
pub struct Output {
    pub team: Team,
    /// Users that were created or changed, in that order.
    pub processed: Vec<User>,
    pub team_created: bool,
}

pub struct AddTeam {
    transactions: Arc<dyn TransactionManager>,
    clock: Arc<dyn Clock>,
    metrics: Arc<dyn BusinessMetrics>,
}

impl AddTeam {
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

        if output.team_created {
            self.metrics.team_created();
        }
        self.metrics.users_upserted(output.processed.len());
        Ok(output)
    }

    async fn execute(&self, tx: &dyn Transaction, input: Input) -> AppResult<Output> {
        let mut seen = HashSet::new();
        if let Some(dup) = input.members.iter().find(|m| !seen.insert(m.user_id)) {
            return Err(AppError::DuplicateUsers(dup.user_id));
        }

        let now = self.clock.now();
        let (team, team_created) = match tx
            .get_team_by_name(&input.team_name)
            .await
            .map_err(AppError::storage(StorageOp::GetTeam))?
        {
            Some(team) => (team, false),
            None => {
                debug!(team_name = %input.team_name, "Creating team");
                let team = tx
                    .save_team(&Team {
                        id: Uuid::now_v7(),
                        name: input.team_name.clone(),
                        created_at: now,
                    })
                    .await
                    .map_err(AppError::storage(StorageOp::SaveTeam))?;
                (team, true)
            }
        };

        let ids: Vec<Uuid> = input.members.iter().map(|m| m.user_id).collect();
        let existing: HashMap<Uuid, User> = tx
            .get_users_by_ids(&ids)
            .await
            .map_err(AppError::storage(StorageOp::GetUsers))?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        let mut to_create = Vec::new();
        let mut to_update = Vec::new();
        for member in input.members {
            match existing.get(&member.user_id) {
                Some(current) => {
                    let wanted = User {
                        name: member.username,
                        is_active: member.is_active,
                        team_id: team.id,
                        ..current.clone()
                    };
                    if wanted == *current {
                        debug!(user_id = %current.id, "User does not need update");
                    } else {
                        to_update.push(wanted);
                    }
                }
                None => to_create.push(User {
                    id: member.user_id,
                    name: member.username,
                    is_active: member.is_active,
                    team_id: team.id,
                    created_at: now,
                }),
            }
        }

        let mut processed = Vec::with_capacity(to_create.len() + to_update.len());
        if !to_create.is_empty() {
            processed.extend(
                tx.save_users(&to_create)
                    .await
                    .map_err(AppError::storage(StorageOp::SaveUsersBatch))?,
            );
        }
        if !to_update.is_empty() {
            processed.extend(
                tx.update_users(&to_update)
                    .await
                    .map_err(AppError::storage(StorageOp::UpdateUsersBatch))?,
            );
        }

        if processed.is_empty() {
            return Err(AppError::NoUsersWereUpdated(team.name));
        }

        debug!(
            team_name = %team.name,
            created = to_create.len(),
            updated = to_update.len(),
            "Team members upserted"
        );
        Ok(Output {
            team,
            processed,
            team_created,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryStore;
    use crate::services::metrics::BusinessCounters;
    use crate::services::testing::FixedClock;
    use crate::services::tests_support::seed_team;

    fn workflow(store: &InMemoryStore, counters: Arc<BusinessCounters>) -> AddTeam {
        AddTeam::new(
            Arc::new(store.clone()),
            Arc::new(FixedClock::default()),
            counters,
        )
    }

    fn member(name: &str, is_active: bool) -> Member {
        Member {
            user_id: Uuid::new_v4(),
            username: name.to_string(),
            is_active,
        }
    }

    #[tokio::test]
    async fn test_creates_team_and_members() {
        let store = InMemoryStore::new();
        let counters = Arc::new(BusinessCounters::new());
        let alice = member("alice", true);
        let bob = member("bob", false);

        let output = workflow(&store, counters.clone())
            .run(Input {
                team_name: "backend".to_string(),
                members: vec![alice.clone(), bob.clone()],
            })
            .await
            .unwrap();

        assert!(output.team_created);
        assert_eq!(output.processed.len(), 2);
        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.teams.len(), 1);
        assert!(!snapshot.user(bob.user_id).unwrap().is_active);
        assert_eq!(snapshot.user(alice.user_id).unwrap().team_id, output.team.id);
        assert_eq!(counters.snapshot().teams_created, 1);
        assert_eq!(counters.snapshot().users_upserted, 2);
    }

    #[tokio::test]
    async fn test_moves_existing_user_into_team() {
        let store = InMemoryStore::new();
        let other = seed_team(&store, "frontend", 1).await;
        let moving = &other.members[0];

        let output = workflow(&store, Arc::new(BusinessCounters::new()))
            .run(Input {
                team_name: "backend".to_string(),
                members: vec![Member {
                    user_id: moving.id,
                    username: moving.name.clone(),
                    is_active: true,
                }],
            })
            .await
            .unwrap();

        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.user(moving.id).unwrap().team_id, output.team.id);
        assert_eq!(snapshot.user(moving.id).unwrap().created_at, moving.created_at);
    }

    #[tokio::test]
    async fn test_identical_resubmission_changes_nothing() {
        let store = InMemoryStore::new();
        let members = vec![member("alice", true), member("bob", true)];
        let add = workflow(&store, Arc::new(BusinessCounters::new()));
        let input = Input {
            team_name: "backend".to_string(),
            members,
        };

        add.run(input.clone()).await.unwrap();
        let writes = store.write_count();
        let result = add.run(input).await;

        assert!(matches!(result, Err(AppError::NoUsersWereUpdated(name)) if name == "backend"));
        assert_eq!(store.write_count(), writes);
    }

    #[tokio::test]
    async fn test_duplicate_member_ids_rejected() {
        let store = InMemoryStore::new();
        let alice = member("alice", true);

        let result = workflow(&store, Arc::new(BusinessCounters::new()))
            .run(Input {
                team_name: "backend".to_string(),
                members: vec![alice.clone(), alice.clone()],
            })
            .await;

        assert!(matches!(result, Err(AppError::DuplicateUsers(id)) if id == alice.user_id));
        assert_eq!(store.write_count(), 0);
    }
}
