//! Team queries.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::entity::team::{self, ActiveModel, Entity as Teams};
use crate::models::Team;
use crate::repository::{RepoResult, TeamRepository};

use super::{PgTransaction, classify};

impl From<team::Model> for Team {
    fn from(m: team::Model) -> Self {
        Team {
            id: m.id,
            name: m.name,
            created_at: m.created_at,
        }
    }
}

#[async_trait]
impl TeamRepository for PgTransaction {
    async fn save_team(&self, team: &Team) -> RepoResult<Team> {
        let model = ActiveModel {
            id: Set(team.id),
            name: Set(team.name.clone()),
            created_at: Set(team.created_at),
        };

        let inserted = model.insert(self.conn()).await.map_err(classify)?;
        Ok(inserted.into())
    }

    async fn get_team(&self, id: Uuid) -> RepoResult<Option<Team>> {
        let result = Teams::find_by_id(id).one(self.conn()).await?;
        Ok(result.map(Team::from))
    }

    async fn get_team_by_name(&self, name: &str) -> RepoResult<Option<Team>> {
        let result = Teams::find()
            .filter(team::Column::Name.eq(name))
            .one(self.conn())
            .await?;
        Ok(result.map(Team::from))
    }
}
