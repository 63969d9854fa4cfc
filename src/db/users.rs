//! User queries.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, NotSet, QueryFilter, QueryOrder, Set, Unchanged,
};
use uuid::Uuid;

use crate::entity::user::{self, ActiveModel, Entity as Users};
use crate::models::User;
use crate::repository::{RepoResult, UserRepository};

use super::{PgTransaction, classify, classify_update};

impl From<user::Model> for User {
    fn from(m: user::Model) -> Self {
        User {
            id: m.id,
            name: m.name,
            is_active: m.is_active,
            team_id: m.team_id,
            created_at: m.created_at,
        }
    }
}

fn new_row(user: &User) -> ActiveModel {
    ActiveModel {
        id: Set(user.id),
        name: Set(user.name.clone()),
        is_active: Set(user.is_active),
        team_id: Set(user.team_id),
        created_at: Set(user.created_at),
    }
}

fn changed_row(user: &User) -> ActiveModel {
    ActiveModel {
        id: Unchanged(user.id),
        name: Set(user.name.clone()),
        is_active: Set(user.is_active),
        team_id: Set(user.team_id),
        created_at: NotSet,
    }
}

#[async_trait]
impl UserRepository for PgTransaction {
    async fn get_user(&self, id: Uuid) -> RepoResult<Option<User>> {
        let result = Users::find_by_id(id).one(self.conn()).await?;
        Ok(result.map(User::from))
    }

    async fn get_users_by_ids(&self, ids: &[Uuid]) -> RepoResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let result = Users::find()
            .filter(user::Column::Id.is_in(ids.iter().copied()))
            .order_by_asc(user::Column::CreatedAt)
            .order_by_asc(user::Column::Id)
            .all(self.conn())
            .await?;
        Ok(result.into_iter().map(User::from).collect())
    }

    async fn get_users_by_team(&self, team_id: Uuid) -> RepoResult<Vec<User>> {
        let result = Users::find()
            .filter(user::Column::TeamId.eq(team_id))
            .order_by_asc(user::Column::CreatedAt)
            .order_by_asc(user::Column::Id)
            .all(self.conn())
            .await?;
        Ok(result.into_iter().map(User::from).collect())
    }

    async fn get_active_users_by_team(&self, team_id: Uuid) -> RepoResult<Vec<User>> {
        let result = Users::find()
            .filter(user::Column::TeamId.eq(team_id))
            .filter(user::Column::IsActive.eq(true))
            .order_by_asc(user::Column::CreatedAt)
            .order_by_asc(user::Column::Id)
            .all(self.conn())
            .await?;
        Ok(result.into_iter().map(User::from).collect())
    }

    async fn update_user(&self, user: &User) -> RepoResult<User> {
        let updated = changed_row(user)
            .update(self.conn())
            .await
            .map_err(|e| classify_update(e, "user", user.id))?;
        Ok(updated.into())
    }

    async fn save_users(&self, users: &[User]) -> RepoResult<Vec<User>> {
        if users.is_empty() {
            return Ok(Vec::new());
        }
        Users::insert_many(users.iter().map(new_row))
            .exec(self.conn())
            .await
            .map_err(classify)?;
        Ok(users.to_vec())
    }

    async fn update_users(&self, users: &[User]) -> RepoResult<Vec<User>> {
        let mut updated = Vec::with_capacity(users.len());
        for user in users {
            updated.push(self.update_user(user).await?);
        }
        Ok(updated)
    }
}
