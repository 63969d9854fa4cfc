//! Pull request status queries.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, Unchanged};
use uuid::Uuid;

use crate::entity::pr_status::{self, ActiveModel, Entity as PrStatuses};
use crate::models::{PrStatus, PrStatusValue};
use crate::repository::{PrStatusRepository, RepoResult, RepositoryError};

use super::{PgTransaction, classify, classify_update};

impl TryFrom<pr_status::Model> for PrStatus {
    type Error = RepositoryError;

    fn try_from(m: pr_status::Model) -> Result<Self, Self::Error> {
        let status = PrStatusValue::parse(&m.status).ok_or_else(|| {
            RepositoryError::InvalidData(format!("unknown status '{}' on {}", m.status, m.id))
        })?;
        Ok(PrStatus { id: m.id, status })
    }
}

#[async_trait]
impl PrStatusRepository for PgTransaction {
    async fn save_pr_status(&self, status: &PrStatus) -> RepoResult<PrStatus> {
        let model = ActiveModel {
            id: Set(status.id),
            status: Set(status.status.as_str().to_string()),
        };

        let inserted = model.insert(self.conn()).await.map_err(classify)?;
        inserted.try_into()
    }

    async fn get_pr_status(&self, id: Uuid) -> RepoResult<Option<PrStatus>> {
        PrStatuses::find_by_id(id)
            .one(self.conn())
            .await?
            .map(PrStatus::try_from)
            .transpose()
    }

    async fn get_pr_statuses(&self, ids: &[Uuid]) -> RepoResult<Vec<PrStatus>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        PrStatuses::find()
            .filter(pr_status::Column::Id.is_in(ids.iter().copied()))
            .all(self.conn())
            .await?
            .into_iter()
            .map(PrStatus::try_from)
            .collect()
    }

    async fn update_pr_status(&self, status: &PrStatus) -> RepoResult<PrStatus> {
        let model = ActiveModel {
            id: Unchanged(status.id),
            status: Set(status.status.as_str().to_string()),
        };

        model
            .update(self.conn())
            .await
            .map_err(|e| classify_update(e, "pr status", status.id))?
            .try_into()
    }
}
