//! Pull request queries.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, Unchanged};
use uuid::Uuid;

use crate::entity::pull_request::{self, ActiveModel, Entity as PullRequests};
use crate::models::PullRequest;
use crate::repository::{PullRequestRepository, RepoResult};

use super::{PgTransaction, classify, classify_update};

impl From<pull_request::Model> for PullRequest {
    fn from(m: pull_request::Model) -> Self {
        PullRequest {
            id: m.id,
            name: m.name,
            author_id: m.author_id,
            status_id: m.status_id,
            created_at: m.created_at,
            merged_at: m.merged_at,
        }
    }
}

#[async_trait]
impl PullRequestRepository for PgTransaction {
    async fn save_pull_request(&self, pr: &PullRequest) -> RepoResult<PullRequest> {
        let model = ActiveModel {
            id: Set(pr.id),
            name: Set(pr.name.clone()),
            author_id: Set(pr.author_id),
            status_id: Set(pr.status_id),
            created_at: Set(pr.created_at),
            merged_at: Set(pr.merged_at),
        };

        let inserted = model.insert(self.conn()).await.map_err(classify)?;
        Ok(inserted.into())
    }

    async fn get_pull_request(&self, id: Uuid) -> RepoResult<Option<PullRequest>> {
        let result = PullRequests::find_by_id(id).one(self.conn()).await?;
        Ok(result.map(PullRequest::from))
    }

    async fn get_pull_requests(&self, ids: &[Uuid]) -> RepoResult<Vec<PullRequest>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let result = PullRequests::find()
            .filter(pull_request::Column::Id.is_in(ids.iter().copied()))
            .order_by_asc(pull_request::Column::CreatedAt)
            .order_by_asc(pull_request::Column::Id)
            .all(self.conn())
            .await?;
        Ok(result.into_iter().map(PullRequest::from).collect())
    }

    async fn mark_pull_request_merged(
        &self,
        id: Uuid,
        merged_at: DateTime<Utc>,
    ) -> RepoResult<PullRequest> {
        let model = ActiveModel {
            id: Unchanged(id),
            merged_at: Set(Some(merged_at)),
            ..Default::default()
        };

        let updated = model
            .update(self.conn())
            .await
            .map_err(|e| classify_update(e, "pull request", id))?;
        Ok(updated.into())
    }
}
