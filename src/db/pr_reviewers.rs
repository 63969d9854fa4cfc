//! Reviewer assignment queries.
//!
//! Assignment ids are UUIDv7, so ordering by id is ordering by assignment time.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::entity::pr_reviewer::{self, ActiveModel, Entity as PrReviewers};
use crate::models::PrReviewer;
use crate::repository::{PrReviewerRepository, RepoResult};

use super::{PgTransaction, classify};

impl From<pr_reviewer::Model> for PrReviewer {
    fn from(m: pr_reviewer::Model) -> Self {
        PrReviewer {
            id: m.id,
            pr_id: m.pr_id,
            reviewer_id: m.reviewer_id,
        }
    }
}

#[async_trait]
impl PrReviewerRepository for PgTransaction {
    async fn save_pr_reviewer(&self, reviewer: &PrReviewer) -> RepoResult<PrReviewer> {
        let model = ActiveModel {
            id: Set(reviewer.id),
            pr_id: Set(reviewer.pr_id),
            reviewer_id: Set(reviewer.reviewer_id),
        };

        let inserted = model.insert(self.conn()).await.map_err(classify)?;
        Ok(inserted.into())
    }

    async fn get_reviewers_by_pr(&self, pr_id: Uuid) -> RepoResult<Vec<PrReviewer>> {
        let result = PrReviewers::find()
            .filter(pr_reviewer::Column::PrId.eq(pr_id))
            .order_by_asc(pr_reviewer::Column::Id)
            .all(self.conn())
            .await?;
        Ok(result.into_iter().map(PrReviewer::from).collect())
    }

    async fn get_assignments_by_reviewer(&self, reviewer_id: Uuid) -> RepoResult<Vec<PrReviewer>> {
        let result = PrReviewers::find()
            .filter(pr_reviewer::Column::ReviewerId.eq(reviewer_id))
            .order_by_asc(pr_reviewer::Column::Id)
            .all(self.conn())
            .await?;
        Ok(result.into_iter().map(PrReviewer::from).collect())
    }

    async fn get_assignments_by_reviewers(
        &self,
        reviewer_ids: &[Uuid],
    ) -> RepoResult<Vec<PrReviewer>> {
        if reviewer_ids.is_empty() {
            return Ok(Vec::new());
        }
        let result = PrReviewers::find()
            .filter(pr_reviewer::Column::ReviewerId.is_in(reviewer_ids.iter().copied()))
            .order_by_asc(pr_reviewer::Column::Id)
            .all(self.conn())
            .await?;
        Ok(result.into_iter().map(PrReviewer::from).collect())
    }

    async fn get_all_pr_reviewers(&self) -> RepoResult<Vec<PrReviewer>> {
        let result = PrReviewers::find()
            .order_by_asc(pr_reviewer::Column::Id)
            .all(self.conn())
            .await?;
        Ok(result.into_iter().map(PrReviewer::from).collect())
    }

    async fn delete_pr_reviewer(&self, pr_id: Uuid, reviewer_id: Uuid) -> RepoResult<()> {
        PrReviewers::delete_many()
            .filter(pr_reviewer::Column::PrId.eq(pr_id))
            .filter(pr_reviewer::Column::ReviewerId.eq(reviewer_id))
            .exec(self.conn())
            .await?;
        Ok(())
    }
}
