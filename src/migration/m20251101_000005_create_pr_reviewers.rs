//! Migration: Create pr_reviewers table.
//!
//! A reviewer can be assigned to a pull request at most once.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TABLE pr_reviewers (
                    id UUID PRIMARY KEY,
                    pr_id UUID NOT NULL REFERENCES pull_requests(id) ON DELETE CASCADE,
                    reviewer_id UUID NOT NULL REFERENCES users(id)
                );

                CREATE UNIQUE INDEX idx_pr_reviewers_pr_reviewer
                    ON pr_reviewers(pr_id, reviewer_id);

                CREATE INDEX idx_pr_reviewers_reviewer_id ON pr_reviewers(reviewer_id);
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS pr_reviewers CASCADE;")
            .await?;

        Ok(())
    }
}
