//! Migration: Create pull_requests table.

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
                CREATE TABLE pull_requests (
                    id UUID PRIMARY KEY,
                    name VARCHAR(255) NOT NULL,
                    author_id UUID NOT NULL REFERENCES users(id),
                    status_id UUID NOT NULL UNIQUE REFERENCES pr_statuses(id),
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    merged_at TIMESTAMPTZ
                );

                CREATE INDEX idx_pull_requests_author_id ON pull_requests(author_id);
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS pull_requests CASCADE;")
            .await?;

        Ok(())
    }
}
