//! Migration: Create pr_statuses table.

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
                CREATE TABLE pr_statuses (
                    id UUID PRIMARY KEY,
                    status VARCHAR(16) NOT NULL
                        CHECK (status IN ('OPEN', 'MERGED'))
                );
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS pr_statuses CASCADE;")
            .await?;

        Ok(())
    }
}
