//! SeaORM database migrations.

pub use sea_orm_migration::prelude::*;

mod m20251101_000001_create_teams;
mod m20251101_000002_create_users;
mod m20251101_000003_create_pr_statuses;
mod m20251101_000004_create_pull_requests;
mod m20251101_000005_create_pr_reviewers;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251101_000001_create_teams::Migration),
            Box::new(m20251101_000002_create_users::Migration),
            Box::new(m20251101_000003_create_pr_statuses::Migration),
            Box::new(m20251101_000004_create_pull_requests::Migration),
            Box::new(m20251101_000005_create_pr_reviewers::Migration),
        ]
    }
}
