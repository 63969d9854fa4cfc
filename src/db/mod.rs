//! PostgreSQL persistence via SeaORM.
//!
//! [`DbPool`] owns the connection pool and opens [`PgTransaction`]s. The
//! repository traits are implemented for `PgTransaction` in the sibling
//! modules, one per table.

mod pr_reviewers;
mod pr_statuses;
mod pull_requests;
mod teams;
mod users;

use async_trait::async_trait;
use sea_orm::{
    ConnectOptions, Database, DatabaseConnection, DatabaseTransaction, DbErr, SqlErr,
    TransactionTrait,
};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::migration::Migrator;
use crate::repository::{RepoResult, RepositoryError, Transaction, TransactionManager};

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct DbPool {
    conn: DatabaseConnection,
}

impl DbPool {
    /// Connect using the configured pool settings.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DbErr> {
        let mut options = ConnectOptions::new(config.url.clone());
        options
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(config.connect_timeout)
            .idle_timeout(config.idle_timeout)
            .sqlx_logging(false);

        let conn = Database::connect(options).await?;
        Ok(DbPool { conn })
    }

    /// Apply every pending migration.
    pub async fn run_migrations(&self) -> Result<(), DbErr> {
        let pending = Migrator::get_pending_migrations(&self.conn).await?;
        if pending.is_empty() {
            info!("No pending migrations");
            return Ok(());
        }

        info!("{} migration(s) pending", pending.len());
        Migrator::up(&self.conn, None).await
    }

    /// Round-trip to the database, used by the readiness probe.
    pub async fn ping(&self) -> Result<(), DbErr> {
        self.conn.ping().await
    }
}

#[async_trait]
impl TransactionManager for DbPool {
    async fn begin(&self) -> RepoResult<Box<dyn Transaction>> {
        let txn = self.conn.begin().await?;
        Ok(Box::new(PgTransaction { txn }))
    }
}

/// Repository access scoped to one database transaction.
///
/// Dropping it without calling [`Transaction::commit`] rolls back.
pub struct PgTransaction {
    txn: DatabaseTransaction,
}

impl PgTransaction {
    fn conn(&self) -> &DatabaseTransaction {
        &self.txn
    }
}

#[async_trait]
impl Transaction for PgTransaction {
    async fn commit(self: Box<Self>) -> RepoResult<()> {
        let PgTransaction { txn } = *self;
        txn.commit().await?;
        Ok(())
    }
}

/// Classify a database error, surfacing constraint violations.
fn classify(err: DbErr) -> RepositoryError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg))
        | Some(SqlErr::ForeignKeyConstraintViolation(msg)) => RepositoryError::Constraint(msg),
        _ => RepositoryError::Database(err),
    }
}

/// Map `RecordNotUpdated` to a missing row, everything else through [`classify`].
fn classify_update(err: DbErr, entity: &'static str, id: uuid::Uuid) -> RepositoryError {
    match err {
        DbErr::RecordNotUpdated => RepositoryError::MissingRow { entity, id },
        other => classify(other),
    }
}
