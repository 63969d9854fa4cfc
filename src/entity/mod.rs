//! SeaORM entity definitions for PostgreSQL database.

pub mod pr_reviewer;
pub mod pr_status;
pub mod pull_request;
pub mod team;
pub mod user;
