//! HTTP API test suite.
//!
//! Drives the full route table against the in-memory store, so no database
//! is required.
//!
//! Run with: cargo test --test api

mod test_helpers;

mod test_health;
mod test_pull_requests;
mod test_statistics;
mod test_teams;
mod test_users;
