//! PR reviewers server library.
//!
//! Teams, users and pull requests with automatic reviewer assignment,
//! exposed over HTTP and persisted in PostgreSQL.

pub mod api;
pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod middleware;
pub mod migration;
pub mod models;
pub mod repository;
pub mod services;
