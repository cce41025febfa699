//! Blogging backend: posts, categories, and a typed RPC surface over Postgres.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
