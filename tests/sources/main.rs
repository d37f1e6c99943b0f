//! Integration tests for Layer 1: Sources
//!
//! Tests static tables, the SQL datasource over SQLite, and the registry.

mod registry;
mod sql;
