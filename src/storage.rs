//! Storage subsystem
//!
//! This module provides the persistence contract for blog posts and its
//! SQLite implementation.
//!
//! Components:
//! - `storage_trait`: the Storage trait defining a uniform API.
//! - `context`: deadline and cancellation carried into every call.
//! - `database_storage`: ORM-based SQLite implementation using SeaORM.
//! - `db_entities`: SeaORM entity model for the `posts` table.

pub mod context;
pub mod database_storage;
pub mod db_entities;
pub mod storage_trait;

pub use context::{CancelHandle, Context};
pub use database_storage::DatabaseStorage;
pub use storage_trait::Storage;
