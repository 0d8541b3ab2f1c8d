//! Storage Trait
//!
//! This module defines the `Storage` trait, the persistence contract for blog
//! posts that every backend implements.
//!
//! Implementors of this trait are responsible for:
//! - Looking posts up by id, individually or all at once
//! - Assigning ids to new posts
//! - Overwriting and deleting existing posts
//!
//! All methods take a [`Context`] and must give up with
//! `StorageError::Cancelled` once it is done.

use async_trait::async_trait;

use crate::error_handling::types::StorageError;
use crate::model::{Post, PostId};
use crate::storage::context::Context;

/// The `Storage` trait defines the interface for post storage backends.
///
/// A single backend instance is shared by every request handler, so it must be
/// safe for concurrent use.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Returns `true` if a post with `id` exists. No match is not an error.
    async fn exists(&self, ctx: &Context, id: PostId) -> Result<bool, StorageError>;

    /// Fetches the post with `id`, or `StorageError::NotFound`.
    async fn find(&self, ctx: &Context, id: PostId) -> Result<Post, StorageError>;

    /// All posts, most recent first. Empty when there are none.
    async fn get_all(&self, ctx: &Context) -> Result<Vec<Post>, StorageError>;

    /// Inserts `post` as a new row and writes the assigned id back into it.
    ///
    /// Any id already set on `post` is ignored.
    async fn add(&self, ctx: &Context, post: &mut Post) -> Result<(), StorageError>;

    /// Overwrites title, text and time of the row identified by `post.id`.
    ///
    /// Saving an id that does not exist writes nothing and is not an error.
    async fn save(&self, ctx: &Context, post: &Post) -> Result<(), StorageError>;

    /// Removes the post with `id` if present. Deleting twice is fine.
    async fn delete(&self, ctx: &Context, id: PostId) -> Result<(), StorageError>;
}
