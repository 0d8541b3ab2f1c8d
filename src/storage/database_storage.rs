use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, SqlxSqliteConnector,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::error_handling::types::StorageError;
use crate::model::{Post, PostId};
use crate::storage::context::Context;
use crate::storage::db_entities as posts;
use crate::storage::storage_trait::Storage;

const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS posts (id INTEGER PRIMARY KEY AUTOINCREMENT, title TEXT, text TEXT, time DATETIME)";

/// SQLite-backed [`Storage`].
///
/// Wraps a bounded sqlx pool in a SeaORM connection; the handle is cheap to
/// share behind an `Arc` and every method runs exactly one statement.
pub struct DatabaseStorage {
    db: DatabaseConnection,
}

impl DatabaseStorage {
    /// Default database filename used in the application's working directory
    pub const DEFAULT_DB_FILE: &'static str = "storage.db";

    /// Path value selecting a private in-memory database
    pub const MEMORY_PATH: &'static str = ":memory:";

    /// Open `path`, or an in-memory database when it is [`Self::MEMORY_PATH`].
    pub async fn open(path: &str, max_connections: u32) -> Result<Self, StorageError> {
        if path == Self::MEMORY_PATH {
            Self::in_memory().await
        } else {
            Self::new_file(path, max_connections).await
        }
    }

    /// Create or open the database file at `path`.
    pub async fn new_file<P: AsRef<Path>>(
        path: P,
        max_connections: u32,
    ) -> Result<Self, StorageError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::ConnectionFailed(format!("can't create {}: {}", parent.display(), e))
            })?;
        }
        let opts = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(opts)
            .await
            .map_err(|e| {
                StorageError::ConnectionFailed(format!(
                    "can't open database {}: {}",
                    path.display(),
                    e
                ))
            })?;
        Ok(Self::from_pool(pool))
    }

    /// A private in-memory database.
    ///
    /// SQLite gives every connection its own memory database, so the pool is
    /// pinned to one connection that is never recycled.
    pub async fn in_memory() -> Result<Self, StorageError> {
        let opts = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| StorageError::ConnectionFailed(e.to_string()))?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opts)
            .await
            .map_err(|e| StorageError::ConnectionFailed(e.to_string()))?;
        Ok(Self::from_pool(pool))
    }

    fn from_pool(pool: SqlitePool) -> Self {
        Self {
            db: SqlxSqliteConnector::from_sqlx_sqlite_pool(pool),
        }
    }

    /// Create the `posts` table if it is missing. Safe to call on every start.
    pub async fn init(&self, ctx: &Context) -> Result<(), StorageError> {
        ctx.run(async {
            self.db
                .execute_unprepared(CREATE_TABLE_SQL)
                .await
                .map_err(StorageError::query("can't create table"))?;
            Ok(())
        })
        .await
    }

    pub async fn close(self) -> Result<(), StorageError> {
        self.db
            .close()
            .await
            .map_err(StorageError::query("can't close database"))
    }
}

#[async_trait]
impl Storage for DatabaseStorage {
    async fn exists(&self, ctx: &Context, id: PostId) -> Result<bool, StorageError> {
        ctx.run(async {
            let count = posts::Entity::find_by_id(id)
                .count(&self.db)
                .await
                .map_err(StorageError::query("can't check post"))?;
            Ok(count > 0)
        })
        .await
    }

    async fn find(&self, ctx: &Context, id: PostId) -> Result<Post, StorageError> {
        ctx.run(async {
            posts::Entity::find_by_id(id)
                .one(&self.db)
                .await
                .map_err(StorageError::query("can't find post"))?
                .map(Post::from)
                .ok_or(StorageError::NotFound(id))
        })
        .await
    }

    async fn get_all(&self, ctx: &Context) -> Result<Vec<Post>, StorageError> {
        ctx.run(async {
            let rows = posts::Entity::find()
                .order_by_desc(posts::Column::Time)
                .order_by_desc(posts::Column::Id)
                .all(&self.db)
                .await
                .map_err(StorageError::query("can't list posts"))?;
            Ok(rows.into_iter().map(Post::from).collect())
        })
        .await
    }

    async fn add(&self, ctx: &Context, post: &mut Post) -> Result<(), StorageError> {
        let row = posts::ActiveModel::for_insert(post);
        let id = ctx
            .run(async {
                let res = posts::Entity::insert(row)
                    .exec(&self.db)
                    .await
                    .map_err(StorageError::query("can't add post"))?;
                Ok(res.last_insert_id)
            })
            .await?;
        post.id = id;
        Ok(())
    }

    async fn save(&self, ctx: &Context, post: &Post) -> Result<(), StorageError> {
        ctx.run(async {
            posts::Entity::update_many()
                .col_expr(posts::Column::Title, Expr::value(post.title.clone()))
                .col_expr(posts::Column::Text, Expr::value(post.text.clone()))
                .col_expr(posts::Column::Time, Expr::value(post.time))
                .filter(posts::Column::Id.eq(post.id))
                .exec(&self.db)
                .await
                .map_err(StorageError::query("can't save post"))?;
            Ok(())
        })
        .await
    }

    async fn delete(&self, ctx: &Context, id: PostId) -> Result<(), StorageError> {
        ctx.run(async {
            posts::Entity::delete_by_id(id)
                .exec(&self.db)
                .await
                .map_err(StorageError::query("can't delete post"))?;
            Ok(())
        })
        .await
    }
}
