//! SeaORM entity model used by the database storage backend.
//!
//! Maps the single `posts` table created by `database_storage`.

use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::{NotSet, Set};

use crate::model::Post;

/// Posts table entity model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    /// Auto-increment row id
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub text: String,
    /// Last write time
    pub time: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Post {
    fn from(row: Model) -> Self {
        Post {
            id: row.id,
            title: row.title,
            text: row.text,
            time: row.time,
        }
    }
}

impl ActiveModel {
    /// Insertable row for `post`; the id is left for the database to assign.
    pub fn for_insert(post: &Post) -> Self {
        Self {
            id: NotSet,
            title: Set(post.title.clone()),
            text: Set(post.text.clone()),
            time: Set(post.time),
        }
    }
}
