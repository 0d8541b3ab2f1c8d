//! Blog post entity.

use chrono::{DateTime, Utc};

/// Storage-assigned identity of a post.
pub type PostId = i64;

/// Id carried by a post that has not been persisted yet.
pub const UNSAVED_ID: PostId = -1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub text: String,
    pub time: DateTime<Utc>,
}

impl Post {
    pub fn new(id: PostId, title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            text: text.into(),
            time: Utc::now(),
        }
    }

    /// A post built from a "new post" form, not yet known to storage.
    pub fn local(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(UNSAVED_ID, title, text)
    }

    /// Replace the content and stamp the post with the current time.
    pub fn edit(&mut self, title: impl Into<String>, text: impl Into<String>) {
        self.title = title.into();
        self.text = text.into();
        self.time = Utc::now();
    }
}
