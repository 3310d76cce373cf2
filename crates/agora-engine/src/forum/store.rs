use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::content::{self, Blob, ContentError};
use crate::forum::model::{Comment, Post, User};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Corrupt record at {path}: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Failed to encode record: {0}")]
    Encode(serde_json::Error),
    #[error("Invalid record id: {0:?}")]
    InvalidId(String),
    #[error("Stored document is unreadable: {0}")]
    Content(#[from] ContentError),
    #[error("Invalid data directory: {0}")]
    InvalidDataDir(String),
}

/// Persistence for forum records.
///
/// Documents must come back exactly as they were put: storage owns the
/// serialized form, never the tree.
pub trait ForumStore {
    fn user(&self, id: &str) -> Result<Option<User>, StoreError>;
    fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    fn put_user(&mut self, user: &User) -> Result<(), StoreError>;

    fn post(&self, id: &str) -> Result<Option<Post>, StoreError>;
    /// All posts, in no particular order.
    fn posts(&self) -> Result<Vec<Post>, StoreError>;
    fn put_post(&mut self, post: &Post) -> Result<(), StoreError>;
    fn delete_post(&mut self, id: &str) -> Result<Option<Post>, StoreError>;

    fn comment(&self, id: &str) -> Result<Option<Comment>, StoreError>;
    /// All comments on `post_id`, in no particular order.
    fn comments_for_post(&self, post_id: &str) -> Result<Vec<Comment>, StoreError>;
    fn put_comment(&mut self, comment: &Comment) -> Result<(), StoreError>;
    fn delete_comment(&mut self, id: &str) -> Result<Option<Comment>, StoreError>;
}

/// Row shape of a post: the document is kept as an opaque blob next to its
/// text projection, like a JSON column beside a text column.
#[derive(Debug, Clone)]
struct PostRow {
    id: String,
    title: String,
    content: Blob,
    raw_text: String,
    author_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PostRow {
    fn from_post(post: &Post) -> Self {
        Self {
            id: post.id.clone(),
            title: post.title.clone(),
            content: content::store(&post.content),
            raw_text: post.raw_text.clone(),
            author_id: post.author_id.clone(),
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }

    fn to_post(&self) -> Result<Post, StoreError> {
        Ok(Post {
            id: self.id.clone(),
            title: self.title.clone(),
            content: content::load(&self.content)?,
            raw_text: self.raw_text.clone(),
            author_id: self.author_id.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, Clone)]
struct CommentRow {
    id: String,
    content: Blob,
    author_id: String,
    post_id: String,
    parent_comment_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CommentRow {
    fn from_comment(comment: &Comment) -> Self {
        Self {
            id: comment.id.clone(),
            content: content::store(&comment.content),
            author_id: comment.author_id.clone(),
            post_id: comment.post_id.clone(),
            parent_comment_id: comment.parent_comment_id.clone(),
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }

    fn to_comment(&self) -> Result<Comment, StoreError> {
        Ok(Comment {
            id: self.id.clone(),
            content: content::load(&self.content)?,
            author_id: self.author_id.clone(),
            post_id: self.post_id.clone(),
            parent_comment_id: self.parent_comment_id.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// In-memory store, used for tests and embedding.
///
/// Uses BTreeMap so iteration order is stable by id.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: BTreeMap<String, User>,
    posts: BTreeMap<String, PostRow>,
    comments: BTreeMap<String, CommentRow>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ForumStore for MemoryStore {
    fn user(&self, id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.get(id).cloned())
    }

    fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.values().find(|user| user.email == email).cloned())
    }

    fn put_user(&mut self, user: &User) -> Result<(), StoreError> {
        self.users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    fn post(&self, id: &str) -> Result<Option<Post>, StoreError> {
        self.posts.get(id).map(PostRow::to_post).transpose()
    }

    fn posts(&self) -> Result<Vec<Post>, StoreError> {
        self.posts.values().map(PostRow::to_post).collect()
    }

    fn put_post(&mut self, post: &Post) -> Result<(), StoreError> {
        self.posts.insert(post.id.clone(), PostRow::from_post(post));
        Ok(())
    }

    fn delete_post(&mut self, id: &str) -> Result<Option<Post>, StoreError> {
        self.posts.remove(id).as_ref().map(PostRow::to_post).transpose()
    }

    fn comment(&self, id: &str) -> Result<Option<Comment>, StoreError> {
        self.comments.get(id).map(CommentRow::to_comment).transpose()
    }

    fn comments_for_post(&self, post_id: &str) -> Result<Vec<Comment>, StoreError> {
        self.comments
            .values()
            .filter(|row| row.post_id == post_id)
            .map(CommentRow::to_comment)
            .collect()
    }

    fn put_comment(&mut self, comment: &Comment) -> Result<(), StoreError> {
        self.comments
            .insert(comment.id.clone(), CommentRow::from_comment(comment));
        Ok(())
    }

    fn delete_comment(&mut self, id: &str) -> Result<Option<Comment>, StoreError> {
        self.comments
            .remove(id)
            .as_ref()
            .map(CommentRow::to_comment)
            .transpose()
    }
}
