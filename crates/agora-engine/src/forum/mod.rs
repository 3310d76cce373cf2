//! Forum domain: users, posts and threaded comments carrying rich-text
//! documents, behind a pluggable [`ForumStore`].

pub mod model;
pub mod response;
pub mod service;
pub mod store;

pub use model::{Comment, Post, User, new_id};
pub use response::{ApiResponse, ResponseKind};
pub use service::{Forum, ForumError, ForumResult, ForumSettings};
pub use store::{ForumStore, MemoryStore, StoreError};
