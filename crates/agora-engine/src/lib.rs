pub mod content;
pub mod forum;
pub mod io;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use content::{ContentError, DocumentNode, Element, Mark, MarkKind, SchemaViolation};
pub use forum::{
    ApiResponse, Comment, Forum, ForumError, ForumSettings, ForumStore, MemoryStore, Post,
    StoreError, User,
};
pub use io::FileStore;
