use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use std::collections::HashSet;

use crate::content::{self, AcceptedContent, ContentError, ValidationOptions};
use crate::forum::model::{Comment, Post, User, new_id};
use crate::forum::store::{ForumStore, StoreError};

const TITLE_AND_CONTENT_REQUIRED: &str = "Title and content are required";
const CONTENT_REQUIRED: &str = "Content is required";

/// Limits applied at the forum boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForumSettings {
    /// Deepest document accepted from a client, root counted as 1.
    /// `None` accepts any depth.
    pub max_content_depth: Option<usize>,
    /// Characters kept by [`Forum::post_preview`].
    pub preview_length: usize,
    /// Posts per page when the caller gives no limit.
    pub page_size: usize,
}

impl Default for ForumSettings {
    fn default() -> Self {
        Self {
            max_content_depth: None,
            preview_length: 200,
            page_size: 10,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ForumError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("{0}")]
    ContentRequired(&'static str),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error(transparent)]
    Content(ContentError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ForumError {
    /// HTTP status code a front end should answer with.
    pub fn status(&self) -> u16 {
        match self {
            ForumError::InvalidRequest(_)
            | ForumError::ContentRequired(_)
            | ForumError::Content(_) => 400,
            ForumError::Forbidden(_) => 403,
            ForumError::NotFound(_) => 404,
            ForumError::Conflict(_) => 409,
            ForumError::Store(_) => 500,
        }
    }
}

pub type ForumResult<T> = Result<T, ForumError>;

/// Forum operations over a [`ForumStore`].
///
/// Every document coming in goes through validation and extraction here,
/// so stored posts and comments always carry a matching `raw_text`.
pub struct Forum<S> {
    store: S,
    settings: ForumSettings,
    last_timestamp: Option<DateTime<Utc>>,
}

impl<S: ForumStore> Forum<S> {
    pub fn new(store: S) -> Self {
        Self::with_settings(store, ForumSettings::default())
    }

    pub fn with_settings(store: S, settings: ForumSettings) -> Self {
        Self {
            store,
            settings,
            last_timestamp: None,
        }
    }

    pub fn settings(&self) -> &ForumSettings {
        &self.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn register_user(&mut self, name: &str, email: &str) -> ForumResult<User> {
        let email = email.trim();
        if email.is_empty() {
            return Err(ForumError::InvalidRequest("email is required".to_string()));
        }
        if self.store.user_by_email(email)?.is_some() {
            return Err(ForumError::Conflict(format!("email {email} is already registered")));
        }

        let now = self.now();
        let user = User {
            id: new_id(),
            name: name.trim().to_string(),
            email: email.to_string(),
            email_verified: false,
            image: None,
            created_at: now,
            updated_at: now,
        };
        self.store.put_user(&user)?;
        log::info!("registered user {}", user.id);
        Ok(user)
    }

    pub fn get_user(&self, id: &str) -> ForumResult<User> {
        self.store.user(id)?.ok_or(ForumError::NotFound("User"))
    }

    /// One page of posts, newest first. `page` is 1-based; `limit` falls
    /// back to the configured page size.
    pub fn list_posts(&self, page: usize, limit: Option<usize>) -> ForumResult<Vec<Post>> {
        let limit = limit.unwrap_or(self.settings.page_size);
        if page == 0 || limit == 0 {
            return Err(ForumError::InvalidRequest(
                "page and limit must be at least 1".to_string(),
            ));
        }

        let mut posts = self.store.posts()?;
        posts.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(posts
            .into_iter()
            .skip((page - 1).saturating_mul(limit))
            .take(limit)
            .collect())
    }

    pub fn get_post(&self, id: &str) -> ForumResult<Post> {
        self.store.post(id)?.ok_or(ForumError::NotFound("Post"))
    }

    pub fn create_post(&mut self, author_id: &str, title: &str, content: &Value) -> ForumResult<Post> {
        self.get_user(author_id)?;
        let title = title.trim();
        let accepted = self.accept(content, TITLE_AND_CONTENT_REQUIRED)?;
        if title.is_empty() {
            return Err(ForumError::ContentRequired(TITLE_AND_CONTENT_REQUIRED));
        }

        let now = self.now();
        let post = Post {
            id: new_id(),
            title: title.to_string(),
            content: accepted.document,
            raw_text: accepted.raw_text,
            author_id: author_id.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.store.put_post(&post)?;
        log::info!("user {} created post {}", author_id, post.id);
        Ok(post)
    }

    /// Update title and/or content. An absent or blank title keeps the
    /// current one; absent content keeps the current document.
    pub fn update_post(
        &mut self,
        actor_id: &str,
        id: &str,
        title: Option<&str>,
        content: Option<&Value>,
    ) -> ForumResult<Post> {
        let mut post = self.get_post(id)?;
        ensure_author(actor_id, &post.author_id, "post", id)?;

        if let Some(title) = title.map(str::trim)
            && !title.is_empty()
        {
            post.title = title.to_string();
        }
        if let Some(content) = content {
            let accepted = self.accept(content, TITLE_AND_CONTENT_REQUIRED)?;
            post.content = accepted.document;
            post.raw_text = accepted.raw_text;
        }
        post.updated_at = self.now();

        self.store.put_post(&post)?;
        log::info!("user {actor_id} updated post {id}");
        Ok(post)
    }

    /// Delete a post along with every comment on it.
    pub fn delete_post(&mut self, actor_id: &str, id: &str) -> ForumResult<Post> {
        let post = self.get_post(id)?;
        ensure_author(actor_id, &post.author_id, "post", id)?;

        let comments = self.store.comments_for_post(id)?;
        for comment in &comments {
            self.store.delete_comment(&comment.id)?;
        }
        self.store.delete_post(id)?;
        log::info!(
            "user {actor_id} deleted post {id} and {} comments",
            comments.len()
        );
        Ok(post)
    }

    /// Comments on a post, oldest first.
    pub fn list_comments(&self, post_id: &str) -> ForumResult<Vec<Comment>> {
        self.get_post(post_id)?;
        let mut comments = self.store.comments_for_post(post_id)?;
        comments.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(comments)
    }

    pub fn create_comment(
        &mut self,
        author_id: &str,
        post_id: &str,
        content: &Value,
        parent_comment_id: Option<&str>,
    ) -> ForumResult<Comment> {
        self.get_user(author_id)?;
        self.get_post(post_id)?;
        if let Some(parent_id) = parent_comment_id {
            match self.store.comment(parent_id)? {
                Some(parent) if parent.post_id == post_id => {}
                Some(_) => {
                    return Err(ForumError::InvalidRequest(format!(
                        "comment {parent_id} belongs to another post"
                    )));
                }
                None => {
                    return Err(ForumError::InvalidRequest(format!(
                        "parent comment {parent_id} does not exist"
                    )));
                }
            }
        }
        let accepted = self.accept(content, CONTENT_REQUIRED)?;

        let now = self.now();
        let comment = Comment {
            id: new_id(),
            content: accepted.document,
            author_id: author_id.to_string(),
            post_id: post_id.to_string(),
            parent_comment_id: parent_comment_id.map(str::to_string),
            created_at: now,
            updated_at: now,
        };
        self.store.put_comment(&comment)?;
        log::info!("user {author_id} commented {} on post {post_id}", comment.id);
        Ok(comment)
    }

    pub fn update_comment(&mut self, actor_id: &str, id: &str, content: &Value) -> ForumResult<Comment> {
        let mut comment = self.get_comment(id)?;
        ensure_author(actor_id, &comment.author_id, "comment", id)?;

        let accepted = self.accept(content, CONTENT_REQUIRED)?;
        comment.content = accepted.document;
        comment.updated_at = self.now();

        self.store.put_comment(&comment)?;
        log::info!("user {actor_id} updated comment {id}");
        Ok(comment)
    }

    /// Delete a comment and all replies below it.
    pub fn delete_comment(&mut self, actor_id: &str, id: &str) -> ForumResult<Comment> {
        let comment = self.get_comment(id)?;
        ensure_author(actor_id, &comment.author_id, "comment", id)?;

        let siblings = self.store.comments_for_post(&comment.post_id)?;
        let mut pending = vec![comment.id.clone()];
        let mut visited = HashSet::new();
        let mut removed = 0usize;
        while let Some(current) = pending.pop() {
            // Stored parent links can form a cycle
            if !visited.insert(current.clone()) {
                continue;
            }
            pending.extend(
                siblings
                    .iter()
                    .filter(|reply| reply.parent_comment_id.as_deref() == Some(current.as_str()))
                    .map(|reply| reply.id.clone()),
            );
            if self.store.delete_comment(&current)?.is_some() {
                removed += 1;
            }
        }
        log::info!("user {actor_id} deleted comment {id} ({removed} including replies)");
        Ok(comment)
    }

    /// Short plain-text teaser for post listings.
    pub fn post_preview(&self, post: &Post) -> String {
        content::preview(&post.raw_text, self.settings.preview_length)
    }

    fn get_comment(&self, id: &str) -> ForumResult<Comment> {
        self.store.comment(id)?.ok_or(ForumError::NotFound("Comment"))
    }

    fn accept(&self, content: &Value, required: &'static str) -> ForumResult<AcceptedContent> {
        let options = ValidationOptions {
            max_depth: self.settings.max_content_depth,
        };
        content::accept(content, &options).map_err(|error| match error {
            ContentError::EmptyContent => ForumError::ContentRequired(required),
            other => {
                log::debug!("rejected submitted document: {other}");
                ForumError::Content(other)
            }
        })
    }

    /// Wall clock, nudged forward so timestamps from one forum never repeat
    /// or go backwards.
    fn now(&mut self) -> DateTime<Utc> {
        let mut now = Utc::now();
        if let Some(last) = self.last_timestamp
            && now <= last
        {
            now = last + Duration::microseconds(1);
        }
        self.last_timestamp = Some(now);
        now
    }
}

fn ensure_author(actor_id: &str, author_id: &str, what: &str, id: &str) -> ForumResult<()> {
    if actor_id == author_id {
        return Ok(());
    }
    log::warn!("user {actor_id} tried to modify {what} {id} owned by {author_id}");
    Err(ForumError::Forbidden(format!("only the author may modify this {what}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::DocumentNode;
    use crate::forum::store::MemoryStore;
    use crate::tests::{nested_paragraphs, with_large_stack};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn forum_with_user() -> (Forum<MemoryStore>, User) {
        let mut forum = Forum::new(MemoryStore::new());
        let user = forum.register_user("Ann", "ann@example.org").unwrap();
        (forum, user)
    }

    fn paragraph(text: &str) -> Value {
        json!({ "type": "paragraph", "content": [{ "type": "text", "text": text }] })
    }

    #[test]
    fn test_create_post_derives_raw_text() {
        // Given a registered author
        let (mut forum, user) = forum_with_user();

        // When creating a post with marked text
        let content = json!({
            "type": "doc",
            "content": [{
                "type": "paragraph",
                "content": [
                    { "type": "text", "text": "Hello " },
                    { "type": "text", "text": "world", "marks": [{ "type": "bold" }] }
                ]
            }]
        });
        let post = forum.create_post(&user.id, "  Greeting ", &content).unwrap();

        // Then the title is trimmed and the text projection is stored
        assert_eq!(post.title, "Greeting");
        assert_eq!(post.raw_text, "Hello world");
        assert_eq!(forum.get_post(&post.id).unwrap(), post);
    }

    #[rstest]
    #[case::blank_title("   ", paragraph("body"))]
    #[case::empty_document("Title", json!({ "type": "doc", "content": [] }))]
    #[case::empty_text("Title", paragraph(""))]
    fn test_create_post_requires_title_and_content(#[case] title: &str, #[case] content: Value) {
        let (mut forum, user) = forum_with_user();

        let error = forum.create_post(&user.id, title, &content).unwrap_err();

        assert!(matches!(error, ForumError::ContentRequired(TITLE_AND_CONTENT_REQUIRED)));
        assert_eq!(error.status(), 400);
        assert!(forum.list_posts(1, None).unwrap().is_empty());
    }

    #[test]
    fn test_create_post_rejects_schema_violation() {
        let (mut forum, user) = forum_with_user();

        let error = forum
            .create_post(&user.id, "Title", &json!({ "type": "text", "text": 42 }))
            .unwrap_err();

        assert!(matches!(error, ForumError::Content(ContentError::Schema(_))));
        assert_eq!(error.status(), 400);
    }

    #[test]
    fn test_create_post_caps_depth() {
        let settings = ForumSettings {
            max_content_depth: Some(8),
            ..ForumSettings::default()
        };
        let mut forum = Forum::with_settings(MemoryStore::new(), settings);
        let user = forum.register_user("Ann", "ann@example.org").unwrap();

        let shallow = nested_paragraphs(8, "ok").to_value();
        let deep = nested_paragraphs(9, "too deep").to_value();

        assert!(forum.create_post(&user.id, "fits", &shallow).is_ok());
        let error = forum.create_post(&user.id, "deep", &deep).unwrap_err();
        assert!(matches!(
            error,
            ForumError::Content(ContentError::TooDeep { max_depth: 8 })
        ));
        assert_eq!(error.status(), 400);
        assert_eq!(forum.list_posts(1, None).unwrap().len(), 1);
    }

    #[test]
    fn test_default_settings_accept_depth_1000_post() {
        // Storing re-serializes the JSON, which recurses per level
        with_large_stack(|| {
            // Given a forum with default settings
            let (mut forum, user) = forum_with_user();
            assert_eq!(forum.settings().max_content_depth, None);

            // When posting a well-formed document 1000 levels deep
            let content = nested_paragraphs(1000, "bottom").to_value();
            let post = forum.create_post(&user.id, "Deep", &content).unwrap();

            // Then it is stored whole and reads back unchanged
            assert_eq!(post.raw_text, "bottom");
            assert_eq!(post.content.depth(), 1000);
            assert_eq!(forum.get_post(&post.id).unwrap(), post);
        });
    }

    #[test]
    fn test_create_post_requires_existing_author() {
        let mut forum = Forum::new(MemoryStore::new());
        let error = forum.create_post("ghost", "Title", &paragraph("x")).unwrap_err();
        assert!(matches!(error, ForumError::NotFound("User")));
        assert_eq!(error.status(), 404);
    }

    #[test]
    fn test_register_user_rejects_duplicate_email() {
        let (mut forum, _) = forum_with_user();
        let error = forum.register_user("Other", "ann@example.org").unwrap_err();
        assert!(matches!(error, ForumError::Conflict(_)));
        assert_eq!(error.status(), 409);

        let error = forum.register_user("Nobody", "  ").unwrap_err();
        assert!(matches!(error, ForumError::InvalidRequest(_)));
    }

    #[test]
    fn test_list_posts_pages_newest_first() {
        // Given five posts created in order
        let (mut forum, user) = forum_with_user();
        let ids: Vec<String> = (0..5)
            .map(|n| {
                forum
                    .create_post(&user.id, &format!("post {n}"), &paragraph("body"))
                    .unwrap()
                    .id
            })
            .collect();

        // When listing two per page
        let titles = |page| -> Vec<String> {
            forum
                .list_posts(page, Some(2))
                .unwrap()
                .into_iter()
                .map(|post| post.title)
                .collect()
        };

        // Then the newest come first and the last page is short
        assert_eq!(titles(1), vec!["post 4", "post 3"]);
        assert_eq!(titles(2), vec!["post 2", "post 1"]);
        assert_eq!(titles(3), vec!["post 0"]);
        assert!(titles(4).is_empty());
        assert_eq!(forum.list_posts(1, None).unwrap().len(), ids.len());
    }

    #[rstest]
    #[case(0, Some(10))]
    #[case(1, Some(0))]
    fn test_list_posts_rejects_zero_page_or_limit(#[case] page: usize, #[case] limit: Option<usize>) {
        let forum = Forum::new(MemoryStore::new());
        assert!(matches!(
            forum.list_posts(page, limit),
            Err(ForumError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_update_post_keeps_title_when_blank() {
        // Given an existing post
        let (mut forum, user) = forum_with_user();
        let post = forum.create_post(&user.id, "Original", &paragraph("old")).unwrap();

        // When updating with a blank title and new content
        let updated = forum
            .update_post(&user.id, &post.id, Some(""), Some(&paragraph("new")))
            .unwrap();

        // Then the title survives, text is recomputed and the clock moved on
        assert_eq!(updated.title, "Original");
        assert_eq!(updated.raw_text, "new");
        assert!(updated.updated_at > post.updated_at);
        assert_eq!(updated.created_at, post.created_at);
    }

    #[test]
    fn test_update_post_without_content_keeps_document() {
        let (mut forum, user) = forum_with_user();
        let post = forum.create_post(&user.id, "Original", &paragraph("body")).unwrap();

        let updated = forum
            .update_post(&user.id, &post.id, Some("Renamed"), None)
            .unwrap();

        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.content, post.content);
        assert_eq!(updated.raw_text, "body");
    }

    #[test]
    fn test_only_author_can_modify_post() {
        let (mut forum, author) = forum_with_user();
        let intruder = forum.register_user("Eve", "eve@example.org").unwrap();
        let post = forum.create_post(&author.id, "Mine", &paragraph("body")).unwrap();

        let update = forum
            .update_post(&intruder.id, &post.id, Some("Hijacked"), None)
            .unwrap_err();
        let delete = forum.delete_post(&intruder.id, &post.id).unwrap_err();

        assert_eq!(update.status(), 403);
        assert_eq!(delete.status(), 403);
        assert_eq!(forum.get_post(&post.id).unwrap().title, "Mine");
    }

    #[test]
    fn test_delete_post_removes_its_comments() {
        let (mut forum, user) = forum_with_user();
        let post = forum.create_post(&user.id, "Doomed", &paragraph("body")).unwrap();
        let keep = forum.create_post(&user.id, "Kept", &paragraph("body")).unwrap();
        forum.create_comment(&user.id, &post.id, &paragraph("a"), None).unwrap();
        forum.create_comment(&user.id, &keep.id, &paragraph("b"), None).unwrap();

        let deleted = forum.delete_post(&user.id, &post.id).unwrap();

        assert_eq!(deleted.id, post.id);
        assert!(matches!(forum.get_post(&post.id), Err(ForumError::NotFound("Post"))));
        assert!(forum.store().comments_for_post(&post.id).unwrap().is_empty());
        assert_eq!(forum.list_comments(&keep.id).unwrap().len(), 1);
    }

    #[test]
    fn test_comments_listed_oldest_first() {
        let (mut forum, user) = forum_with_user();
        let post = forum.create_post(&user.id, "Thread", &paragraph("body")).unwrap();
        for text in ["first", "second", "third"] {
            forum.create_comment(&user.id, &post.id, &paragraph(text), None).unwrap();
        }

        let texts: Vec<String> = forum
            .list_comments(&post.id)
            .unwrap()
            .iter()
            .map(|comment| content::extract(&comment.content))
            .collect();

        assert_eq!(texts, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_reply_parent_must_belong_to_same_post() {
        let (mut forum, user) = forum_with_user();
        let first = forum.create_post(&user.id, "One", &paragraph("body")).unwrap();
        let second = forum.create_post(&user.id, "Two", &paragraph("body")).unwrap();
        let parent = forum.create_comment(&user.id, &first.id, &paragraph("hi"), None).unwrap();

        let reply = forum
            .create_comment(&user.id, &first.id, &paragraph("re"), Some(&parent.id))
            .unwrap();
        assert_eq!(reply.parent_comment_id.as_deref(), Some(parent.id.as_str()));

        let cross = forum.create_comment(&user.id, &second.id, &paragraph("re"), Some(&parent.id));
        assert!(matches!(cross, Err(ForumError::InvalidRequest(_))));

        let missing = forum.create_comment(&user.id, &first.id, &paragraph("re"), Some("nope"));
        assert!(matches!(missing, Err(ForumError::InvalidRequest(_))));
    }

    #[test]
    fn test_create_comment_requires_text() {
        let (mut forum, user) = forum_with_user();
        let post = forum.create_post(&user.id, "Thread", &paragraph("body")).unwrap();

        let error = forum
            .create_comment(&user.id, &post.id, &json!({ "type": "paragraph" }), None)
            .unwrap_err();

        assert!(matches!(error, ForumError::ContentRequired(CONTENT_REQUIRED)));
    }

    #[test]
    fn test_update_comment_checks_author() {
        let (mut forum, author) = forum_with_user();
        let other = forum.register_user("Bob", "bob@example.org").unwrap();
        let post = forum.create_post(&author.id, "Thread", &paragraph("body")).unwrap();
        let comment = forum.create_comment(&author.id, &post.id, &paragraph("v1"), None).unwrap();

        let denied = forum.update_comment(&other.id, &comment.id, &paragraph("v2"));
        assert!(matches!(denied, Err(ForumError::Forbidden(_))));

        let updated = forum.update_comment(&author.id, &comment.id, &paragraph("v2")).unwrap();
        assert_eq!(updated.content, DocumentNode::paragraph(vec![DocumentNode::text("v2")]));
        assert!(matches!(
            forum.update_comment(&author.id, "missing", &paragraph("v3")),
            Err(ForumError::NotFound("Comment"))
        ));
    }

    #[test]
    fn test_delete_comment_removes_reply_subtree() {
        // Given a thread: root <- reply <- nested reply, plus an unrelated comment
        let (mut forum, user) = forum_with_user();
        let post = forum.create_post(&user.id, "Thread", &paragraph("body")).unwrap();
        let root = forum.create_comment(&user.id, &post.id, &paragraph("root"), None).unwrap();
        let reply = forum
            .create_comment(&user.id, &post.id, &paragraph("reply"), Some(&root.id))
            .unwrap();
        forum
            .create_comment(&user.id, &post.id, &paragraph("nested"), Some(&reply.id))
            .unwrap();
        let other = forum.create_comment(&user.id, &post.id, &paragraph("other"), None).unwrap();

        // When deleting the root
        let deleted = forum.delete_comment(&user.id, &root.id).unwrap();

        // Then only the unrelated comment remains
        assert_eq!(deleted.id, root.id);
        let remaining: Vec<String> = forum
            .list_comments(&post.id)
            .unwrap()
            .into_iter()
            .map(|comment| comment.id)
            .collect();
        assert_eq!(remaining, vec![other.id]);
    }

    #[test]
    fn test_delete_comment_survives_parent_cycle() {
        // Given two comments whose stored parent links point at each other
        let (mut forum, user) = forum_with_user();
        let post = forum.create_post(&user.id, "Loop", &paragraph("body")).unwrap();
        let mut a = forum.create_comment(&user.id, &post.id, &paragraph("a"), None).unwrap();
        let mut b = forum.create_comment(&user.id, &post.id, &paragraph("b"), None).unwrap();
        a.parent_comment_id = Some(b.id.clone());
        b.parent_comment_id = Some(a.id.clone());
        forum.store.put_comment(&a).unwrap();
        forum.store.put_comment(&b).unwrap();

        // When deleting one of them
        let deleted = forum.delete_comment(&user.id, &a.id).unwrap();

        // Then the walk terminates and both are gone
        assert_eq!(deleted.id, a.id);
        assert!(forum.list_comments(&post.id).unwrap().is_empty());
    }

    #[test]
    fn test_post_preview_uses_configured_length() {
        let settings = ForumSettings {
            preview_length: 5,
            ..ForumSettings::default()
        };
        let mut forum = Forum::with_settings(MemoryStore::new(), settings);
        let user = forum.register_user("Ann", "ann@example.org").unwrap();
        let post = forum
            .create_post(&user.id, "Long", &paragraph("Hello wonderful world"))
            .unwrap();

        assert_eq!(forum.post_preview(&post), "Hello…");
    }

    #[test]
    fn test_timestamps_strictly_increase() {
        let mut forum = Forum::new(MemoryStore::new());
        let stamps: Vec<_> = (0..100).map(|_| forum.now()).collect();
        assert!(stamps.windows(2).all(|pair| pair[0] < pair[1]));
    }
}
