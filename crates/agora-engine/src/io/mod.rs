use relative_path::RelativePathBuf;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

use crate::content::parse_json;
use crate::forum::model::{Comment, Post, User};
use crate::forum::store::{ForumStore, StoreError};

const USERS: &str = "users";
const POSTS: &str = "posts";
const COMMENTS: &str = "comments";

/// Directory-backed store: one pretty-printed JSON file per record.
///
/// ```text
/// <root>/users/<id>.json
/// <root>/posts/<id>.json
/// <root>/comments/<id>.json
/// ```
///
/// Documents are written in editor JSON and pass through the validator
/// again when read, with no nesting limit on the parser.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open a store rooted at an existing directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        validate_data_dir(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn record_path(&self, collection: &str, id: &str) -> Result<PathBuf, StoreError> {
        check_id(id)?;
        Ok(RelativePathBuf::from(format!("{collection}/{id}.json")).to_path(&self.root))
    }

    fn read<T: DeserializeOwned>(&self, collection: &str, id: &str) -> Result<Option<T>, StoreError> {
        let path = self.record_path(collection, id)?;
        if !path.exists() {
            return Ok(None);
        }
        read_record(&path).map(Some)
    }

    fn read_all<T: DeserializeOwned>(&self, collection: &str) -> Result<Vec<T>, StoreError> {
        let dir = RelativePathBuf::from(collection).to_path(&self.root);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut paths = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.is_file()
                && let Some(ext) = path.extension()
                && ext == "json"
            {
                paths.push(path);
            }
        }
        paths.sort();
        paths.iter().map(|path| read_record(path)).collect()
    }

    fn write<T: Serialize>(&self, collection: &str, id: &str, record: &T) -> Result<(), StoreError> {
        let path = self.record_path(collection, id)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(record).map_err(StoreError::Encode)?;
        // Write beside the target and rename so readers never see half a record
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, json)?;
        fs::rename(&staging, &path)?;
        log::debug!("wrote {}", path.display());
        Ok(())
    }

    fn remove<T: DeserializeOwned>(&self, collection: &str, id: &str) -> Result<Option<T>, StoreError> {
        let Some(record) = self.read(collection, id)? else {
            return Ok(None);
        };
        fs::remove_file(self.record_path(collection, id)?)?;
        Ok(Some(record))
    }
}

impl ForumStore for FileStore {
    fn user(&self, id: &str) -> Result<Option<User>, StoreError> {
        self.read(USERS, id)
    }

    fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .read_all::<User>(USERS)?
            .into_iter()
            .find(|user| user.email == email))
    }

    fn put_user(&mut self, user: &User) -> Result<(), StoreError> {
        self.write(USERS, &user.id, user)
    }

    fn post(&self, id: &str) -> Result<Option<Post>, StoreError> {
        self.read(POSTS, id)
    }

    fn posts(&self) -> Result<Vec<Post>, StoreError> {
        self.read_all(POSTS)
    }

    fn put_post(&mut self, post: &Post) -> Result<(), StoreError> {
        self.write(POSTS, &post.id, post)
    }

    fn delete_post(&mut self, id: &str) -> Result<Option<Post>, StoreError> {
        self.remove(POSTS, id)
    }

    fn comment(&self, id: &str) -> Result<Option<Comment>, StoreError> {
        self.read(COMMENTS, id)
    }

    fn comments_for_post(&self, post_id: &str) -> Result<Vec<Comment>, StoreError> {
        Ok(self
            .read_all::<Comment>(COMMENTS)?
            .into_iter()
            .filter(|comment| comment.post_id == post_id)
            .collect())
    }

    fn put_comment(&mut self, comment: &Comment) -> Result<(), StoreError> {
        self.write(COMMENTS, &comment.id, comment)
    }

    fn delete_comment(&mut self, id: &str) -> Result<Option<Comment>, StoreError> {
        self.remove(COMMENTS, id)
    }
}

fn read_record<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let json = fs::read_to_string(path)?;
    parse_json(&json)
        .and_then(serde_json::from_value)
        .map_err(|source| {
            log::warn!("corrupt record {}: {source}", path.display());
            StoreError::Corrupt {
                path: path.to_path_buf(),
                source,
            }
        })
}

/// Record ids become file names, so only `[A-Za-z0-9_-]` is allowed.
fn check_id(id: &str) -> Result<(), StoreError> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidId(id.to_string()))
    }
}

pub fn validate_data_dir(path: &Path) -> Result<(), StoreError> {
    if !path.exists() || !path.is_dir() {
        return Err(StoreError::InvalidDataDir(format!(
            "{} is not a directory",
            path.display()
        )));
    }

    Ok(())
}
