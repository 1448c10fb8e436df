use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{PostStore, UserDirectory};
use crate::error::{AppError, AppResult};
use crate::identity::Identity;
use crate::posts::Post;

/// On-disk image of the whole store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Snapshot {
    #[serde(default)]
    next_user_id: u64,
    #[serde(default)]
    next_post_id: u64,
    #[serde(default)]
    users: Vec<Identity>,
    #[serde(default)]
    posts: Vec<Post>,
}

#[derive(Default)]
struct Tables {
    next_user_id: u64,
    next_post_id: u64,
    users: BTreeMap<u64, Identity>,
    posts: BTreeMap<u64, Post>,
}

impl Tables {
    fn from_snapshot(s: Snapshot) -> Self {
        let users: BTreeMap<u64, Identity> = s.users.into_iter().filter_map(|u| u.id.map(|id| (id, u))).collect();
        let posts: BTreeMap<u64, Post> = s.posts.into_iter().filter_map(|p| p.id.map(|id| (id, p))).collect();
        // Never reissue an id that is already present, whatever the counters say
        let next_user_id = s.next_user_id.max(users.keys().next_back().copied().unwrap_or(0));
        let next_post_id = s.next_post_id.max(posts.keys().next_back().copied().unwrap_or(0));
        Self { next_user_id, next_post_id, users, posts }
    }

    fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            next_user_id: self.next_user_id,
            next_post_id: self.next_post_id,
            users: self.users.values().cloned().collect(),
            posts: self.posts.values().cloned().collect(),
        }
    }
}

/// Thread-safe in-process store for identities and posts.
///
/// With a snapshot path every mutation rewrites the JSON file (write to a temp file,
/// then rename) while the write lock is held. A mutation whose snapshot write fails is
/// undone before the lock is released, so memory never holds state the file lacks.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
    snapshot: Option<PathBuf>,
}

impl MemoryStore {
    pub fn new() -> Self { Self::default() }

    /// Load `path` if it exists, otherwise start empty; later mutations persist there.
    pub fn open<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let path = path.as_ref().to_path_buf();
        let tables = if path.exists() {
            let bytes = std::fs::read(&path)
                .map_err(|e| AppError::storage("snapshot_read", format!("{}: {}", path.display(), e)))?;
            let snap: Snapshot = serde_json::from_slice(&bytes)
                .map_err(|e| AppError::storage("snapshot_parse", format!("{}: {}", path.display(), e)))?;
            info!(target: "quill::storage", "loaded snapshot {} users={} posts={}", path.display(), snap.users.len(), snap.posts.len());
            Tables::from_snapshot(snap)
        } else {
            info!(target: "quill::storage", "no snapshot at {}; starting empty", path.display());
            Tables::default()
        };
        Ok(Self { tables: Arc::new(RwLock::new(tables)), snapshot: Some(path) })
    }

    pub fn snapshot_path(&self) -> Option<&Path> { self.snapshot.as_deref() }

    fn persist(&self, tables: &Tables) -> AppResult<()> {
        let Some(path) = &self.snapshot else { return Ok(()); };
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir).map_err(|e| AppError::storage("snapshot_write", e.to_string()))?;
            }
        }
        let text = serde_json::to_vec_pretty(&tables.to_snapshot())
            .map_err(|e| AppError::storage("snapshot_encode", e.to_string()))?;
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, text).map_err(|e| AppError::storage("snapshot_write", format!("{}: {}", tmp.display(), e)))?;
        std::fs::rename(&tmp, path).map_err(|e| AppError::storage("snapshot_write", format!("{}: {}", path.display(), e)))?;
        debug!(target: "quill::storage", "snapshot written {}", path.display());
        Ok(())
    }
}

impl UserDirectory for MemoryStore {
    fn find_identity_by_name(&self, name: &str) -> AppResult<Option<Identity>> {
        let t = self.tables.read();
        Ok(t.users.values().find(|u| u.name == name).cloned())
    }

    fn save_identity(&self, mut identity: Identity) -> AppResult<Identity> {
        let mut t = self.tables.write();
        let prev_next = t.next_user_id;
        let id = match identity.id {
            Some(id) => id,
            None => {
                t.next_user_id += 1;
                t.next_user_id
            }
        };
        identity.id = Some(id);
        let previous = t.users.insert(id, identity.clone());
        if let Err(e) = self.persist(&t) {
            // Memory must not run ahead of the snapshot
            match previous {
                Some(p) => { t.users.insert(id, p); }
                None => { t.users.remove(&id); }
            }
            t.next_user_id = prev_next;
            return Err(e);
        }
        Ok(identity)
    }
}

impl PostStore for MemoryStore {
    fn find_post_by_id(&self, id: u64) -> AppResult<Option<Post>> {
        Ok(self.tables.read().posts.get(&id).cloned())
    }

    fn save_post(&self, mut post: Post) -> AppResult<Post> {
        let now = Utc::now();
        let mut t = self.tables.write();
        let prev_next = t.next_post_id;
        let existing_created = post.id.and_then(|id| t.posts.get(&id).map(|p| p.created));
        let id = match post.id {
            Some(id) => id,
            None => {
                t.next_post_id += 1;
                t.next_post_id
            }
        };
        post.id = Some(id);
        post.created = existing_created.unwrap_or(now);
        post.modified = now;
        let previous = t.posts.insert(id, post.clone());
        if let Err(e) = self.persist(&t) {
            match previous {
                Some(p) => { t.posts.insert(id, p); }
                None => { t.posts.remove(&id); }
            }
            t.next_post_id = prev_next;
            return Err(e);
        }
        Ok(post)
    }

    fn delete_post(&self, id: u64) -> AppResult<()> {
        let mut t = self.tables.write();
        if let Some(removed) = t.posts.remove(&id) {
            if let Err(e) = self.persist(&t) {
                t.posts.insert(id, removed);
                return Err(e);
            }
        }
        Ok(())
    }

    fn list_recent_posts(&self, limit: usize) -> AppResult<Vec<Post>> {
        let t = self.tables.read();
        let mut posts: Vec<Post> = t.posts.values().cloned().collect();
        posts.sort_by(|a, b| b.created.cmp(&a.created).then_with(|| b.id.cmp(&a.id)));
        posts.truncate(limit);
        Ok(posts)
    }
}

#[cfg(test)]
#[path = "storage_tests.rs"]
mod storage_tests;
