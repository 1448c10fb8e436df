//!
//! quill storage module
//! --------------------
//! Repository contracts the identity and post flows depend on, plus the bundled
//! in-process implementation. Handlers only ever see the traits, so another engine can
//! be dropped in behind `AppState` without touching the core.
//!
//! The contracts make no atomicity promise across calls: a name check followed by a
//! save, or a read-modify-write edit, may race with a concurrent request.

use std::sync::Arc;

use crate::error::AppResult;
use crate::identity::Identity;
use crate::posts::Post;

mod memory;

pub use memory::MemoryStore;

pub trait UserDirectory: Send + Sync {
    /// Exact, case-sensitive lookup.
    fn find_identity_by_name(&self, name: &str) -> AppResult<Option<Identity>>;
    /// Insert or update; assigns `id` on first save and returns the stored value.
    fn save_identity(&self, identity: Identity) -> AppResult<Identity>;
}

pub trait PostStore: Send + Sync {
    fn find_post_by_id(&self, id: u64) -> AppResult<Option<Post>>;
    /// Insert or update. Assigns `id` and stamps `created` on first save; stamps
    /// `modified` on every save.
    fn save_post(&self, post: Post) -> AppResult<Post>;
    /// Deleting a missing id is a no-op.
    fn delete_post(&self, id: u64) -> AppResult<()>;
    /// Newest first by `created`, ties by id descending.
    fn list_recent_posts(&self, limit: usize) -> AppResult<Vec<Post>>;
}

pub type SharedUsers = Arc<dyn UserDirectory>;
pub type SharedPosts = Arc<dyn PostStore>;
