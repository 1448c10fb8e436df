//! Per-action authorization for post mutations.

use serde::{Deserialize, Serialize};

use super::session::SessionState;
use crate::posts::Post;

/// How deletion is gated. `Permissive` keeps the historical behaviour where any request
/// may delete any post; `OwnerOnly` applies the edit rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletePolicy {
    #[default]
    Permissive,
    OwnerOnly,
}

impl std::str::FromStr for DeletePolicy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "permissive" => Ok(DeletePolicy::Permissive),
            "owner_only" | "owner-only" | "owner" => Ok(DeletePolicy::OwnerOnly),
            other => Err(format!("unknown delete policy '{}'", other)),
        }
    }
}

/// True iff `session_name` is exactly the post's author. Legacy posts without an
/// author can't be edited by anyone.
pub fn can_edit_post(post: &Post, session_name: Option<&str>) -> bool {
    match (post.author.as_deref(), session_name) {
        (Some(author), Some(name)) => author == name,
        _ => false,
    }
}

/// Creating requires a verified session.
pub fn can_create_post(session: &SessionState) -> bool {
    session.is_authenticated()
}

pub fn can_delete_post(post: &Post, session_name: Option<&str>, policy: DeletePolicy) -> bool {
    match policy {
        DeletePolicy::Permissive => true,
        DeletePolicy::OwnerOnly => can_edit_post(post, session_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn by(author: Option<&str>) -> Post { Post::new("s", "c", author.map(str::to_string)) }

    #[test]
    fn edit_requires_exact_author_match() {
        let p = by(Some("alice"));
        assert!(can_edit_post(&p, Some("alice")));
        assert!(!can_edit_post(&p, Some("bob")));
        assert!(!can_edit_post(&p, Some("Alice")));
        assert!(!can_edit_post(&p, Some("alice ")));
        assert!(!can_edit_post(&p, None));
    }

    #[test]
    fn legacy_posts_are_not_editable() {
        let p = by(None);
        assert!(!can_edit_post(&p, Some("alice")));
        assert!(!can_edit_post(&p, None));
    }

    #[test]
    fn create_needs_authenticated_session() {
        assert!(can_create_post(&SessionState::Authenticated("alice".into())));
        assert!(!can_create_post(&SessionState::Anonymous));
    }

    #[test]
    fn delete_is_permissive_by_default() {
        // Known gap: the default policy lets anyone delete.
        let p = by(Some("alice"));
        assert!(can_delete_post(&p, None, DeletePolicy::default()));
        assert!(can_delete_post(&p, Some("bob"), DeletePolicy::Permissive));
    }

    #[test]
    fn owner_only_delete_uses_edit_rule() {
        let p = by(Some("alice"));
        assert!(can_delete_post(&p, Some("alice"), DeletePolicy::OwnerOnly));
        assert!(!can_delete_post(&p, Some("bob"), DeletePolicy::OwnerOnly));
        assert!(!can_delete_post(&by(None), Some("alice"), DeletePolicy::OwnerOnly));
    }

    #[test]
    fn delete_policy_parses() {
        assert_eq!("owner_only".parse::<DeletePolicy>(), Ok(DeletePolicy::OwnerOnly));
        assert_eq!("Permissive".parse::<DeletePolicy>(), Ok(DeletePolicy::Permissive));
        assert!("nope".parse::<DeletePolicy>().is_err());
    }
}
