//! Blog posts: the stored model, the edit rule, and the view handed to templates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const EDIT_PREFIX: &str = "[Edit] ";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Post {
    /// Assigned by the store on first save.
    #[serde(default)]
    pub id: Option<u64>,
    pub subject: String,
    pub content: String,
    /// Owner name; `None` for posts that predate authorship tracking.
    #[serde(default)]
    pub author: Option<String>,
    /// Stamped once by the store.
    pub created: DateTime<Utc>,
    /// Restamped by the store on every save.
    pub modified: DateTime<Utc>,
}

impl Post {
    pub fn new(subject: impl Into<String>, content: impl Into<String>, author: Option<String>) -> Self {
        let now = Utc::now();
        Self { id: None, subject: subject.into(), content: content.into(), author, created: now, modified: now }
    }

    /// Replace subject and content. A content change marks the subject with `"[Edit] "`
    /// unless the new subject already carries the marker. Returns whether content changed.
    pub fn apply_edit(&mut self, subject: &str, content: &str) -> bool {
        let changed = self.content != content;
        self.subject = if changed && !subject.starts_with(EDIT_PREFIX) {
            format!("{}{}", EDIT_PREFIX, subject)
        } else {
            subject.to_string()
        };
        self.content = content.to_string();
        changed
    }
}

/// Template-facing projection of a post.
#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    pub id: u64,
    pub subject: String,
    pub author: Option<String>,
    pub created: String,
    pub modified: String,
    /// HTML-escaped content with line breaks turned into `<br>`; render unescaped.
    pub html_content: String,
    pub can_edit: bool,
}

impl PostView {
    pub fn new(post: &Post, can_edit: bool) -> Self {
        Self {
            id: post.id.unwrap_or_default(),
            subject: post.subject.clone(),
            author: post.author.clone(),
            created: post.created.format("%b %d, %Y").to_string(),
            modified: post.modified.format("%b %d, %Y %H:%M").to_string(),
            html_content: content_to_html(&post.content),
            can_edit,
        }
    }
}

pub fn content_to_html(content: &str) -> String {
    handlebars::html_escape(content).replace("\r\n", "<br>").replace('\n', "<br>")
}

/// Trimmed subject and the content as submitted, or the form message when either is
/// blank after trimming.
pub fn validate_post_form(subject: &str, content: &str) -> Result<(String, String), &'static str> {
    let (s, c) = (subject.trim(), content.trim());
    if s.is_empty() || c.is_empty() {
        return Err("subject and content, please!");
    }
    Ok((s.to_string(), content.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post() -> Post { Post::new("Hello", "first body", Some("alice".into())) }

    #[test]
    fn edit_prefixes_subject_on_first_content_change() {
        let mut p = post();
        assert!(p.apply_edit("Hello", "second body"));
        assert_eq!(p.subject, "[Edit] Hello");
        assert_eq!(p.content, "second body");
    }

    #[test]
    fn edit_does_not_double_prefix() {
        let mut p = post();
        p.apply_edit("Hello", "second body");
        let subject = p.subject.clone();
        assert!(p.apply_edit(&subject, "third body"));
        assert_eq!(p.subject, "[Edit] Hello");
    }

    #[test]
    fn subject_only_edit_is_not_marked() {
        let mut p = post();
        assert!(!p.apply_edit("Hello again", "first body"));
        assert_eq!(p.subject, "Hello again");
    }

    #[test]
    fn view_escapes_and_breaks_lines() {
        let mut p = Post::new("s", "line one\n<b>two</b>\r\nthree", None);
        p.id = Some(3);
        let v = PostView::new(&p, false);
        assert_eq!(v.id, 3);
        assert_eq!(v.html_content, "line one<br>&lt;b&gt;two&lt;/b&gt;<br>three");
        assert!(v.author.is_none());
    }

    #[test]
    fn post_form_requires_both_fields() {
        assert_eq!(validate_post_form("  ", "body"), Err("subject and content, please!"));
        assert_eq!(validate_post_form("subject", "\n"), Err("subject and content, please!"));
        assert_eq!(validate_post_form(" s ", "a\nb"), Ok(("s".to_string(), "a\nb".to_string())));
    }
}
