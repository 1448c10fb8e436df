//! Feed, permalink, and post mutation handlers.

use axum::extract::rejection::FormRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Form;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::{redirect, AppState, RequestContext};
use crate::error::{AppError, AppResult};
use crate::identity::{can_create_post, can_delete_post, can_edit_post};
use crate::posts::{validate_post_form, Post, PostView};

#[derive(Debug, Default, Deserialize)]
pub struct PostForm {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub content: String,
}

/// Non-numeric ids are treated like unknown ones.
fn load_post(state: &AppState, raw_id: &str) -> AppResult<Post> {
    let missing = || AppError::not_found("post_not_found", format!("No post with id {}.", raw_id));
    let id = raw_id.parse::<u64>().map_err(|_| missing())?;
    state.posts.find_post_by_id(id)?.ok_or_else(missing)
}

fn forbidden_edit() -> AppError {
    AppError::forbidden("not_author", "You can only edit posts you wrote.")
}

pub async fn front(State(state): State<AppState>, ctx: RequestContext) -> Response {
    match state.posts.list_recent_posts(state.config.feed_limit) {
        Ok(posts) => {
            let views: Vec<PostView> = posts
                .iter()
                .map(|p| PostView::new(p, can_edit_post(p, ctx.unverified_user_name())))
                .collect();
            ctx.render(StatusCode::OK, "blog.html", json!({ "posts": views }))
        }
        Err(e) => ctx.error_page(&e),
    }
}

pub async fn permalink(State(state): State<AppState>, ctx: RequestContext, Path(id): Path<String>) -> Response {
    match load_post(&state, &id) {
        Ok(post) => {
            let view = PostView::new(&post, can_edit_post(&post, ctx.unverified_user_name()));
            ctx.render(StatusCode::OK, "permalink.html", json!({ "title": post.subject, "post": view }))
        }
        Err(e) => ctx.error_page(&e),
    }
}

pub async fn new_post_form(ctx: RequestContext) -> Response {
    if !can_create_post(&ctx.session) {
        return redirect("/login", &[]);
    }
    ctx.render(StatusCode::OK, "newpost.html", json!({ "title": "New post" }))
}

pub async fn new_post(
    State(state): State<AppState>,
    ctx: RequestContext,
    form: Result<Form<PostForm>, FormRejection>,
) -> Response {
    if !can_create_post(&ctx.session) {
        return redirect("/login", &[]);
    }
    let Form(form) = match form {
        Ok(f) => f,
        Err(rej) => return ctx.form_rejected(rej),
    };
    let (subject, content) = match validate_post_form(&form.subject, &form.content) {
        Ok(v) => v,
        Err(msg) => {
            return ctx.render(
                StatusCode::BAD_REQUEST,
                "newpost.html",
                json!({ "title": "New post", "subject": form.subject, "content": form.content, "error": msg }),
            );
        }
    };
    let author = ctx.user_name().map(str::to_string);
    match state.posts.save_post(Post::new(subject, content, author)) {
        Ok(saved) => {
            let id = saved.id.unwrap_or_default();
            info!(target: "quill::blog", "post.create id={} author={:?}", id, saved.author);
            redirect(&format!("/post/{}", id), &[])
        }
        Err(e) => ctx.error_page(&e),
    }
}

// Ownership for editing is checked against the unsigned `user_name` payload, matching
// the historical handler. See `SessionManager::current_user_name_unverified`.
pub async fn edit_post_form(State(state): State<AppState>, ctx: RequestContext, Path(id): Path<String>) -> Response {
    let post = match load_post(&state, &id) {
        Ok(p) => p,
        Err(e) => return ctx.error_page(&e),
    };
    if !can_edit_post(&post, ctx.unverified_user_name()) {
        return ctx.error_page(&forbidden_edit());
    }
    ctx.render(
        StatusCode::OK,
        "editpost.html",
        json!({ "title": "Edit post", "id": post.id, "subject": post.subject, "content": post.content }),
    )
}

pub async fn edit_post(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
    form: Result<Form<PostForm>, FormRejection>,
) -> Response {
    let mut post = match load_post(&state, &id) {
        Ok(p) => p,
        Err(e) => return ctx.error_page(&e),
    };
    if !can_edit_post(&post, ctx.unverified_user_name()) {
        return ctx.error_page(&forbidden_edit());
    }
    let Form(form) = match form {
        Ok(f) => f,
        Err(rej) => return ctx.form_rejected(rej),
    };
    let (subject, content) = match validate_post_form(&form.subject, &form.content) {
        Ok(v) => v,
        Err(msg) => {
            return ctx.render(
                StatusCode::BAD_REQUEST,
                "editpost.html",
                json!({ "title": "Edit post", "id": post.id, "subject": form.subject, "content": form.content, "error": msg }),
            );
        }
    };
    let changed = post.apply_edit(&subject, &content);
    match state.posts.save_post(post) {
        Ok(saved) => {
            let id = saved.id.unwrap_or_default();
            info!(target: "quill::blog", "post.edit id={} content_changed={}", id, changed);
            redirect(&format!("/post/{}", id), &[])
        }
        Err(e) => ctx.error_page(&e),
    }
}

/// Under the default `DeletePolicy::Permissive` any request may delete any post.
/// `OwnerOnly` checks the verified session name.
pub async fn delete_post(State(state): State<AppState>, ctx: RequestContext, Path(id): Path<String>) -> Response {
    let post = match load_post(&state, &id) {
        Ok(p) => p,
        Err(e) => return ctx.error_page(&e),
    };
    if !can_delete_post(&post, ctx.user_name(), state.config.delete_policy) {
        return ctx.error_page(&AppError::forbidden("not_author", "You can only delete posts you wrote."));
    }
    let post_id = post.id.unwrap_or_default();
    match state.posts.delete_post(post_id) {
        Ok(()) => {
            info!(target: "quill::blog", "post.delete id={} by={:?}", post_id, ctx.user_name());
            redirect("/", &[])
        }
        Err(e) => ctx.error_page(&e),
    }
}
