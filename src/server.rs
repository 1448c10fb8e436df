//!
//! quill HTTP server
//! -----------------
//! Axum front end for the blog.
//!
//! Responsibilities:
//! - Session handling through signed `user_id` / `user_name` cookies (no server-side table).
//! - Signup, login, logout and welcome pages backed by `identity::AccountService`.
//! - Front-page feed, permalinks, and new/edit/delete post flows guarded by the
//!   `identity` authorization rules.
//! - Every failure renders a page; nothing is returned as a bare fault.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use serde_json::json;
use tracing::{info, warn};

use crate::config::BlogConfig;
use crate::error::{AppError, AppResult};
use crate::identity::{AccountService, SessionManager};
use crate::render::{SharedRenderer, TemplateRenderer};
use crate::storage::{MemoryStore, SharedPosts, SharedUsers};

pub mod account;
pub mod blog;
pub mod context;

pub use context::{redirect, RequestContext};

/// Shared server state injected into all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<BlogConfig>,
    pub accounts: AccountService,
    pub posts: SharedPosts,
    pub renderer: SharedRenderer,
}

impl AppState {
    pub fn new(config: BlogConfig, users: SharedUsers, posts: SharedPosts, renderer: SharedRenderer) -> Self {
        let sessions = SessionManager::from_secret(config.secret.as_bytes());
        Self { config: Arc::new(config), accounts: AccountService::new(users, sessions), posts, renderer }
    }

    /// Build the store and renderer the configuration asks for.
    pub fn from_config(config: BlogConfig) -> AppResult<Self> {
        let store = match &config.data_file {
            Some(path) => MemoryStore::open(path)?,
            None => MemoryStore::new(),
        };
        let renderer = match &config.template_dir {
            Some(dir) => TemplateRenderer::with_overrides(dir)?,
            None => TemplateRenderer::new()?,
        };
        let store = Arc::new(store);
        Ok(Self::new(config, store.clone(), store, Arc::new(renderer)))
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(blog::front))
        .route("/blog", get(blog::front))
        .route("/newpost", get(blog::new_post_form).post(blog::new_post))
        .route("/post/{id}", get(blog::permalink))
        .route("/post/{id}/edit", get(blog::edit_post_form).post(blog::edit_post))
        .route("/post/{id}/delete", post(blog::delete_post))
        .route("/signup", get(account::signup_form).post(account::signup))
        .route("/login", get(account::login_form).post(account::login))
        .route("/logout", get(account::logout))
        .route("/welcome", get(account::welcome))
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .with_state(state)
}

async fn not_found(ctx: RequestContext) -> Response {
    ctx.error_page(&AppError::not_found("no_route", "There is nothing here."))
}

async fn method_not_allowed(ctx: RequestContext) -> Response {
    ctx.status_page(StatusCode::METHOD_NOT_ALLOWED, "Not allowed", "That page does not accept this kind of request.")
}

fn log_startup(config: &BlogConfig) {
    info!(
        target: "startup",
        "quill starting: bind={}, feed_limit={}, data_file={:?}, template_dir={:?}, delete_policy={:?}",
        config.bind_addr(), config.feed_limit, config.data_file, config.template_dir, config.delete_policy
    );
    if config.secret_generated {
        warn!(target: "startup", "QUILL_SECRET not set; using a per-process secret, sessions end on restart");
    }
}

pub async fn run_with_config(config: BlogConfig) -> anyhow::Result<()> {
    log_startup(&config);
    let addr: SocketAddr = config.bind_addr().parse()
        .with_context(|| format!("Invalid bind address: {}", config.bind_addr()))?;
    let state = AppState::from_config(config).context("While building application state")?;
    let listener = tokio::net::TcpListener::bind(addr).await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Starting server on {}", addr);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// Convenience entry point using configuration from the environment.
pub async fn run() -> anyhow::Result<()> {
    run_with_config(BlogConfig::from_env()?).await
}

pub(crate) fn status_of(err: &AppError) -> StatusCode {
    StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

pub(crate) fn empty() -> serde_json::Value { json!({}) }
