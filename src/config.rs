//! Runtime configuration.
//!
//! Built once at startup from defaults, then `QUILL_*` environment variables, then
//! command-line flags (see the `quill_server` binary), and handed to `AppState`.
//! Nothing here is global: tests build their own `BlogConfig` values.

use std::path::PathBuf;

use tracing::warn;

use crate::error::{AppError, AppResult};
use crate::identity::DeletePolicy;

pub const DEFAULT_HTTP_PORT: u16 = 8080;
pub const DEFAULT_BIND: &str = "0.0.0.0";
pub const DEFAULT_FEED_LIMIT: usize = 10;

#[derive(Clone)]
pub struct BlogConfig {
    pub http_port: u16,
    pub bind: String,
    /// HMAC key for session cookies. Fixed for the lifetime of the process.
    pub secret: String,
    /// True when no secret was configured and one was generated at startup; sessions
    /// then do not survive a restart.
    pub secret_generated: bool,
    /// Number of posts on the front page.
    pub feed_limit: usize,
    /// JSON snapshot file; `None` keeps everything in memory.
    pub data_file: Option<PathBuf>,
    /// Directory of template overrides.
    pub template_dir: Option<PathBuf>,
    pub delete_policy: DeletePolicy,
}

impl std::fmt::Debug for BlogConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlogConfig")
            .field("http_port", &self.http_port)
            .field("bind", &self.bind)
            .field("secret", &"<redacted>")
            .field("secret_generated", &self.secret_generated)
            .field("feed_limit", &self.feed_limit)
            .field("data_file", &self.data_file)
            .field("template_dir", &self.template_dir)
            .field("delete_policy", &self.delete_policy)
            .finish()
    }
}

impl BlogConfig {
    /// Defaults with an explicit secret.
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            http_port: DEFAULT_HTTP_PORT,
            bind: DEFAULT_BIND.to_string(),
            secret: secret.into(),
            secret_generated: false,
            feed_limit: DEFAULT_FEED_LIMIT,
            data_file: None,
            template_dir: None,
            delete_policy: DeletePolicy::default(),
        }
    }

    /// Fails only when no secret is configured and none can be generated.
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Same as `from_env` over an arbitrary variable source.
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> AppResult<Self> {
        let (secret, generated) = match lookup("QUILL_SECRET").filter(|s| !s.is_empty()) {
            Some(s) => (s, false),
            None => (generate_secret(getrandom::getrandom)?, true),
        };
        let mut cfg = Self::with_secret(secret);
        cfg.secret_generated = generated;
        if let Some(p) = lookup("QUILL_HTTP_PORT").and_then(|v| v.parse::<u16>().ok()) { cfg.http_port = p; }
        if let Some(b) = lookup("QUILL_BIND").filter(|s| !s.is_empty()) { cfg.bind = b; }
        if let Some(n) = lookup("QUILL_FEED_LIMIT").and_then(|v| v.parse::<usize>().ok()) { cfg.feed_limit = n; }
        cfg.data_file = lookup("QUILL_DATA_FILE").filter(|s| !s.is_empty()).map(PathBuf::from);
        cfg.template_dir = lookup("QUILL_TEMPLATE_DIR").filter(|s| !s.is_empty()).map(PathBuf::from);
        if let Some(raw) = lookup("QUILL_DELETE_POLICY") {
            match raw.parse::<DeletePolicy>() {
                Ok(p) => cfg.delete_policy = p,
                Err(e) => warn!(target: "quill::config", "ignoring QUILL_DELETE_POLICY: {}", e),
            }
        }
        Ok(cfg)
    }

    pub fn bind_addr(&self) -> String { format!("{}:{}", self.bind, self.http_port) }
}

/// 32 bytes from `fill` as hex. Without OS randomness there is no safe secret, so
/// startup stops instead of signing cookies with a guessable key.
fn generate_secret<F>(fill: F) -> AppResult<String>
where
    F: FnOnce(&mut [u8]) -> Result<(), getrandom::Error>,
{
    let mut buf = [0u8; 32];
    fill(&mut buf[..]).map_err(|e| {
        AppError::internal("secret_unavailable", format!("cannot generate a session secret ({}); set QUILL_SECRET", e))
    })?;
    Ok(hex::encode(buf))
}
