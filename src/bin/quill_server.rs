//!
//! quill server binary
//! -------------------
//! Command-line entry point for the blog. Configuration comes from `QUILL_*`
//! environment variables; the flags below override them.

use anyhow::Result;
use std::env;
use std::path::PathBuf;

use quill::BlogConfig;

fn parse_port_arg(args: &[String], flag: &str) -> Option<u16> {
    arg_value(args, flag).and_then(|v| v.parse::<u16>().ok())
}

fn arg_value(args: &[String], flag: &str) -> Option<String> {
    let mut i = 0;
    while i < args.len() {
        if args[i] == flag && i + 1 < args.len() {
            return Some(args[i + 1].clone());
        }
        i += 1;
    }
    None
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")))
        .try_init();

    let args: Vec<String> = env::args().collect();

    if has_flag(&args, "--help") || has_flag(&args, "-h") {
        println!("quill Server\n\nUSAGE:\n  quill_server [--http-port N] [--bind ADDR] [--data-file PATH] [--template-dir PATH] [--feed-limit N]\n\nOPTIONS:\n  --http-port N         HTTP port (env: QUILL_HTTP_PORT, default 8080)\n  --bind ADDR           Bind address (env: QUILL_BIND, default 0.0.0.0)\n  --data-file PATH      JSON snapshot file (env: QUILL_DATA_FILE, default: in-memory only)\n  --template-dir PATH   Template overrides (env: QUILL_TEMPLATE_DIR)\n  --feed-limit N        Posts on the front page (env: QUILL_FEED_LIMIT, default 10)\n\nENVIRONMENT:\n  QUILL_SECRET          Cookie signing secret. Unset: random per process.\n  QUILL_DELETE_POLICY   permissive (default) | owner_only\n");
        return Ok(());
    }

    // CLI arguments override environment
    let mut config = BlogConfig::from_env()?;
    if let Some(p) = parse_port_arg(&args, "--http-port") { config.http_port = p; }
    if let Some(b) = arg_value(&args, "--bind") { config.bind = b; }
    if let Some(f) = arg_value(&args, "--data-file") { config.data_file = Some(PathBuf::from(f)); }
    if let Some(d) = arg_value(&args, "--template-dir") { config.template_dir = Some(PathBuf::from(d)); }
    if let Some(n) = arg_value(&args, "--feed-limit").and_then(|v| v.parse::<usize>().ok()) { config.feed_limit = n; }

    println!("quill starting on {}", config.bind_addr());
    quill::server::run_with_config(config).await
}
