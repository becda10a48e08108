//! Tool-server binary entry point.
//!
//! Reads one `{ tool_name, params }` invocation per line from stdin,
//! dispatches it, and writes one `{ result }` or `{ error }` JSON line to
//! stdout. The line-delimited framing itself is a placeholder for whatever
//! transport a deployment actually wants (stdio, a socket, a queue) —
//! that framing layer is explicitly out of scope for this crate, so this
//! binary stays a thin wiring shim over [`tool_server::dispatch`] rather
//! than a full protocol implementation.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, warn};

use memory_store::MemoryStore;
use reasoning_core::config::EngineConfig;
use reasoning_core::pattern::PatternRegistry;

use tool_server::dispatch::{dispatch, AppState, ToolInvocation};

#[derive(Parser, Debug)]
#[command(name = "tool-server", about = "tool-invocation dispatch boundary over the cognitive reasoning engine")]
struct Args {
    /// Path to the redb-backed memory store file.
    #[arg(long, default_value = "memory.redb")]
    memory_path: PathBuf,

    /// Path to an `EngineConfig` TOML document. Falls back to built-in
    /// defaults when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Paths to pattern-catalogue TOML documents, loaded in order. A
    /// catalogue that fails validation is rejected wholesale and aborts
    /// startup.
    #[arg(long = "catalogue")]
    catalogues: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).with_writer(std::io::stderr).init();

    let args = Args::parse();
    let state = build_state(&args).await?;

    info!("tool-server ready, reading invocations from stdin");
    run_stdio_loop(&state).await
}

async fn build_state(args: &Args) -> anyhow::Result<AppState> {
    let config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path).with_context(|| format!("reading config at {}", path.display()))?;
            EngineConfig::from_toml(&text).with_context(|| format!("parsing config at {}", path.display()))?
        }
        None => EngineConfig::default(),
    };

    let mut patterns = PatternRegistry::empty();
    for path in &args.catalogues {
        let text = std::fs::read_to_string(path).with_context(|| format!("reading catalogue at {}", path.display()))?;
        let catalogue = toml::from_str(&text).with_context(|| format!("parsing catalogue at {}", path.display()))?;
        let added = patterns.load_catalogue(catalogue).with_context(|| format!("validating catalogue at {}", path.display()))?;
        info!(path = %path.display(), patterns = added, "loaded pattern catalogue");
    }

    let memory = MemoryStore::open(&args.memory_path).await.with_context(|| format!("opening memory store at {}", args.memory_path.display()))?;

    Ok(AppState { memory, patterns: Arc::new(patterns), config: Arc::new(config) })
}

/// Invocations are processed one line at a time, in order; stdin reads
/// block the current worker thread briefly between lines, mirroring how
/// the teacher's own JSON-RPC loop reads stdin synchronously from within
/// an async function.
async fn run_stdio_loop(state: &AppState) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = line.context("reading a line from stdin")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let response = handle_line(state, line).await;
        writeln!(stdout, "{response}")?;
        stdout.flush()?;
    }

    info!("stdin closed, shutting down");
    Ok(())
}

async fn handle_line(state: &AppState, line: &str) -> String {
    let invocation: ToolInvocation = match serde_json::from_str::<serde_json::Value>(line) {
        Ok(value) => match parse_invocation(value) {
            Ok(invocation) => invocation,
            Err(err) => return serde_json::json!({ "error": err }).to_string(),
        },
        Err(e) => {
            warn!("failed to parse invocation: {e}");
            return serde_json::json!({ "error": { "code": "bad_params", "message": format!("invalid JSON: {e}") } }).to_string();
        }
    };

    let tool_name = invocation.tool_name.clone();
    match dispatch(state, invocation).await {
        Ok(result) => serde_json::json!({ "result": result }).to_string(),
        Err(err) => {
            error!(tool = %tool_name, code = %err.code, "tool invocation failed");
            serde_json::json!({ "error": err }).to_string()
        }
    }
}

fn parse_invocation(value: serde_json::Value) -> Result<ToolInvocation, tool_server::error::ToolError> {
    let obj = value.as_object().ok_or_else(|| tool_server::error::ToolError::bad_params("invocation must be a JSON object"))?;
    let tool_name = obj.get("tool_name").and_then(serde_json::Value::as_str).ok_or_else(|| tool_server::error::ToolError::bad_params("missing 'tool_name'"))?.to_string();
    let params = obj.get("params").and_then(serde_json::Value::as_object).cloned().unwrap_or_default();
    Ok(ToolInvocation { tool_name, params })
}
