//! Touchbridge agent: session replay entry point.
//!
//! Replays a recorded remote-control session against the recording host and
//! a synthetic UI tree, logging every decision the translator makes. This is
//! how gesture timing, key translation and text injection are checked end to
//! end without a device attached.
//!
//! # Usage
//!
//! ```text
//! touchbridge-agent --script session.jsonl [OPTIONS]
//!
//! Options:
//!   --script    <PATH>   JSON-lines session script to replay
//!   --config    <PATH>   Config file [default: platform config dir]
//!   --log-level <LEVEL>  Overrides the configured log level
//! ```
//!
//! `RUST_LOG` takes precedence over both `--log-level` and the config file.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load_config / load_config_from   -- TOML settings
//!  └─ load_script                      -- JSON-lines steps
//!  └─ InputService::new(RecordingHost, SyntheticTree, OffscreenEditor, UiThread)
//!  └─ replay(&service, &steps)         -- feeds every step, honours waits
//!  └─ summary log                      -- gestures, actions, final field text
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use touchbridge_agent::application::host::{AccessibilityTree, AutomationHost, Rect};
use touchbridge_agent::application::input_service::InputService;
use touchbridge_agent::infrastructure::host::mock::RecordingHost;
use touchbridge_agent::infrastructure::replay::{load_script, replay};
use touchbridge_agent::infrastructure::scratch_editor::OffscreenEditor;
use touchbridge_agent::infrastructure::storage::config::{load_config, load_config_from};
use touchbridge_agent::infrastructure::ui_thread::UiThread;
use touchbridge_agent::infrastructure::ui_tree::mock::{SyntheticNode, SyntheticTree};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Touchbridge remote-input agent.
///
/// Replays a recorded session script through the input translator.
#[derive(Debug, Parser)]
#[command(
    name = "touchbridge-agent",
    about = "Replays remote input sessions through the touchbridge translator",
    version
)]
struct Cli {
    /// JSON-lines session script to replay.
    #[arg(long, env = "TOUCHBRIDGE_SCRIPT")]
    script: PathBuf,

    /// Config file. Defaults to `touchbridge.toml` in the platform config
    /// directory; a missing file means built-in defaults.
    #[arg(long, env = "TOUCHBRIDGE_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (`error`, `warn`, `info`, `debug`, `trace`). Overrides the
    /// `[logging] level` config entry.
    #[arg(long)]
    log_level: Option<String>,
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config_from(path),
        None => load_config(),
    }
    .context("failed to load configuration")?;

    // ── Logging setup ─────────────────────────────────────────────────────────
    let level = cli.log_level.clone().unwrap_or_else(|| config.logging.level.clone());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();

    let steps = load_script(&cli.script)
        .with_context(|| format!("failed to load script {}", cli.script.display()))?;
    info!(steps = steps.len(), script = %cli.script.display(), "touchbridge agent starting");

    // ── Synthetic device ──────────────────────────────────────────────────────
    let field = SyntheticNode::new(2)
        .editable()
        .text("")
        .selection(0, 0)
        .bounds(Rect::new(0, 120, 1080, 200))
        .build();
    let window = SyntheticNode::new(1)
        .bounds(Rect::new(0, 0, 1080, 2400))
        .child(Arc::clone(&field))
        .build();
    let tree = SyntheticTree::new().input_focus(Arc::clone(&field)).root(window);
    let host = Arc::new(RecordingHost::new());
    let ui = UiThread::spawn("touchbridge-ui").context("failed to start UI thread")?;

    let service = InputService::new(
        Arc::clone(&host) as Arc<dyn AutomationHost>,
        Arc::new(tree) as Arc<dyn AccessibilityTree>,
        Box::new(OffscreenEditor::new()),
        Arc::new(ui),
        config.session(),
    );

    // ── Replay ────────────────────────────────────────────────────────────────
    let summary = tokio::select! {
        summary = replay(&service, &steps) => summary,
        signal = tokio::signal::ctrl_c() => {
            signal.context("failed to listen for Ctrl+C")?;
            info!("interrupted; stopping replay");
            return Ok(());
        }
    };

    // Let queued wheel strokes finish before reading the host log.
    service.gestures().wheel_queue().wait_idle().await;

    info!(
        session = %service.session_id(),
        rejected = summary.rejected,
        gestures = host.gestures().len(),
        actions = ?host.actions(),
        volume = ?host.volume_calls(),
        urls = ?host.urls(),
        overlay_visible = service.overlay_visible(),
        field_text = ?field.current_text(),
        "replay summary"
    );
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
