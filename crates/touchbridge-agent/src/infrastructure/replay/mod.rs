//! Session replay: JSON-lines scripts of recorded remote input.
//!
//! # Script format (for beginners)
//!
//! One JSON object per line. Blank lines and lines starting with `#` are
//! skipped.
//!
//! ```text
//! {"pointer":{"kind":"mouse","mask":9,"x":100,"y":400}}
//! {"wait":{"ms":50}}
//! {"pointer":{"kind":"mouse","mask":10,"x":100,"y":300}}
//! {"key":{"down":false,"press":true,"mode":"sequence","seq":"hello"}}
//! {"pointer":{"kind":"mouse","mask":38,"x":0,"y":0,"aux":"https://example.com"}}
//! ```
//!
//! Key steps are encoded with the wire codec and fed through
//! [`InputService::handle_key`], so a replay exercises the same decode path
//! as live traffic.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};
use touchbridge_core::protocol::messages::PointerKind;
use touchbridge_core::{encode_key_message, KeyEventMessage, MAX_SEQUENCE_LEN};

use crate::application::input_service::InputService;

/// Error type for loading a script.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("I/O error reading script {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid script step on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("key step on line {line} has a {len}-byte sequence; the limit is {MAX_SEQUENCE_LEN}")]
    SequenceTooLong { line: usize, len: usize },
}

/// One recorded pointer call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerStep {
    pub kind: PointerKind,
    pub mask: i32,
    pub x: i32,
    pub y: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aux: Option<String>,
}

/// A pause between steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitStep {
    pub ms: u64,
}

/// One line of a replay script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptStep {
    Pointer(PointerStep),
    Key(KeyEventMessage),
    Wait(WaitStep),
}

/// Counts gathered while replaying.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub pointer_steps: usize,
    pub key_steps: usize,
    pub waits: usize,
    /// Steps the input service rejected (decode or translation errors).
    pub rejected: usize,
}

/// Parses a JSON-lines script.
///
/// # Errors
///
/// Returns [`ReplayError::Parse`] with the 1-based line number of the first
/// invalid step, or [`ReplayError::SequenceTooLong`] for a key step whose
/// text would not fit in one key message.
pub fn parse_script(text: &str) -> Result<Vec<ScriptStep>, ReplayError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with('#')
        })
        .map(|(i, line)| {
            let step: ScriptStep =
                serde_json::from_str(line).map_err(|source| ReplayError::Parse { line: i + 1, source })?;
            if let ScriptStep::Key(KeyEventMessage { seq: Some(seq), .. }) = &step {
                if seq.len() > MAX_SEQUENCE_LEN {
                    return Err(ReplayError::SequenceTooLong {
                        line: i + 1,
                        len: seq.len(),
                    });
                }
            }
            Ok(step)
        })
        .collect()
}

/// Reads and parses the script at `path`.
///
/// # Errors
///
/// Returns [`ReplayError::Io`] if the file cannot be read, otherwise see
/// [`parse_script`].
pub fn load_script(path: &Path) -> Result<Vec<ScriptStep>, ReplayError> {
    let text = std::fs::read_to_string(path).map_err(|source| ReplayError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_script(&text)
}

/// Feeds `steps` through `service` in order, honouring waits.
///
/// A rejected step is logged and counted; replay carries on with the next one.
pub async fn replay(service: &InputService, steps: &[ScriptStep]) -> ReplaySummary {
    let mut summary = ReplaySummary::default();
    for (index, step) in steps.iter().enumerate() {
        let result = match step {
            ScriptStep::Pointer(p) => {
                summary.pointer_steps += 1;
                service.handle_pointer(p.kind, p.mask, p.x, p.y, p.aux.as_deref())
            }
            ScriptStep::Key(msg) => {
                summary.key_steps += 1;
                service.handle_key(&encode_key_message(msg))
            }
            ScriptStep::Wait(w) => {
                summary.waits += 1;
                debug!(ms = w.ms, "replay wait");
                tokio::time::sleep(Duration::from_millis(w.ms)).await;
                Ok(())
            }
        };
        if let Err(e) = result {
            summary.rejected += 1;
            warn!(step = index, "replay step rejected: {e}");
        }
    }
    service.flush_ui().await;
    info!(
        pointer = summary.pointer_steps,
        keys = summary.key_steps,
        waits = summary.waits,
        rejected = summary.rejected,
        "replay finished"
    );
    summary
}

// ── Tests ─────────────────────────────────────────────────────────────────────
