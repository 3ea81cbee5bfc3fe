//! TOML-based configuration persistence for the agent.
//!
//! Reads and writes [`AgentConfig`] to the platform-appropriate config file:
//! - Windows:  `%APPDATA%\Touchbridge\touchbridge.toml`
//! - Linux:    `~/.config/touchbridge/touchbridge.toml`
//! - macOS:    `~/Library/Application Support/Touchbridge/touchbridge.toml`
//!
//! # What does the file look like? (for beginners)
//!
//! ```toml
//! [session]
//! scale = 2
//! overlay_visible = false
//! screen_height = 2400
//!
//! [timing]
//! long_tap_delay_ms = 200
//! wheel_step = 120
//!
//! [logging]
//! level = "debug"
//! ```
//!
//! Every field carries a `#[serde(default = "...")]`, so a partial file (or
//! none at all) still yields a complete configuration. Durations are stored
//! as whole milliseconds because TOML has no duration type.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::session::{self, SessionConfig, TimingConfig};

/// File name inside the config directory.
pub const CONFIG_FILE_NAME: &str = "touchbridge.toml";

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level agent configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct AgentConfig {
    #[serde(default)]
    pub session: SessionSection,
    #[serde(default)]
    pub timing: TimingSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

/// Device and session settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionSection {
    /// Remote-to-host coordinate factor. Values below 1 are treated as 1.
    #[serde(default = "default_scale")]
    pub scale: i32,
    #[serde(default)]
    pub overlay_visible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen_width: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen_height: Option<i32>,
}

/// Gesture and scroll timing, in milliseconds and host pixels.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimingSection {
    #[serde(default = "default_long_tap_delay_ms")]
    pub long_tap_delay_ms: u64,
    #[serde(default = "default_long_press_multiplier")]
    pub long_press_multiplier: u32,
    #[serde(default = "default_long_press_slop_px")]
    pub long_press_slop_px: u32,
    #[serde(default = "default_wheel_step")]
    pub wheel_step: i32,
    #[serde(default = "default_wheel_duration_ms")]
    pub wheel_duration_ms: u64,
    #[serde(default = "default_wheel_margin_ms")]
    pub wheel_margin_ms: u64,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingSection {
    /// `tracing` level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub level: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_scale() -> i32 {
    1
}
fn default_long_tap_delay_ms() -> u64 {
    session::LONG_TAP_DELAY.as_millis() as u64
}
fn default_long_press_multiplier() -> u32 {
    session::LONG_PRESS_MULTIPLIER
}
fn default_long_press_slop_px() -> u32 {
    session::LONG_PRESS_SLOP_PX
}
fn default_wheel_step() -> i32 {
    session::WHEEL_STEP
}
fn default_wheel_duration_ms() -> u64 {
    session::WHEEL_DURATION.as_millis() as u64
}
fn default_wheel_margin_ms() -> u64 {
    session::WHEEL_MARGIN.as_millis() as u64
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            scale: default_scale(),
            overlay_visible: false,
            screen_width: None,
            screen_height: None,
        }
    }
}

impl Default for TimingSection {
    fn default() -> Self {
        Self {
            long_tap_delay_ms: default_long_tap_delay_ms(),
            long_press_multiplier: default_long_press_multiplier(),
            long_press_slop_px: default_long_press_slop_px(),
            wheel_step: default_wheel_step(),
            wheel_duration_ms: default_wheel_duration_ms(),
            wheel_margin_ms: default_wheel_margin_ms(),
        }
    }
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl AgentConfig {
    /// Builds the per-session settings the translator is constructed with.
    pub fn session(&self) -> SessionConfig {
        let t = &self.timing;
        SessionConfig {
            scale: self.session.scale.max(1),
            overlay_visible: self.session.overlay_visible,
            screen_width: self.session.screen_width,
            screen_height: self.session.screen_height,
            timing: TimingConfig {
                long_tap_delay: Duration::from_millis(t.long_tap_delay_ms),
                long_press_multiplier: t.long_press_multiplier,
                long_press_slop_px: t.long_press_slop_px,
                wheel_step: t.wheel_step,
                wheel_duration: Duration::from_millis(t.wheel_duration_ms),
                wheel_margin: Duration::from_millis(t.wheel_margin_ms),
            },
        }
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// Resolves the full path to the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Loads [`AgentConfig`] from the platform config file.
///
/// # Errors
///
/// See [`load_config_from`].
pub fn load_config() -> Result<AgentConfig, ConfigError> {
    load_config_from(&config_file_path()?)
}

/// Loads [`AgentConfig`] from `path`, returning the defaults if the file does
/// not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config_from(path: &Path) -> Result<AgentConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AgentConfig::default()),
        Err(e) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Persists `config` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config_to(path: &Path, config: &AgentConfig) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolves the platform config directory including the `Touchbridge` subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("Touchbridge"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("touchbridge"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME")
            .map(|h| PathBuf::from(h).join("Library").join("Application Support").join("Touchbridge"))
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
