//! Per-session settings handed to the translator at construction time.

use std::time::Duration;

/// Base delay the long-press and wheel-button-hold timers derive from.
pub const LONG_TAP_DELAY: Duration = Duration::from_millis(200);
/// The long-press timer fires after this many base delays.
pub const LONG_PRESS_MULTIPLIER: u32 = 4;
/// Movement (`|dx| + |dy|`, host pixels) that cancels a pending long press.
pub const LONG_PRESS_SLOP_PX: u32 = 8;
/// Vertical travel of one wheel-notch stroke, in host pixels.
pub const WHEEL_STEP: i32 = 120;
/// Duration of one wheel-notch stroke.
pub const WHEEL_DURATION: Duration = Duration::from_millis(50);
/// Extra pause between wheel strokes so the host never sees two overlap.
pub const WHEEL_MARGIN: Duration = Duration::from_millis(10);

/// Timing constants for gestures and scrolling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimingConfig {
    pub long_tap_delay: Duration,
    pub long_press_multiplier: u32,
    pub long_press_slop_px: u32,
    pub wheel_step: i32,
    pub wheel_duration: Duration,
    pub wheel_margin: Duration,
}

impl TimingConfig {
    /// How long a press must be held, without moving, to become a long press.
    pub fn long_press_delay(&self) -> Duration {
        self.long_tap_delay * self.long_press_multiplier
    }

    /// Pause between consecutive wheel strokes.
    pub fn wheel_pace(&self) -> Duration {
        self.wheel_duration + self.wheel_margin
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            long_tap_delay: LONG_TAP_DELAY,
            long_press_multiplier: LONG_PRESS_MULTIPLIER,
            long_press_slop_px: LONG_PRESS_SLOP_PX,
            wheel_step: WHEEL_STEP,
            wheel_duration: WHEEL_DURATION,
            wheel_margin: WHEEL_MARGIN,
        }
    }
}

/// Everything one remote-control session needs to know about the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Integer factor from remote coordinates to host pixels. Never below 1.
    pub scale: i32,
    /// Whether the overlay starts visible.
    pub overlay_visible: bool,
    /// When set, gesture points are clamped to `0..screen_width`.
    pub screen_width: Option<i32>,
    /// When set, gesture points are clamped to `0..screen_height` and
    /// scroll-up strokes that would run past the bottom are dropped.
    pub screen_height: Option<i32>,
    pub timing: TimingConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            scale: 1,
            overlay_visible: false,
            screen_width: None,
            screen_height: None,
            timing: TimingConfig::default(),
        }
    }
}
