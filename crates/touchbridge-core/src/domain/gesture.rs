//! Gesture geometry: pointer position, open paths, and dispatchable strokes.
//!
//! Coordinates here are already scaled into host pixel space. Instants are
//! supplied by the caller so this module never reads a clock itself; the agent
//! passes in instants from its (possibly paused) runtime clock.

use std::time::{Duration, Instant};

use thiserror::Error;

/// The shortest stroke duration the host accepts.
pub const MIN_STROKE_DURATION: Duration = Duration::from_millis(1);

/// Errors raised when a stroke cannot be built.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GestureError {
    /// The path has no points.
    #[error("gesture path is empty")]
    EmptyPath,

    /// A point lies left of or above the screen origin.
    #[error("negative coordinate in stroke: ({x}, {y})")]
    NegativeCoordinate { x: i32, y: i32 },

    /// The host cannot replay a stroke that takes no time.
    #[error("stroke duration must be positive")]
    ZeroDuration,
}

/// A point in host pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Clamps both axes to ≥0.
    pub fn clamped(self) -> Self {
        Self::new(self.x.max(0), self.y.max(0))
    }

    /// Manhattan distance to `other`.
    pub fn manhattan(self, other: Point) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

// ── Pointer state ─────────────────────────────────────────────────────────────

/// Where the remote pointer is and what it is doing.
///
/// Lives for the whole session and is never reset; the gesture state machine
/// is its only writer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PointerState {
    pub x: i32,
    pub y: i32,
    pub button_down: bool,
    pub long_press_armed: bool,
    pub last_move_at: Option<Instant>,
    /// Cumulative `|dx| + |dy|` since the last button-down.
    pub travel_since_down: u32,
}

impl PointerState {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Jumps to `to` without counting it as movement.
    pub fn set_position(&mut self, to: Point) {
        let to = to.clamped();
        self.x = to.x;
        self.y = to.y;
    }

    /// Moves to `to`, accumulating travel while the button is held.
    pub fn move_to(&mut self, to: Point, at: Instant) {
        let to = to.clamped();
        if self.button_down {
            self.travel_since_down = self.travel_since_down.saturating_add(self.position().manhattan(to));
        }
        self.x = to.x;
        self.y = to.y;
        self.last_move_at = Some(at);
    }

    /// Marks the button as held and resets the travel counter.
    pub fn press(&mut self) {
        self.button_down = true;
        self.travel_since_down = 0;
    }

    pub fn release(&mut self) {
        self.button_down = false;
        self.long_press_armed = false;
    }
}

// ── Gesture path ──────────────────────────────────────────────────────────────

/// An open, growing path that becomes a [`Stroke`] when the pointer lifts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GesturePath {
    points: Vec<Point>,
    started_at: Instant,
}

impl GesturePath {
    /// Opens a path at `start`.
    pub fn begin(start: Point, at: Instant) -> Self {
        Self {
            points: vec![start],
            started_at: at,
        }
    }

    /// Extends the path. Consecutive duplicates are collapsed.
    pub fn line_to(&mut self, to: Point) {
        if self.points.last() != Some(&to) {
            self.points.push(to);
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Closes the path at `end` and builds the stroke.
    ///
    /// The duration is `at - started_at`, floored to [`MIN_STROKE_DURATION`].
    pub fn finish(mut self, end: Point, at: Instant) -> Result<Stroke, GestureError> {
        self.line_to(end);
        let elapsed = at.saturating_duration_since(self.started_at);
        Stroke::new(self.points, elapsed.max(MIN_STROKE_DURATION))
    }
}

// ── Stroke ────────────────────────────────────────────────────────────────────

/// A validated, immutable single-finger stroke the host replays.
///
/// The start offset is always zero: every dispatch carries exactly one stroke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stroke {
    points: Vec<Point>,
    duration: Duration,
}

impl Stroke {
    /// Builds a stroke, rejecting empty paths, negative points and zero duration.
    pub fn new(points: Vec<Point>, duration: Duration) -> Result<Self, GestureError> {
        if points.is_empty() {
            return Err(GestureError::EmptyPath);
        }
        if let Some(p) = points.iter().find(|p| p.x < 0 || p.y < 0) {
            return Err(GestureError::NegativeCoordinate { x: p.x, y: p.y });
        }
        if duration.is_zero() {
            return Err(GestureError::ZeroDuration);
        }
        Ok(Self { points, duration })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// First point. Strokes are never empty.
    pub fn start(&self) -> Point {
        self.points[0]
    }

    pub fn end(&self) -> Point {
        self.points[self.points.len() - 1]
    }

    pub fn start_offset(&self) -> Duration {
        Duration::ZERO
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

// ── Scroll strokes ────────────────────────────────────────────────────────────

/// Direction of one wheel notch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
}

/// Builds the short vertical stroke that emulates one wheel notch at `origin`.
///
/// Scrolling down drags the content up (`y → y - step`); scrolling up drags it
/// down (`y → y + step`).
pub fn scroll_stroke(
    origin: Point,
    direction: ScrollDirection,
    step: i32,
    duration: Duration,
) -> Result<Stroke, GestureError> {
    let end_y = match direction {
        ScrollDirection::Down => origin.y - step,
        ScrollDirection::Up => origin.y + step,
    };
    Stroke::new(vec![origin, Point::new(origin.x, end_y)], duration)
}
