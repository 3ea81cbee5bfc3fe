//! Domain entities for remote touch input.
//!
//! This module contains pure gesture geometry with no host or runtime
//! dependencies.
//!
//! # What belongs in the domain? (for beginners)
//!
//! The domain layer holds the data types whose rules do not change no matter
//! which device, async runtime, or accessibility API sits around them:
//!
//! - A [`gesture::Stroke`] is always a non-empty list of non-negative points
//!   with a positive duration.
//! - A [`gesture::GesturePath`] always starts where the finger went down.
//!
//! Timers, queues and host calls live in the agent crate and depend on these
//! types; the domain never depends on them. That keeps every rule here
//! testable with plain `#[test]` functions.

/// Pointer state, gesture paths, and validated strokes.
///
/// See [`gesture::Stroke`] for the type the host replays.
pub mod gesture;
