//! Infrastructure layer for the agent.
//!
//! Contains the device-facing adapters and the process plumbing around the
//! application layer.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `touchbridge_core`, but MUST NOT be imported by the `application` or
//! domain layers (tests excepted).
//!
//! # Sub-modules
//!
//! - **`host`** – Implementations of `AutomationHost`. A `RecordingHost` that
//!   records every call stands in for the device in tests and replays.
//!
//! - **`ui_tree`** – Implementations of `AccessibilityTree`/`UiNode`,
//!   including an in-memory synthetic tree.
//!
//! - **`scratch_editor`** – The offscreen editor the text injector uses to
//!   compute what a key does to a field's text.
//!
//! - **`ui_thread`** – A named worker thread that runs UI jobs in order.
//!
//! - **`storage`** – TOML configuration file persistence.
//!
//! - **`replay`** – JSON-lines session scripts and the replay driver.

pub mod host;
pub mod replay;
pub mod scratch_editor;
pub mod storage;
pub mod ui_thread;
pub mod ui_tree;
