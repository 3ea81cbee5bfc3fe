//! Application layer use cases for the agent.
//!
//! # What use cases does the agent have?
//!
//! - **`host`** – The contracts the agent needs from the device: gesture
//!   dispatch, global actions, volume, the accessibility tree and the
//!   optional direct input connection, plus the UI-thread executor.
//!   Implementations live in the infrastructure layer and are injected at
//!   construction time.
//!
//! - **`translate_key`** – Turns a decoded key message into a host key code
//!   and/or literal text, and recognises the volume and power keys.
//!
//! - **`gesture`** – The pointer state machine: strokes, long press, the
//!   back/home/recents buttons.
//!
//! - **`wheel_queue`** – Serializes scroll strokes so only one is in flight.
//!
//! - **`text_injector`** – Finds the text field that should receive input and
//!   rewrites its text and selection through accessibility actions.
//!
//! - **`session`** – Per-session settings (scale, overlay, timing constants).
//!
//! - **`input_service`** – The single entry point that wires everything
//!   together for the transport.

pub mod gesture;
pub mod host;
pub mod input_service;
pub mod session;
pub mod text_injector;
pub mod translate_key;
pub mod wheel_queue;
