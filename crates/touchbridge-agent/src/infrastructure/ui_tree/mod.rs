//! UI tree adapters implementing [`AccessibilityTree`](crate::application::host::AccessibilityTree).
//!
//! The device build walks the live accessibility tree. [`mock`] provides a
//! synthetic tree built in memory, used by tests and by the replay driver.

pub mod mock;
