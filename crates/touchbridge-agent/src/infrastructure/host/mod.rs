//! Host adapters implementing [`AutomationHost`](crate::application::host::AutomationHost).
//!
//! A production build links the device's automation service here. The
//! recording host in [`mock`] stands in for it in tests and in the replay
//! driver.

pub mod mock;
