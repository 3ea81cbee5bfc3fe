//! A dedicated thread that stands in for the host's UI thread.
//!
//! Accessibility actions and URL launches must run on the host's main UI
//! thread, never on the transport task that decoded the message. The agent
//! owns one [`UiThread`] per session and posts closures to it.
//!
//! # How it works (for beginners)
//!
//! ```text
//! transport task ──post(job)──► mpsc channel ──► "touchbridge-ui" thread
//!                                                  runs jobs one by one
//! ```
//!
//! Jobs run in the order they were posted. A job that panics is logged and
//! the thread moves on to the next job. Dropping the `UiThread` closes the
//! channel, lets queued jobs finish, and joins the thread.

use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};

use tracing::{debug, error};

use crate::application::host::{UiExecutor, UiJob};

/// Handle to the UI worker thread.
pub struct UiThread {
    sender: Option<Sender<UiJob>>,
    handle: Option<JoinHandle<()>>,
}

impl UiThread {
    /// Starts a worker thread called `name`.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the thread cannot be spawned.
    pub fn spawn(name: &str) -> io::Result<Self> {
        let (sender, receiver) = mpsc::channel::<UiJob>();
        let handle = thread::Builder::new().name(name.to_string()).spawn(move || {
            debug!("UI thread started");
            while let Ok(job) = receiver.recv() {
                if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
                    error!("UI job panicked; continuing with the next job");
                }
            }
            debug!("UI thread stopped");
        })?;
        Ok(Self {
            sender: Some(sender),
            handle: Some(handle),
        })
    }
}

impl UiExecutor for UiThread {
    fn execute(&self, job: UiJob) -> bool {
        match &self.sender {
            Some(sender) => sender.send(job).is_ok(),
            None => false,
        }
    }
}

impl Drop for UiThread {
    fn drop(&mut self) {
        self.sender.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("UI thread terminated abnormally");
            }
        }
    }
}
