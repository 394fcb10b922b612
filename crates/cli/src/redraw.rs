//! Periodic redraw on a background thread, shared by the spinner and the progress bar.

use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, warn};

use opkit_core::error::Result;

/// Runs a draw function every `period` until stopped.
///
/// The first draw happens immediately. Stopping drops the channel sender, which wakes
/// the thread out of its wait, and joins it, so no draw runs after [`RedrawWorker::stop`]
/// returns.
pub struct RedrawWorker {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl RedrawWorker {
    pub fn start<F>(period: Duration, mut draw: F) -> Self
    where
        F: FnMut() -> Result<()> + Send + 'static,
    {
        let (stop_sender, stop_receiver) = mpsc::channel::<()>();

        let handle = thread::spawn(move || loop {
            if let Err(e) = draw() {
                warn!("Redraw failed: {e}");
            }

            match stop_receiver.recv_timeout(period) {
                Err(RecvTimeoutError::Timeout) => {}
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        });

        debug!("Redraw worker started with period {period:?}");

        Self {
            stop: Some(stop_sender),
            handle: Some(handle),
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Signals the thread and waits for it to finish.
    pub fn stop(&mut self) {
        drop(self.stop.take());

        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Redraw worker panicked");
            }
            debug!("Redraw worker stopped");
        }
    }
}

impl Drop for RedrawWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Formats a duration as `mm:ss`, minutes wrapping at the hour.
#[must_use]
pub fn format_clock(elapsed: Duration) -> String {
    let seconds = elapsed.as_secs();
    format!("{:02}:{:02}", (seconds / 60) % 60, seconds % 60)
}

/// Formats a duration as `mm:ss.f` with truncated tenths.
#[must_use]
pub fn format_clock_tenths(elapsed: Duration) -> String {
    format!("{}.{}", format_clock(elapsed), elapsed.subsec_millis() / 100)
}
