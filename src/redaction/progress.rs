//! Progress reporting and cooperative cancellation.
//!
//! Progress leaves the worker as [`ProgressEvent`] values. A caller that
//! drives a user interface receives them through a channel
//! ([`progress_channel`]) and applies them on its own thread; the worker never
//! touches presentation state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

/// Emitted once per page, after the page has been processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressEvent {
    /// 0-based index of the page just processed.
    pub page_index: usize,
    pub total_pages: usize,
}

impl ProgressEvent {
    pub fn is_last(&self) -> bool {
        self.page_index + 1 == self.total_pages
    }

    /// Completed fraction in `0.0..=1.0`.
    pub fn fraction(&self) -> f32 {
        if self.total_pages == 0 {
            return 1.0;
        }
        (self.page_index + 1) as f32 / self.total_pages as f32
    }
}

/// Forwards events over a channel to whichever thread owns presentation.
#[derive(Debug, Clone)]
pub struct ChannelProgress {
    sender: Sender<ProgressEvent>,
}

impl ChannelProgress {
    pub fn report(&self, event: ProgressEvent) {
        // A dropped receiver means the caller stopped listening.
        let _ = self.sender.send(event);
    }
}

/// Creates a channel-backed progress sink and its receiving end.
pub fn progress_channel() -> (ChannelProgress, Receiver<ProgressEvent>) {
    let (sender, receiver) = mpsc::channel();
    (ChannelProgress { sender }, receiver)
}

/// Shared cancellation flag, checked by a run between pages only.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation; the run stops at the next page boundary.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
