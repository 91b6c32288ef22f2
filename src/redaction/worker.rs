//! Background execution of a single redaction run.
//!
//! The run executes on its own thread so that the caller's thread stays free
//! to drive a user interface. Progress is delivered through a channel and
//! must be drained by the caller; cancellation is cooperative and observed
//! at page boundaries.

use super::progress::{progress_channel, CancellationToken, ProgressEvent};
use super::result::RedactionOutcome;
use super::RedactionService;
use crate::domain::TermSet;
use crate::error::RedactorResult;
use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::thread::{self, JoinHandle};

/// Handle to a redaction running on a worker thread.
pub struct RedactionJob {
    progress: Receiver<ProgressEvent>,
    cancel: CancellationToken,
    handle: JoinHandle<RedactorResult<RedactionOutcome>>,
}

impl RedactionJob {
    /// Starts redacting `input` into `output` on a new thread.
    pub fn spawn(service: RedactionService, input: PathBuf, terms: TermSet, output: PathBuf) -> Self {
        let (sink, progress) = progress_channel();
        let cancel = CancellationToken::new();
        let worker_cancel = cancel.clone();

        let handle = thread::spawn(move || {
            service.redact_document_cancellable(
                &input,
                &terms,
                &output,
                |event| sink.report(event),
                &worker_cancel,
            )
        });

        Self {
            progress,
            cancel,
            handle,
        }
    }

    /// Progress events, one per processed page. The channel closes when the
    /// run ends.
    pub fn progress(&self) -> &Receiver<ProgressEvent> {
        &self.progress
    }

    /// Requests cancellation at the next page boundary.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Waits for the run to end and returns its outcome.
    ///
    /// A panic on the worker thread is resumed on the caller's thread.
    pub fn join(self) -> RedactorResult<RedactionOutcome> {
        match self.handle.join() {
            Ok(outcome) => outcome,
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }
}
