//! Redaction engine and service layer.
//!
//! A run goes page by page: the [`locator`] finds every term on the page,
//! the [`resolver`] merges overlapping occurrences, the [`content`] redactor
//! erases and paints the resulting regions, and the [`run`] state machine
//! aggregates statistics and writes the output once all pages are done.

pub mod content;
pub mod locator;
pub mod progress;
pub mod resolver;
pub mod result;
pub mod run;
pub mod worker;

pub use content::ContentRedactor;
pub use locator::{Occurrence, PageTextLocator};
pub use progress::{progress_channel, CancellationToken, ChannelProgress, ProgressEvent};
pub use resolver::{resolve, ResolvedMatch};
pub use result::{PageOutcome, RedactionOutcome, RedactionResult, TermCount};
pub use run::{RedactionRun, RunState};
pub use worker::RedactionJob;

use crate::document::{MupdfDocument, RedactableDocument};
use crate::domain::{MatchPolicy, TermSet};
use crate::error::{RedactorError, RedactorResult};
use std::path::Path;
use tracing::info;

/// Redaction service coordinating document runs.
///
/// Holds the system-wide [`MatchPolicy`]; every run started from the same
/// service matches terms the same way.
#[derive(Debug, Clone, Default)]
pub struct RedactionService {
    policy: MatchPolicy,
}

impl RedactionService {
    /// Creates a service with the default matching policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a service with a custom matching policy.
    pub fn with_policy(policy: MatchPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &MatchPolicy {
        &self.policy
    }

    /// Parses raw term input, de-duplicating under this service's policy.
    pub fn parse_terms(&self, raw: &str) -> RedactorResult<TermSet> {
        TermSet::parse_with(raw, &self.policy)
    }

    /// Redacts every term from the PDF at `input` into a new file at `output`.
    ///
    /// `input` is opened read-only and never modified. `on_progress` is
    /// called once per page, in order.
    pub fn redact_document(
        &self,
        input: &Path,
        terms: &TermSet,
        output: &Path,
        on_progress: impl FnMut(ProgressEvent),
    ) -> RedactorResult<RedactionResult> {
        let never = CancellationToken::new();
        match self.redact_document_cancellable(input, terms, output, on_progress, &never)? {
            RedactionOutcome::Completed(result) => Ok(result),
            RedactionOutcome::Cancelled => Err(RedactorError::Cancelled),
        }
    }

    /// Like [`redact_document`](Self::redact_document), stopping at the next
    /// page boundary once `cancel` is triggered.
    pub fn redact_document_cancellable(
        &self,
        input: &Path,
        terms: &TermSet,
        output: &Path,
        mut on_progress: impl FnMut(ProgressEvent),
        cancel: &CancellationToken,
    ) -> RedactorResult<RedactionOutcome> {
        ensure_distinct_paths(input, output)?;
        let document = MupdfDocument::open(input)?;
        info!(input = %input.display(), terms = terms.len(), "opened document");
        self.redact(document, terms, output, &mut on_progress, cancel)
    }

    /// Runs the redaction over an already opened document.
    pub fn redact<D: RedactableDocument>(
        &self,
        document: D,
        terms: &TermSet,
        output: &Path,
        on_progress: &mut dyn FnMut(ProgressEvent),
        cancel: &CancellationToken,
    ) -> RedactorResult<RedactionOutcome> {
        let backend = document.backend_name().to_string();
        let mut run = RedactionRun::new(document, terms, self.policy)?;
        let total_pages = run.page_count();
        info!(backend = %backend, pages = total_pages, terms = terms.len(), "starting redaction");

        loop {
            if cancel.is_cancelled() {
                run.cancel();
                return Ok(RedactionOutcome::Cancelled);
            }
            match run.process_next_page()? {
                Some(outcome) => on_progress(ProgressEvent {
                    page_index: outcome.page_index,
                    total_pages,
                }),
                None => break,
            }
        }

        run.finish(output).map(RedactionOutcome::Completed)
    }

    /// Extracts the text layer of every page, pages separated by form feeds.
    pub fn extract_text(&self, input: &Path) -> RedactorResult<String> {
        let document = MupdfDocument::open(input)?;
        let pages = (0..document.page_count()?)
            .map(|page| document.text_layer(page).map(|layer| layer.to_text()))
            .collect::<RedactorResult<Vec<_>>>()?;
        Ok(pages.join("\n\x0c"))
    }
}

fn ensure_distinct_paths(input: &Path, output: &Path) -> RedactorResult<()> {
    let same = match (input.canonicalize(), output.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => input == output,
    };
    if same {
        return Err(RedactorError::invalid_input(
            "output",
            "Output path must differ from the input document",
        ));
    }
    Ok(())
}
