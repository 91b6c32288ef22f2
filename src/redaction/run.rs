//! Per-page state machine for one redaction run.
//!
//! `Ready -> Running -> {Completed | Cancelled | Failed}`. The run owns the
//! document for its whole lifetime, processes pages strictly in order and
//! writes the output exactly once, when the last page has been processed.

use super::content::ContentRedactor;
use super::locator::PageTextLocator;
use super::resolver::resolve;
use super::result::{PageOutcome, RedactionResult, TermCount};
use crate::document::RedactableDocument;
use crate::domain::{MatchPolicy, TermSet};
use crate::error::{RedactorError, RedactorResult};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, info, warn};

/// Lifecycle state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Ready,
    Running,
    Completed,
    Cancelled,
    Failed,
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Failed)
    }
}

/// One redaction run over one document.
pub struct RedactionRun<'t, D: RedactableDocument> {
    document: D,
    terms: &'t TermSet,
    policy: MatchPolicy,
    redactor: ContentRedactor,
    state: RunState,
    page_count: usize,
    next_page: usize,
    outcomes: Vec<PageOutcome>,
    term_matches: Vec<usize>,
}

impl<'t, D: RedactableDocument> RedactionRun<'t, D> {
    /// Prepares a run; fails if the document's page count cannot be read.
    pub fn new(document: D, terms: &'t TermSet, policy: MatchPolicy) -> RedactorResult<Self> {
        let page_count = document.page_count()?;
        Ok(Self {
            document,
            terms,
            policy,
            redactor: ContentRedactor::new(),
            state: RunState::Ready,
            page_count,
            next_page: 0,
            outcomes: Vec::with_capacity(page_count),
            term_matches: vec![0; terms.len()],
        })
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Pages processed so far.
    pub fn outcomes(&self) -> &[PageOutcome] {
        &self.outcomes
    }

    /// Processes the next page. Returns `None` once every page is done.
    ///
    /// Any error moves the run to `Failed`.
    pub fn process_next_page(&mut self) -> RedactorResult<Option<PageOutcome>> {
        match self.state {
            RunState::Ready => self.state = RunState::Running,
            RunState::Running => {}
            terminal => {
                return Err(RedactorError::invalid_input(
                    "run",
                    format!("Run is already {:?}", terminal),
                ))
            }
        }

        if self.next_page >= self.page_count {
            return Ok(None);
        }

        let page = self.next_page;
        match self.redact_page(page) {
            Ok(outcome) => {
                self.next_page += 1;
                self.outcomes.push(outcome);
                Ok(Some(outcome))
            }
            Err(err) => {
                warn!(page, error = %err, "page failed, aborting run");
                self.state = RunState::Failed;
                Err(err)
            }
        }
    }

    fn redact_page(&mut self, page: usize) -> RedactorResult<PageOutcome> {
        let layer = self.document.text_layer(page)?;
        let undecodable = layer.undecodable_count();
        if undecodable > 0 {
            warn!(page, undecodable, "page has glyphs without a text mapping; they cannot be matched");
        }

        let locator = PageTextLocator::new(&layer, page, self.policy);
        let occurrences = self
            .terms
            .iter()
            .flat_map(|(id, term)| locator.find_occurrences(id, term))
            .collect();
        let matches = resolve(occurrences, self.policy.merge_tolerance);

        let modified = self.redactor.apply(&mut self.document, page, &matches)?;

        for resolved in &matches {
            for &term in &resolved.terms {
                self.term_matches[term] += 1;
            }
        }

        debug!(page, matches = matches.len(), modified, "page processed");
        Ok(PageOutcome {
            page_index: page,
            matches: matches.len(),
            modified,
        })
    }

    /// Stops the run at the current page boundary, discarding statistics.
    pub fn cancel(mut self) -> RunState {
        if !self.state.is_terminal() {
            self.state = RunState::Cancelled;
        }
        info!(pages_processed = self.outcomes.len(), "redaction cancelled");
        self.state
    }

    /// Writes the output and returns the final result.
    ///
    /// The document is saved to a temporary file next to `output` and moved
    /// into place, so a failure never leaves a partial file behind.
    pub fn finish(mut self, output: &Path) -> RedactorResult<RedactionResult> {
        if self.state == RunState::Ready && self.page_count == 0 {
            self.state = RunState::Running;
        }
        if self.state != RunState::Running || self.next_page < self.page_count {
            return Err(RedactorError::invalid_input(
                "run",
                format!(
                    "Cannot finish a {:?} run after {} of {} pages",
                    self.state, self.next_page, self.page_count
                ),
            ));
        }

        if let Err(err) = write_atomically(&mut self.document, output) {
            self.state = RunState::Failed;
            return Err(err);
        }
        self.state = RunState::Completed;

        let matches_per_term: Vec<TermCount> = self
            .terms
            .iter()
            .map(|(id, term)| TermCount {
                term: term.clone(),
                matches: self.term_matches[id],
            })
            .collect();
        let terms_not_found: Vec<_> = matches_per_term
            .iter()
            .filter(|c| c.matches == 0)
            .map(|c| c.term.clone())
            .collect();
        let pages_modified: BTreeSet<usize> = self
            .outcomes
            .iter()
            .filter(|o| o.modified)
            .map(|o| o.page_index)
            .collect();

        let result = RedactionResult {
            output_path: output.to_path_buf(),
            total_matches: self.outcomes.iter().map(|o| o.matches).sum(),
            pages_modified,
            pages_total: self.page_count,
            terms_not_found,
            matches_per_term,
            page_outcomes: self.outcomes,
        };

        if !result.terms_not_found.is_empty() {
            let missing: Vec<&str> = result.terms_not_found.iter().map(|t| t.as_str()).collect();
            warn!(terms = ?missing, "terms with no matches");
        }
        info!(
            output = %output.display(),
            total_matches = result.total_matches,
            pages_modified = result.pages_modified.len(),
            "saved redacted document"
        );
        Ok(result)
    }
}

fn write_atomically<D: RedactableDocument>(document: &mut D, output: &Path) -> RedactorResult<()> {
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut builder = tempfile::Builder::new();
    builder.prefix(".redacting-").suffix(".tmp");
    // Staging files default to owner-only; the output follows the umask.
    #[cfg(unix)]
    builder.permissions(std::os::unix::fs::PermissionsExt::from_mode(0o666));
    let staging = builder
        .tempfile_in(dir)
        .map_err(|e| output_error(output, "Cannot create temporary file", e))?;

    document.save(staging.path())?;

    staging
        .persist(output)
        .map_err(|e| output_error(output, "Cannot move output into place", e.error))?;
    Ok(())
}

fn output_error(output: &Path, reason: &str, source: std::io::Error) -> RedactorError {
    RedactorError::OutputWrite {
        path: output.to_path_buf(),
        reason: reason.to_string(),
        source: Some(Box::new(source)),
    }
}
