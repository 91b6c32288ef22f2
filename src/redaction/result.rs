//! Outcome records of a redaction run.

use crate::domain::Term;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// What happened to one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageOutcome {
    pub page_index: usize,
    /// Resolved matches applied on this page.
    pub matches: usize,
    pub modified: bool,
}

/// Per-term statistics, in term-set order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermCount {
    pub term: Term,
    /// Resolved matches tagged with this term.
    pub matches: usize,
}

/// Summary of a completed redaction.
#[derive(Debug, Clone, PartialEq)]
pub struct RedactionResult {
    /// Where the redacted document was written.
    pub output_path: PathBuf,
    /// Resolved matches across all pages; merged regions count once.
    pub total_matches: usize,
    /// Indices of pages that received at least one redaction.
    pub pages_modified: BTreeSet<usize>,
    pub pages_total: usize,
    /// Terms that matched nowhere in the document, in term-set order.
    pub terms_not_found: Vec<Term>,
    pub matches_per_term: Vec<TermCount>,
    pub page_outcomes: Vec<PageOutcome>,
}

impl RedactionResult {
    /// Returns true if any redactions were applied.
    pub fn has_redactions(&self) -> bool {
        self.total_matches > 0
    }

    /// Match count for `term`, if it was part of the run.
    pub fn matches_for(&self, term: &str) -> Option<usize> {
        self.matches_per_term
            .iter()
            .find(|c| c.term.as_str() == term)
            .map(|c| c.matches)
    }
}

/// Terminal outcome of a run that may be cancelled.
#[derive(Debug, Clone, PartialEq)]
pub enum RedactionOutcome {
    Completed(RedactionResult),
    /// The run stopped at a page boundary; no output was written.
    Cancelled,
}

impl RedactionOutcome {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    pub fn completed(self) -> Option<RedactionResult> {
        match self {
            Self::Completed(result) => Some(result),
            Self::Cancelled => None,
        }
    }
}
