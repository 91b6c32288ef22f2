//! Permanent PDF text redaction.
//!
//! Given a document and a list of search terms, this library finds every
//! occurrence of every term on every page, removes the matched glyphs from
//! the page content and paints an opaque black box over each region. The
//! result is written to a new file; the input is never modified.
//!
//! # Features
//!
//! - **Content removal**: Matched text is erased from the page, not just covered
//! - **Verified erasure**: Every redacted page is re-read and checked for surviving glyphs
//! - **Overlap resolution**: Overlapping occurrences of different terms are painted once
//! - **Cancellable runs**: Progress per page, cancellation at page boundaries
//!
//! # Architecture
//!
//! - [`domain`]: Terms, matching policy, page geometry and text layers
//! - [`document`]: Document backends (MuPDF for PDF files, in-memory for tests)
//! - [`redaction`]: Locator, overlap resolver, content redactor, run state machine and service
//! - [`error`]: Error taxonomy
//!
//! # Quick Start
//!
//! ```no_run
//! use pdf_redactor::{parse_terms, RedactionService};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let terms = parse_terms("secret, confidential")?;
//! let result = RedactionService::new().redact_document(
//!     Path::new("input.pdf"),
//!     &terms,
//!     Path::new("output.pdf"),
//!     |event| println!("page {} of {}", event.page_index + 1, event.total_pages),
//! )?;
//!
//! println!("{} match(es) on {} page(s)", result.total_matches, result.pages_modified.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Examples
//!
//! ## Background Job With Cancellation
//!
//! ```no_run
//! use pdf_redactor::{parse_terms, RedactionJob, RedactionService};
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let job = RedactionJob::spawn(
//!     RedactionService::new(),
//!     PathBuf::from("input.pdf"),
//!     parse_terms("secret")?,
//!     PathBuf::from("output.pdf"),
//! );
//!
//! for event in job.progress() {
//!     if event.page_index >= 10 {
//!         job.cancel();
//!     }
//! }
//!
//! let outcome = job.join()?;
//! println!("cancelled: {}", outcome.is_cancelled());
//! # Ok(())
//! # }
//! ```
//!
//! ## Term Parsing
//!
//! ```
//! use pdf_redactor::parse_terms;
//!
//! let terms = parse_terms(" secret ,\nSecret,, confidential ").unwrap();
//! assert_eq!(terms.len(), 2);
//! ```

pub mod document;
pub mod domain;
pub mod error;
pub mod redaction;

pub use document::{MemoryDocument, MupdfDocument, RedactableDocument};
pub use domain::{parse_terms, MatchPolicy, Rect, Term, TermSet};
pub use error::{RedactorError, RedactorResult};
pub use redaction::{
    CancellationToken, ProgressEvent, RedactionJob, RedactionOutcome, RedactionResult,
    RedactionService, RunState,
};

use std::path::Path;

/// Redacts `terms` from the PDF at `input` into `output` with the default
/// matching policy.
pub fn redact_document(
    input: &Path,
    terms: &TermSet,
    output: &Path,
    on_progress: impl FnMut(ProgressEvent),
) -> RedactorResult<RedactionResult> {
    RedactionService::new().redact_document(input, terms, output, on_progress)
}

/// Extracts the text layer of a PDF, pages separated by form feeds.
pub fn extract_text_from_pdf(input: &Path) -> RedactorResult<String> {
    RedactionService::new().extract_text(input)
}
