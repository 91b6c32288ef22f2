//! Document container abstraction.
//!
//! The redaction engine never touches file formats directly. A document
//! backend supplies the page count, each page's text layer with geometry,
//! the page rewrite that erases glyphs and paints opaque boxes, and the
//! whole-document save.

pub mod memory;
pub mod pdf;

pub use self::memory::MemoryDocument;
pub use self::pdf::MupdfDocument;

use crate::domain::{Rect, TextLayer};
use crate::error::RedactorResult;
use std::path::Path;

/// A document that can be searched and permanently redacted page by page.
///
/// Implementations are owned by exactly one redaction run at a time.
pub trait RedactableDocument {
    /// Number of pages in the document.
    fn page_count(&self) -> RedactorResult<usize>;

    /// Extracts the text layer of page `page` in reading order.
    fn text_layer(&self, page: usize) -> RedactorResult<TextLayer>;

    /// Removes every glyph drawn inside `regions` from the page content and
    /// paints each region with an opaque black fill.
    fn erase_regions(&mut self, page: usize, regions: &[Rect]) -> RedactorResult<()>;

    /// Writes the whole document to `path`.
    fn save(&mut self, path: &Path) -> RedactorResult<()>;

    /// Short backend name used in logs.
    fn backend_name(&self) -> &str;
}

impl<D: RedactableDocument + ?Sized> RedactableDocument for Box<D> {
    fn page_count(&self) -> RedactorResult<usize> {
        (**self).page_count()
    }

    fn text_layer(&self, page: usize) -> RedactorResult<TextLayer> {
        (**self).text_layer(page)
    }

    fn erase_regions(&mut self, page: usize, regions: &[Rect]) -> RedactorResult<()> {
        (**self).erase_regions(page, regions)
    }

    fn save(&mut self, path: &Path) -> RedactorResult<()> {
        (**self).save(path)
    }

    fn backend_name(&self) -> &str {
        (**self).backend_name()
    }
}
