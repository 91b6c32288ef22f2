//! Irreversible removal of matched text from page content.
//!
//! Painting a box over text is not a redaction: the glyphs stay in the
//! content stream and can be copied or extracted. Every region is therefore
//! erased and filled by the document backend, and the page's text layer is
//! extracted again afterwards. A page where any glyph still sits inside a
//! redacted region fails with `UnsupportedPageContent`.

use super::resolver::ResolvedMatch;
use crate::document::RedactableDocument;
use crate::domain::Rect;
use crate::error::{RedactorError, RedactorResult};
use tracing::{debug, warn};

/// Applies resolved matches to a page.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentRedactor;

impl ContentRedactor {
    pub fn new() -> Self {
        Self
    }

    /// Erases and fills every match region on `page`.
    ///
    /// Returns `true` iff at least one match was applied.
    pub fn apply<D>(&self, document: &mut D, page: usize, matches: &[ResolvedMatch]) -> RedactorResult<bool>
    where
        D: RedactableDocument + ?Sized,
    {
        if matches.is_empty() {
            return Ok(false);
        }

        let regions = regions_of(matches);
        document.erase_regions(page, &regions)?;

        let residue = document.text_layer(page)?;
        let survivors: String = residue.glyphs_within(&regions).map(|g| g.ch).collect();
        if !survivors.is_empty() {
            warn!(
                page,
                backend = document.backend_name(),
                survivors = survivors.chars().count(),
                "text survived redaction"
            );
            return Err(RedactorError::unsupported_page(
                page,
                format!(
                    "{} glyph(s) remain inside redacted regions after rewriting",
                    survivors.chars().count()
                ),
            ));
        }

        debug!(page, regions = regions.len(), "page content rewritten");
        Ok(true)
    }
}

/// Every rectangle to erase and paint, in match order.
pub fn regions_of(matches: &[ResolvedMatch]) -> Vec<Rect> {
    matches
        .iter()
        .flat_map(|m| m.rects.iter().copied())
        .filter(|r| !r.is_empty())
        .collect()
}
