//! PDF backend using MuPDF.
//!
//! Text layers come from MuPDF's structured-text device, one glyph per
//! character with its quad. Erasing a region creates a PDF redaction
//! annotation covering it and applies the page's redactions, which removes
//! the glyphs from the content stream and paints a black box in their place.
//! Saving collects garbage so that content streams replaced by redaction
//! do not survive as unreferenced objects in the output file.

use super::RedactableDocument;
use crate::domain::{Glyph, Rect, TextLayer};
use crate::error::{RedactorError, RedactorResult};
use std::path::{Path, PathBuf};

use mupdf::pdf::{PdfAnnotationType, PdfDocument, PdfPage, PdfWriteOptions};
use mupdf::{Page, Quad, TextPageFlags};

/// Drops every object no longer referenced after redaction, so replaced
/// content streams are not written to the output.
const GARBAGE_LEVEL: i32 = 1;

/// A PDF file opened read-only through MuPDF.
///
/// Modifications stay in memory until [`RedactableDocument::save`] writes a
/// new file; the source file is never written.
pub struct MupdfDocument {
    inner: PdfDocument,
    path: PathBuf,
}

impl MupdfDocument {
    /// Opens and parses the PDF at `path`.
    pub fn open(path: &Path) -> RedactorResult<Self> {
        if !path.exists() {
            return Err(unreadable(path, "Input file does not exist"));
        }

        let path_str = path
            .to_str()
            .ok_or_else(|| unreadable(path, "Path contains invalid UTF-8"))?;

        let inner = PdfDocument::open(path_str)
            .map_err(|e| unreadable(path, format!("Failed to open PDF with MuPDF: {}", e)))?;

        let encrypted = inner
            .needs_password()
            .map_err(|e| unreadable(path, format!("Failed to check encryption: {}", e)))?;
        if encrypted {
            return Err(unreadable(path, "Document is encrypted"));
        }

        Ok(Self {
            inner,
            path: path.to_path_buf(),
        })
    }

    /// Path the document was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_page(&self, page: usize) -> RedactorResult<Page> {
        let index = i32::try_from(page)
            .map_err(|_| RedactorError::unsupported_page(page, "Page index out of range"))?;

        self.inner.load_page(index).map_err(|e| {
            RedactorError::unsupported_page(page, format!("Failed to load page: {}", e))
        })
    }
}

impl RedactableDocument for MupdfDocument {
    fn page_count(&self) -> RedactorResult<usize> {
        let count = self
            .inner
            .page_count()
            .map_err(|e| unreadable(&self.path, format!("Failed to get page count: {}", e)))?;

        usize::try_from(count)
            .map_err(|_| unreadable(&self.path, format!("Invalid page count {}", count)))
    }

    fn text_layer(&self, page: usize) -> RedactorResult<TextLayer> {
        let loaded = self.load_page(page)?;
        let text_page = loaded.to_text_page(TextPageFlags::empty()).map_err(|e| {
            RedactorError::unsupported_page(page, format!("Failed to extract text layer: {}", e))
        })?;

        let mut glyphs = Vec::new();
        let mut line_index = 0;
        for block in text_page.blocks() {
            for line in block.lines() {
                let before = glyphs.len();
                for text_char in line.chars() {
                    let ch = text_char.char().unwrap_or(char::REPLACEMENT_CHARACTER);
                    glyphs.push(Glyph::new(ch, quad_bounds(&text_char.quad()), line_index));
                }
                if glyphs.len() > before {
                    line_index += 1;
                }
            }
        }

        Ok(TextLayer::new(glyphs))
    }

    fn erase_regions(&mut self, page: usize, regions: &[Rect]) -> RedactorResult<()> {
        if regions.is_empty() {
            return Ok(());
        }

        let loaded = self.load_page(page)?;
        let mut pdf_page = PdfPage::try_from(loaded)
            .map_err(|_| RedactorError::unsupported_page(page, "Page is not a PDF page"))?;

        for region in regions {
            let annot = pdf_page
                .create_annotation(PdfAnnotationType::Redact)
                .map_err(|e| {
                    RedactorError::unsupported_page(
                        page,
                        format!("Failed to create redaction annotation: {}", e),
                    )
                })?;

            // SAFETY: `annot` was just created on a live page of a live document.
            if !unsafe { ffi::set_redaction_area(&annot, region) } {
                return Err(RedactorError::unsupported_page(
                    page,
                    "Cannot size redaction annotation: no MuPDF context",
                ));
            }
        }

        pdf_page.redact().map_err(|e| {
            RedactorError::unsupported_page(page, format!("Failed to apply redactions: {}", e))
        })?;

        Ok(())
    }

    fn save(&mut self, path: &Path) -> RedactorResult<()> {
        let path_str = path.to_str().ok_or_else(|| RedactorError::OutputWrite {
            path: path.to_path_buf(),
            reason: "Path contains invalid UTF-8".to_string(),
            source: None,
        })?;

        let mut options = PdfWriteOptions::default();
        options.set_garbage_level(GARBAGE_LEVEL);

        self.inner
            .save_with_options(path_str, options)
            .map_err(|e| RedactorError::OutputWrite {
                path: path.to_path_buf(),
                reason: "Failed to save redacted PDF".to_string(),
                source: Some(Box::new(e)),
            })
    }

    fn backend_name(&self) -> &str {
        "MuPDF"
    }
}

fn unreadable(path: &Path, reason: impl Into<String>) -> RedactorError {
    RedactorError::UnreadableDocument {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

/// Bounding rectangle of a (possibly rotated) glyph quad.
fn quad_bounds(quad: &Quad) -> Rect {
    Rect {
        x0: quad.ul.x.min(quad.ll.x).min(quad.ur.x).min(quad.lr.x),
        y0: quad.ul.y.min(quad.ll.y).min(quad.ur.y).min(quad.lr.y),
        x1: quad.ul.x.max(quad.ll.x).max(quad.ur.x).max(quad.lr.x),
        y1: quad.ul.y.max(quad.ll.y).max(quad.ur.y).max(quad.lr.y),
    }
}

/// Raw MuPDF calls the safe bindings do not cover.
mod ffi {
    use crate::domain::Rect;
    use mupdf::pdf::PdfAnnotation;

    /// Layout of `PdfAnnotation`: a single pointer to the native annotation.
    #[repr(C)]
    struct RawAnnotation {
        inner: *mut mupdf_sys::pdf_annot,
    }

    /// Sets the area a redaction annotation erases. New annotations are
    /// created with an empty rectangle, so this must run before the page's
    /// redactions are applied. Returns false if no MuPDF context could be
    /// created, in which case the annotation is left untouched.
    ///
    /// # Safety
    /// `annot` must belong to a page that is still loaded.
    pub(super) unsafe fn set_redaction_area(annot: &PdfAnnotation, region: &Rect) -> bool {
        let raw = std::mem::transmute::<&PdfAnnotation, &RawAnnotation>(annot);
        let ctx = mupdf_sys::mupdf_new_base_context();
        if ctx.is_null() {
            return false;
        }

        let area = mupdf_sys::fz_rect {
            x0: region.x0,
            y0: region.y0,
            x1: region.x1,
            y1: region.y1,
        };
        mupdf_sys::pdf_set_annot_rect(ctx, raw.inner, area);
        mupdf_sys::mupdf_drop_base_context(ctx);
        true
    }
}
