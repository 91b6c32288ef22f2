//! In-memory document with a fixed monospace layout.
//!
//! Each page is built from plain text: line `n` sits `LINE_PITCH` points
//! below line `n - 1` and every character occupies a `GLYPH_WIDTH` by
//! `GLYPH_HEIGHT` cell. Erasing a region drops every glyph whose centre
//! falls inside it and records the painted fill. Saving writes the pages as
//! JSON, which [`MemoryDocument::open`] reads back.

use super::RedactableDocument;
use crate::domain::{Glyph, Rect, TextLayer};
use crate::error::{RedactorError, RedactorResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

pub const GLYPH_WIDTH: f32 = 6.0;
pub const GLYPH_HEIGHT: f32 = 12.0;
pub const LINE_PITCH: f32 = 14.0;
pub const MARGIN: f32 = 72.0;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct MemoryPage {
    glyphs: Vec<Glyph>,
    #[serde(default)]
    fills: Vec<Rect>,
}

/// On-disk form of a [`MemoryDocument`].
#[derive(Serialize, Deserialize)]
struct SavedDocument {
    pages: Vec<MemoryPage>,
}

/// Document held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    pages: Vec<MemoryPage>,
    /// Pages whose glyphs survive erasure, simulating content that cannot be
    /// rewritten.
    locked_pages: BTreeSet<usize>,
}

impl MemoryDocument {
    /// Lays out one page per entry; `\n` starts a new text line.
    pub fn from_pages<S: AsRef<str>>(pages: &[S]) -> Self {
        let pages = pages
            .iter()
            .map(|text| MemoryPage {
                glyphs: layout(text.as_ref()),
                fills: Vec::new(),
            })
            .collect();
        Self {
            pages,
            locked_pages: BTreeSet::new(),
        }
    }

    /// Makes erasure on `page` a no-op so its text survives rewriting.
    pub fn with_locked_page(mut self, page: usize) -> Self {
        self.locked_pages.insert(page);
        self
    }

    /// Opaque fills painted on `page` so far.
    pub fn fills(&self, page: usize) -> &[Rect] {
        self.pages
            .get(page)
            .map(|p| p.fills.as_slice())
            .unwrap_or(&[])
    }

    /// Reads a document previously written by [`RedactableDocument::save`].
    pub fn open(path: &Path) -> RedactorResult<Self> {
        let unreadable = |reason: String| RedactorError::UnreadableDocument {
            path: path.to_path_buf(),
            reason,
        };

        let file = File::open(path).map_err(|e| unreadable(e.to_string()))?;
        let saved: SavedDocument = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| unreadable(format!("Invalid document: {}", e)))?;

        Ok(Self {
            pages: saved.pages,
            locked_pages: BTreeSet::new(),
        })
    }

    fn page(&self, page: usize) -> RedactorResult<&MemoryPage> {
        self.pages
            .get(page)
            .ok_or_else(|| RedactorError::unsupported_page(page, "No such page"))
    }
}

impl RedactableDocument for MemoryDocument {
    fn page_count(&self) -> RedactorResult<usize> {
        Ok(self.pages.len())
    }

    fn text_layer(&self, page: usize) -> RedactorResult<TextLayer> {
        Ok(TextLayer::new(self.page(page)?.glyphs.clone()))
    }

    fn erase_regions(&mut self, page: usize, regions: &[Rect]) -> RedactorResult<()> {
        let locked = self.locked_pages.contains(&page);
        let target = self
            .pages
            .get_mut(page)
            .ok_or_else(|| RedactorError::unsupported_page(page, "No such page"))?;

        if !locked {
            target.glyphs.retain(|g| {
                let (cx, cy) = g.rect.center();
                !regions.iter().any(|r| r.contains_point(cx, cy))
            });
        }
        target.fills.extend_from_slice(regions);
        Ok(())
    }

    fn save(&mut self, path: &Path) -> RedactorResult<()> {
        let write_error = |reason: &str, source: Box<dyn std::error::Error + Send + Sync>| {
            RedactorError::OutputWrite {
                path: path.to_path_buf(),
                reason: reason.to_string(),
                source: Some(source),
            }
        };

        let file = File::create(path).map_err(|e| write_error("Failed to create file", Box::new(e)))?;
        let saved = SavedDocument {
            pages: self.pages.clone(),
        };
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, &saved)
            .map_err(|e| write_error("Failed to write document", Box::new(e)))?;
        writer
            .flush()
            .map_err(|e| write_error("Failed to write document", Box::new(e)))
    }

    fn backend_name(&self) -> &str {
        "memory"
    }
}

fn layout(text: &str) -> Vec<Glyph> {
    let mut glyphs = Vec::new();
    for (line, content) in text.lines().enumerate() {
        let y = MARGIN + line as f32 * LINE_PITCH;
        for (column, ch) in content.chars().enumerate() {
            let x = MARGIN + column as f32 * GLYPH_WIDTH;
            glyphs.push(Glyph::new(
                ch,
                Rect::new(x, y, x + GLYPH_WIDTH, y + GLYPH_HEIGHT),
                line,
            ));
        }
    }
    glyphs
}
