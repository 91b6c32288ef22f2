//! Extracted text of one page together with per-glyph geometry.

use super::geometry::Rect;
use serde::{Deserialize, Serialize};

/// One decoded character and the area it occupies on the page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Glyph {
    pub ch: char,
    pub rect: Rect,
    /// Index of the text line the glyph belongs to, in reading order.
    pub line: usize,
}

impl Glyph {
    pub fn new(ch: char, rect: Rect, line: usize) -> Self {
        Self { ch, rect, line }
    }

    /// Glyphs the backend could not map to a character.
    pub fn is_undecodable(&self) -> bool {
        self.ch == char::REPLACEMENT_CHARACTER
    }
}

/// Text layer of a page: glyphs in document reading order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextLayer {
    glyphs: Vec<Glyph>,
}

impl TextLayer {
    pub fn new(glyphs: Vec<Glyph>) -> Self {
        Self { glyphs }
    }

    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn undecodable_count(&self) -> usize {
        self.glyphs.iter().filter(|g| g.is_undecodable()).count()
    }

    /// Non-whitespace glyphs whose centre lies inside any of `regions`.
    pub fn glyphs_within<'a>(&'a self, regions: &'a [Rect]) -> impl Iterator<Item = &'a Glyph> {
        self.glyphs.iter().filter(move |g| {
            let (cx, cy) = g.rect.center();
            !g.ch.is_whitespace() && regions.iter().any(|r| r.contains_point(cx, cy))
        })
    }

    /// Plain text with one output line per text line.
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        let mut current_line = None;
        for glyph in &self.glyphs {
            if current_line.is_some_and(|line| line != glyph.line) {
                text.push('\n');
            }
            current_line = Some(glyph.line);
            text.push(glyph.ch);
        }
        text
    }
}
