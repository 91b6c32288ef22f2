//! Page text search with glyph-accurate regions.
//!
//! The page's glyphs are folded into a comparison string once per page,
//! keeping for every folded character the glyph it came from. With
//! whitespace normalization every whitespace run and every break between
//! text lines becomes a single space; line breaks have no glyph of their
//! own. A term matches as a contiguous substring of that string and its
//! region is the union of the matched glyphs, one rectangle per text line.

use crate::domain::{MatchPolicy, Rect, Term, TextLayer};
use std::ops::Range;

/// One located instance of a term on one page.
#[derive(Debug, Clone, PartialEq)]
pub struct Occurrence {
    /// Index of the term in the run's term set.
    pub term: usize,
    pub page: usize,
    /// One bounding rectangle per text line the match touches.
    pub rects: Vec<Rect>,
    /// Glyph indices covered by the match, in reading order.
    pub glyphs: Range<usize>,
    /// Underlying text exactly as drawn on the page.
    pub text: String,
}

impl Occurrence {
    /// Bounding rectangle of the whole occurrence.
    pub fn bounds(&self) -> Option<Rect> {
        self.rects.iter().copied().reduce(|a, b| a.union(&b))
    }
}

/// Searches one page's text layer for terms.
pub struct PageTextLocator<'a> {
    layer: &'a TextLayer,
    page: usize,
    policy: MatchPolicy,
    haystack: Vec<char>,
    /// Glyph index each haystack character came from; `None` for synthetic
    /// line-break separators.
    origins: Vec<Option<usize>>,
}

impl<'a> PageTextLocator<'a> {
    pub fn new(layer: &'a TextLayer, page: usize, policy: MatchPolicy) -> Self {
        let mut locator = Self {
            layer,
            page,
            policy,
            haystack: Vec::with_capacity(layer.glyphs().len()),
            origins: Vec::with_capacity(layer.glyphs().len()),
        };
        locator.fold_layer();
        locator
    }

    fn fold_layer(&mut self) {
        let separator = if self.policy.normalize_whitespace { ' ' } else { '\n' };
        let mut previous_line = None;
        let mut folded = Vec::with_capacity(2);
        let layer = self.layer;

        for (index, glyph) in layer.glyphs().iter().enumerate() {
            if previous_line.is_some_and(|line| line != glyph.line) && !self.ends_with_space() {
                self.haystack.push(separator);
                self.origins.push(None);
            }
            previous_line = Some(glyph.line);

            if self.policy.normalize_whitespace && glyph.ch.is_whitespace() {
                if !self.ends_with_space() {
                    self.haystack.push(' ');
                    self.origins.push(Some(index));
                }
                continue;
            }

            folded.clear();
            self.policy.fold_char(glyph.ch, &mut folded);
            for &ch in &folded {
                self.haystack.push(ch);
                self.origins.push(Some(index));
            }
        }
    }

    fn ends_with_space(&self) -> bool {
        self.policy.normalize_whitespace && self.haystack.last() == Some(&' ')
    }

    /// Finds every non-overlapping occurrence of `term`, left to right in
    /// reading order. A term absent from the page yields an empty vector.
    pub fn find_occurrences(&self, term_id: usize, term: &Term) -> Vec<Occurrence> {
        let needle = self.policy.fold(term.as_str());
        let mut occurrences = Vec::new();
        if needle.is_empty() || needle.len() > self.haystack.len() {
            return occurrences;
        }

        let mut pos = 0;
        while pos + needle.len() <= self.haystack.len() {
            if self.haystack[pos..pos + needle.len()] == needle[..] {
                if let Some(occurrence) = self.occurrence_at(term_id, pos..pos + needle.len()) {
                    occurrences.push(occurrence);
                }
                pos += needle.len();
            } else {
                pos += 1;
            }
        }
        occurrences
    }

    fn occurrence_at(&self, term: usize, span: Range<usize>) -> Option<Occurrence> {
        let mut covered = self.origins[span].iter().flatten().copied();
        let first = covered.next()?;
        let last = covered.last().unwrap_or(first);
        let glyphs = &self.layer.glyphs()[first..=last];

        let mut rects: Vec<Rect> = Vec::new();
        let mut current_line = None;
        for glyph in glyphs {
            match rects.last_mut() {
                Some(rect) if current_line == Some(glyph.line) => *rect = rect.union(&glyph.rect),
                _ => rects.push(glyph.rect),
            }
            current_line = Some(glyph.line);
        }

        Some(Occurrence {
            term,
            page: self.page,
            rects,
            glyphs: first..last + 1,
            text: glyphs.iter().map(|g| g.ch).collect(),
        })
    }
}
