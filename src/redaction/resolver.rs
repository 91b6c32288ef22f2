//! Merging of occurrences into non-overlapping redaction regions.

use super::locator::Occurrence;
use crate::domain::Rect;
use std::collections::BTreeSet;

/// A finalized region on one page, satisfying one or more terms.
///
/// Regions of the matches returned for one page never overlap each other.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMatch {
    pub page: usize,
    pub rects: Vec<Rect>,
    /// Indices of every glyph covered. Merged occurrences need not be
    /// contiguous in reading order.
    pub glyphs: BTreeSet<usize>,
    /// Indices of every term that contributed to this match.
    pub terms: BTreeSet<usize>,
}

impl ResolvedMatch {
    fn from_occurrence(occurrence: Occurrence) -> Self {
        Self {
            page: occurrence.page,
            rects: occurrence.rects,
            glyphs: occurrence.glyphs.collect(),
            terms: BTreeSet::from([occurrence.term]),
        }
    }

    fn overlaps(&self, other: &ResolvedMatch, tolerance: f32) -> bool {
        !self.glyphs.is_disjoint(&other.glyphs)
            || self
                .rects
                .iter()
                .any(|a| other.rects.iter().any(|b| a.intersects(b, tolerance)))
    }

    fn absorb(&mut self, other: ResolvedMatch) {
        self.glyphs.extend(other.glyphs);
        self.terms.extend(other.terms);
        for rect in other.rects {
            self.add_rect(rect);
        }
    }

    fn add_rect(&mut self, rect: Rect) {
        if self.rects.iter().any(|r| r.contains(&rect)) {
            return;
        }
        self.rects.retain(|r| !rect.contains(r));
        self.rects.push(rect);
    }

    /// Bounding rectangle of the whole match.
    pub fn bounds(&self) -> Option<Rect> {
        self.rects.iter().copied().reduce(|a, b| a.union(&b))
    }

    /// First covered glyph in reading order.
    pub fn first_glyph(&self) -> Option<usize> {
        self.glyphs.first().copied()
    }

    pub fn satisfies(&self, term: usize) -> bool {
        self.terms.contains(&term)
    }
}

/// Merges the occurrences of all terms on one page.
///
/// Occurrences are taken in reading order. Two occurrences that share glyphs
/// or whose rectangles overlap by more than `tolerance` points become one
/// match spanning both, tagged with both terms. No occurrences resolve to no
/// matches.
pub fn resolve(mut occurrences: Vec<Occurrence>, tolerance: f32) -> Vec<ResolvedMatch> {
    occurrences.sort_by_key(|o| (o.glyphs.start, o.glyphs.end, o.term));

    let mut resolved: Vec<ResolvedMatch> = Vec::with_capacity(occurrences.len());
    for occurrence in occurrences {
        let mut current = ResolvedMatch::from_occurrence(occurrence);
        // A merged region can grow into matches it did not touch before.
        while let Some(pos) = resolved.iter().position(|m| m.overlaps(&current, tolerance)) {
            let other = resolved.remove(pos);
            current.absorb(other);
        }
        resolved.push(current);
    }

    resolved.sort_by_key(|m| m.first_glyph());
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ops::Range;

    fn span(glyphs: Range<usize>) -> BTreeSet<usize> {
        glyphs.collect()
    }

    fn occurrence(term: usize, glyphs: Range<usize>) -> Occurrence {
        // One glyph is 6pt wide on a single line.
        let rect = Rect::new(
            glyphs.start as f32 * 6.0,
            0.0,
            glyphs.end as f32 * 6.0,
            12.0,
        );
        Occurrence {
            term,
            page: 1,
            rects: vec![rect],
            glyphs,
            text: String::new(),
        }
    }

    #[test]
    fn test_empty_input_resolves_to_nothing() {
        assert!(resolve(Vec::new(), 0.5).is_empty());
    }

    #[test]
    fn test_disjoint_occurrences_stay_separate_and_sorted() {
        let resolved = resolve(vec![occurrence(0, 10..16), occurrence(0, 0..6)], 0.5);
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].glyphs, span(0..6));
        assert_eq!(resolved[1].glyphs, span(10..16));
    }

    #[test]
    fn test_adjacent_occurrences_are_not_merged() {
        let resolved = resolve(vec![occurrence(0, 0..6), occurrence(0, 6..12)], 0.5);
        assert_eq!(resolved.len(), 2);
    }

    #[test]
    fn test_substring_term_merges_into_longer_term() {
        // "secretsecret" with terms "secret" (0) and "secretsecret" (1)
        let resolved = resolve(
            vec![
                occurrence(0, 0..6),
                occurrence(0, 6..12),
                occurrence(1, 0..12),
            ],
            0.5,
        );
        assert_eq!(resolved.len(), 1);
        let only = &resolved[0];
        assert_eq!(only.glyphs, span(0..12));
        assert_eq!(only.terms, BTreeSet::from([0, 1]));
        assert_eq!(only.rects, vec![Rect::new(0.0, 0.0, 72.0, 12.0)]);
        assert!(only.satisfies(0) && only.satisfies(1));
    }

    #[test]
    fn test_exact_duplicates_collapse() {
        let resolved = resolve(vec![occurrence(0, 3..8), occurrence(2, 3..8)], 0.5);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].terms, BTreeSet::from([0, 2]));
    }

    #[test]
    fn test_chain_of_overlaps_becomes_one_match() {
        let resolved = resolve(
            vec![occurrence(0, 0..4), occurrence(1, 3..8), occurrence(2, 7..12)],
            0.5,
        );
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].glyphs, span(0..12));
        assert_eq!(resolved[0].bounds(), Some(Rect::new(0.0, 0.0, 72.0, 12.0)));
    }

    #[test]
    fn test_geometric_overlap_without_shared_glyphs_merges() {
        let mut a = occurrence(0, 0..6);
        let mut b = occurrence(1, 20..26);
        a.rects = vec![Rect::new(0.0, 0.0, 40.0, 12.0)];
        b.rects = vec![Rect::new(30.0, 0.0, 70.0, 12.0)];
        let resolved = resolve(vec![a, b], 0.5);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].rects.len(), 2);
    }

    #[test]
    fn test_merge_does_not_swallow_text_between_duplicates() {
        // Line 0: "secret foo secret"; line 1 redraws the first "secret" in
        // place, as a fake-bold or overlaid text layer does.
        let first = occurrence(0, 0..6);
        let second = occurrence(0, 11..17);
        let mut redraw = occurrence(0, 17..23);
        redraw.rects = first.rects.clone();

        let resolved = resolve(vec![first, second, redraw], 0.5);

        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].glyphs, span(0..6).union(&span(17..23)).copied().collect());
        assert_eq!(resolved[0].rects, vec![Rect::new(0.0, 0.0, 36.0, 12.0)]);
        assert_eq!(resolved[1].glyphs, span(11..17));
        assert_eq!(resolved[1].rects, vec![Rect::new(66.0, 0.0, 102.0, 12.0)]);
    }

    #[test]
    fn test_resolved_regions_never_overlap() {
        let occurrences = (0..30)
            .map(|i| occurrence(i % 3, (i * 2)..(i * 2 + 3 + i % 4)))
            .collect();
        let resolved = resolve(occurrences, 0.5);
        for (i, a) in resolved.iter().enumerate() {
            for b in &resolved[i + 1..] {
                assert!(!a.overlaps(b, 0.5), "{:?} overlaps {:?}", a.glyphs, b.glyphs);
            }
        }
    }
}
