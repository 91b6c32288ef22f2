//! System-wide matching policy.

/// How terms are compared against page text.
///
/// The policy is fixed for a whole run and applies to every term; it also
/// decides which input terms count as duplicates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchPolicy {
    /// Compare characters exactly instead of after lower-casing.
    pub case_sensitive: bool,
    /// Collapse whitespace runs and line breaks into a single space.
    pub normalize_whitespace: bool,
    /// Minimum overlap, in points along both axes, for two matched regions
    /// to be merged.
    pub merge_tolerance: f32,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            normalize_whitespace: true,
            merge_tolerance: 0.5,
        }
    }
}

impl MatchPolicy {
    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn with_normalize_whitespace(mut self, normalize: bool) -> Self {
        self.normalize_whitespace = normalize;
        self
    }

    pub fn with_merge_tolerance(mut self, tolerance: f32) -> Self {
        self.merge_tolerance = tolerance.max(0.0);
        self
    }

    /// Folds one character into the comparison alphabet.
    pub(crate) fn fold_char(&self, ch: char, out: &mut Vec<char>) {
        if self.case_sensitive {
            out.push(ch);
        } else {
            out.extend(ch.to_lowercase());
        }
    }

    /// Folds a whole string; used for needles and de-duplication keys.
    pub(crate) fn fold(&self, text: &str) -> Vec<char> {
        let mut out = Vec::with_capacity(text.len());
        let mut in_space = false;
        for ch in text.chars() {
            if self.normalize_whitespace && ch.is_whitespace() {
                if !in_space {
                    out.push(' ');
                }
                in_space = true;
                continue;
            }
            in_space = false;
            self.fold_char(ch, &mut out);
        }
        out
    }
}
