//! Search terms and term-set construction.
//!
//! Raw input is free text where terms are separated by commas and/or line
//! breaks. Each candidate is trimmed, blank candidates are discarded, and
//! duplicates are dropped keeping the first-seen spelling and order.

use super::policy::MatchPolicy;
use crate::error::{RedactorError, RedactorResult};
use std::collections::HashSet;
use std::fmt;

/// A single search string, trimmed and guaranteed non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Term(String);

impl Term {
    /// Trims `raw`; returns `None` when nothing remains.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl AsRef<str> for Term {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Ordered, duplicate-free, non-empty collection of terms for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct TermSet {
    terms: Vec<Term>,
}

impl TermSet {
    /// Parses raw input with the default matching policy.
    pub fn parse(raw: &str) -> RedactorResult<Self> {
        Self::parse_with(raw, &MatchPolicy::default())
    }

    /// Parses raw input; duplicates are judged under `policy`.
    pub fn parse_with(raw: &str, policy: &MatchPolicy) -> RedactorResult<Self> {
        Self::from_candidates(split_candidates(raw), policy)
    }

    /// Builds a set from several raw inputs (e.g. repeated CLI values),
    /// each split with the same separator rules.
    pub fn from_inputs<I, S>(inputs: I, policy: &MatchPolicy) -> RedactorResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let raw: Vec<String> = inputs.into_iter().map(|s| s.as_ref().to_string()).collect();
        Self::from_candidates(raw.iter().flat_map(|r| split_candidates(r)), policy)
    }

    fn from_candidates<'a, I>(candidates: I, policy: &MatchPolicy) -> RedactorResult<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut seen = HashSet::new();
        let mut terms = Vec::new();
        for candidate in candidates {
            let Some(term) = Term::new(candidate) else {
                continue;
            };
            if seen.insert(policy.fold(term.as_str())) {
                terms.push(term);
            }
        }

        if terms.is_empty() {
            return Err(RedactorError::invalid_input(
                "terms",
                "No usable redaction terms after parsing",
            ));
        }
        Ok(Self { terms })
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn get(&self, id: usize) -> Option<&Term> {
        self.terms.get(id)
    }

    /// Terms paired with their index, in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Term)> {
        self.terms.iter().enumerate()
    }

    pub fn as_slice(&self) -> &[Term] {
        &self.terms
    }
}

/// Parses raw multi-term input into a [`TermSet`] using the default policy.
pub fn parse_terms(raw: &str) -> RedactorResult<TermSet> {
    TermSet::parse(raw)
}

fn split_candidates(raw: &str) -> impl Iterator<Item = &str> {
    raw.lines().flat_map(|line| line.split(','))
}
