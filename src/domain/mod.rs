//! Domain models: search terms, matching policy and page geometry.
//!
//! Everything here is pure data and has no document I/O.

pub mod geometry;
pub mod policy;
pub mod terms;
pub mod text_layer;

pub use geometry::Rect;
pub use policy::MatchPolicy;
pub use terms::{parse_terms, Term, TermSet};
pub use text_layer::{Glyph, TextLayer};
