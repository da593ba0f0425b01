use hdtq_index::TripleString;

use crate::error::Result;

/// Pull contract shared by the identifier and string result iterators.
///
/// A cursor is forward-only and becomes terminal once its source is dry or
/// `limit` results have been delivered, whichever comes first.
pub trait TripleCursor {
    type Item;

    fn has_next(&self) -> bool;

    /// Pull one result; [`HdtError::Exhausted`](crate::HdtError::Exhausted)
    /// once `has_next` is false.
    fn next_result(&mut self) -> Result<Self::Item>;

    /// The index's cheap estimate of all matches of the pattern.
    fn estimated_cardinality(&self) -> usize;

    /// Exact number of matches of the pattern. May scan; never moves the
    /// cursor.
    fn accurate_cardinality(&self) -> usize;

    /// The term pattern the cursor was opened with.
    fn pattern(&self) -> &TripleString;

    /// `0` means unbounded.
    fn limit(&self) -> usize;

    fn offset(&self) -> usize;

    fn results_read(&self) -> usize;
}

/// Render a pattern slot, naming wildcards after their position.
pub(crate) fn display_term<'a>(term: &'a str, wildcard: &'a str) -> &'a str {
    if term.is_empty() {
        wildcard
    } else {
        term
    }
}
