use std::cell::OnceCell;
use std::fmt;

use hdtq_index::{NativeTripleIterator, TripleId, TripleString};

use crate::cursor::{display_term, TripleCursor};
use crate::error::{HdtError, Result};

/// Windowed iterator over identifier triples.
///
/// Exclusively owns one native search cursor, released when the iterator is
/// dropped. The offset has already been applied to the native cursor when
/// the iterator is constructed.
pub struct TripleIdIterator<'a> {
    native: Box<dyn NativeTripleIterator + 'a>,
    pattern: TripleString,
    limit: usize,
    offset: usize,
    results_read: usize,
    accurate: OnceCell<usize>,
}

impl<'a> TripleIdIterator<'a> {
    pub(crate) fn new(
        native: Box<dyn NativeTripleIterator + 'a>,
        pattern: TripleString,
        limit: usize,
        offset: usize,
    ) -> Self {
        Self {
            native,
            pattern,
            limit,
            offset,
            results_read: 0,
            accurate: OnceCell::new(),
        }
    }

    pub fn subject(&self) -> &str {
        &self.pattern.subject
    }

    pub fn predicate(&self) -> &str {
        &self.pattern.predicate
    }

    pub fn object(&self) -> &str {
        &self.pattern.object
    }

    /// Same as [`TripleCursor::estimated_cardinality`].
    pub fn len(&self) -> usize {
        self.estimated_cardinality()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn limit_reached(&self) -> bool {
        self.limit != 0 && self.results_read >= self.limit
    }

    pub fn next_triple(&mut self) -> Result<TripleId> {
        if !self.has_next() {
            return Err(HdtError::Exhausted {
                results_read: self.results_read,
            });
        }
        let triple = self.native.next_triple().ok_or(HdtError::Exhausted {
            results_read: self.results_read,
        })?;
        self.results_read += 1;
        Ok(triple)
    }
}

impl TripleCursor for TripleIdIterator<'_> {
    type Item = TripleId;

    fn has_next(&self) -> bool {
        !self.limit_reached() && self.native.has_next()
    }

    fn next_result(&mut self) -> Result<TripleId> {
        self.next_triple()
    }

    fn estimated_cardinality(&self) -> usize {
        self.native.estimated_num_results()
    }

    fn accurate_cardinality(&self) -> usize {
        *self.accurate.get_or_init(|| self.native.count_exact())
    }

    fn pattern(&self) -> &TripleString {
        &self.pattern
    }

    fn limit(&self) -> usize {
        self.limit
    }

    fn offset(&self) -> usize {
        self.offset
    }

    fn results_read(&self) -> usize {
        self.results_read
    }
}

impl Iterator for TripleIdIterator<'_> {
    type Item = TripleId;

    fn next(&mut self) -> Option<TripleId> {
        self.next_triple().ok()
    }
}

impl fmt::Display for TripleIdIterator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<TripleIDIterator {} {} {}>",
            display_term(self.subject(), "?s"),
            display_term(self.predicate(), "?p"),
            display_term(self.object(), "?o")
        )
    }
}

impl Drop for TripleIdIterator<'_> {
    fn drop(&mut self) {
        tracing::trace!(
            results_read = self.results_read,
            "releasing native search cursor"
        );
    }
}
