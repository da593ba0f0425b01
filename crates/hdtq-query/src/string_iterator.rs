use std::fmt;

use hdtq_index::TripleString;

use crate::cursor::{display_term, TripleCursor};
use crate::dictionary::DictionaryAdapter;
use crate::error::Result;
use crate::id_iterator::TripleIdIterator;

/// Windowed iterator over string triples.
///
/// Pulls identifier triples from an inner [`TripleIdIterator`] and resolves
/// each one through the dictionary only when it is read.
pub struct TripleIterator<'a> {
    ids: TripleIdIterator<'a>,
    dictionary: DictionaryAdapter<'a>,
}

impl<'a> TripleIterator<'a> {
    pub(crate) fn new(ids: TripleIdIterator<'a>, dictionary: DictionaryAdapter<'a>) -> Self {
        Self { ids, dictionary }
    }

    pub fn subject(&self) -> &str {
        self.ids.subject()
    }

    pub fn predicate(&self) -> &str {
        self.ids.predicate()
    }

    pub fn object(&self) -> &str {
        self.ids.object()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Pull and resolve one triple.
    ///
    /// An identifier the dictionary cannot resolve is an integrity fault of
    /// the store and fails with
    /// [`HdtError::DictionaryLookup`](crate::HdtError::DictionaryLookup).
    pub fn next_triple(&mut self) -> Result<TripleString> {
        let ids = self.ids.next_triple()?;
        self.dictionary.resolve_triple(ids)
    }
}

impl TripleCursor for TripleIterator<'_> {
    type Item = TripleString;

    fn has_next(&self) -> bool {
        self.ids.has_next()
    }

    fn next_result(&mut self) -> Result<TripleString> {
        self.next_triple()
    }

    fn estimated_cardinality(&self) -> usize {
        self.ids.estimated_cardinality()
    }

    fn accurate_cardinality(&self) -> usize {
        self.ids.accurate_cardinality()
    }

    fn pattern(&self) -> &TripleString {
        self.ids.pattern()
    }

    fn limit(&self) -> usize {
        self.ids.limit()
    }

    fn offset(&self) -> usize {
        self.ids.offset()
    }

    fn results_read(&self) -> usize {
        self.ids.results_read()
    }
}

impl Iterator for TripleIterator<'_> {
    type Item = Result<TripleString>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.has_next() {
            return None;
        }
        Some(self.next_triple())
    }
}

impl fmt::Display for TripleIterator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<TripleIterator {} {} {}>",
            display_term(self.subject(), "?s"),
            display_term(self.predicate(), "?p"),
            display_term(self.object(), "?o")
        )
    }
}
