//! Dictionary adapter: term <-> identifier translation with typed failures.

use hdtq_index::{Dictionary, Id, TripleId, TriplePosition, TripleString, WILDCARD};

use crate::error::{HdtError, Result};

/// Read-only view over an engine's dictionary.
///
/// Borrows the dictionary; the document owns it for as long as any adapter
/// (or iterator holding one) is alive.
#[derive(Clone, Copy)]
pub struct DictionaryAdapter<'a> {
    dictionary: &'a dyn Dictionary,
}

impl<'a> DictionaryAdapter<'a> {
    pub fn new(dictionary: &'a dyn Dictionary) -> Self {
        Self { dictionary }
    }

    /// Identifier of `term`, or [`WILDCARD`] for empty and unknown terms.
    pub fn resolve_id(&self, term: &str, position: TriplePosition) -> Id {
        if term.is_empty() {
            return WILDCARD;
        }
        self.dictionary.id_of(term, position)
    }

    pub fn resolve_term(&self, id: Id, position: TriplePosition) -> Result<String> {
        self.dictionary.term_of(id, position).ok_or_else(|| {
            tracing::warn!(id, position = %position, "identifier missing from dictionary");
            HdtError::DictionaryLookup { id, position }
        })
    }

    pub fn resolve_triple(&self, ids: TripleId) -> Result<TripleString> {
        Ok(TripleString {
            subject: self.resolve_term(ids.subject, TriplePosition::Subject)?,
            predicate: self.resolve_term(ids.predicate, TriplePosition::Predicate)?,
            object: self.resolve_term(ids.object, TriplePosition::Object)?,
        })
    }
}
