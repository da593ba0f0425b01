//! Pattern translation.
//!
//! Raw string terms are classified exactly once, here. In a single-pattern
//! search `""` is a wildcard and every other term is a value that must exist
//! in the dictionary, sigil or not. Only join patterns know about variables:
//! there, a term starting with the variable sigil is a named variable.
//!
//! Downstream code only sees [`PatternTerm`], [`IdPattern`] or
//! [`JoinPattern`], never the raw strings.

use hdtq_index::{Id, IdPattern, JoinPattern, JoinTerm, TriplePosition, TripleString, WILDCARD};

use crate::dictionary::DictionaryAdapter;
use crate::error::{HdtError, Result};

/// A classified triple-pattern slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternTerm {
    Wildcard,
    /// A value term and its identifier; [`WILDCARD`] if the dictionary does
    /// not know it.
    Bound(Id),
    Variable(String),
}

/// Result of translating a single string pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Translation {
    pub pattern: IdPattern,
    /// A bound term is absent from the dictionary: the pattern matches
    /// nothing and no search is needed.
    pub short_circuit: bool,
}

impl Translation {
    fn empty() -> Self {
        Self {
            pattern: IdPattern::default(),
            short_circuit: true,
        }
    }
}

pub struct PatternTranslator<'a> {
    dictionary: DictionaryAdapter<'a>,
    sigil: char,
}

impl<'a> PatternTranslator<'a> {
    pub fn new(dictionary: DictionaryAdapter<'a>, sigil: char) -> Self {
        Self { dictionary, sigil }
    }

    fn is_variable(&self, term: &str) -> bool {
        term.starts_with(self.sigil)
    }

    /// Classify a join-pattern slot, resolving value terms.
    pub fn classify(&self, term: &str, position: TriplePosition) -> PatternTerm {
        if term.is_empty() {
            PatternTerm::Wildcard
        } else if self.is_variable(term) {
            PatternTerm::Variable(term.to_string())
        } else {
            PatternTerm::Bound(self.dictionary.resolve_id(term, position))
        }
    }

    /// Translate a string pattern into an identifier pattern.
    ///
    /// Every non-empty term is looked up literally, so a stored term that
    /// happens to start with the sigil is still found.
    pub fn translate(&self, pattern: &TripleString) -> Translation {
        let mut ids = IdPattern::default();
        for position in TriplePosition::ALL {
            let term = pattern.get(position);
            if term.is_empty() {
                continue;
            }
            match self.dictionary.resolve_id(term, position) {
                WILDCARD => return Translation::empty(),
                id => ids.set(position, id),
            }
        }
        Translation {
            pattern: ids,
            short_circuit: false,
        }
    }

    fn join_term(&self, term: &str) -> Result<JoinTerm> {
        if term.is_empty() {
            return Ok(JoinTerm::Wildcard);
        }
        if self.is_variable(term) {
            if term.len() == self.sigil.len_utf8() {
                return Err(HdtError::InvalidPattern(format!(
                    "variable `{term}` has no name"
                )));
            }
            return Ok(JoinTerm::Variable(term.to_string()));
        }
        Ok(JoinTerm::Constant(term.to_string()))
    }

    /// Classify one pattern of a join.
    pub fn join_pattern(&self, pattern: &TripleString) -> Result<JoinPattern> {
        Ok(JoinPattern::new(
            self.join_term(&pattern.subject)?,
            self.join_term(&pattern.predicate)?,
            self.join_term(&pattern.object)?,
        ))
    }
}
