//! HDTQ Index: the engine boundary underneath the HDTQ query layer
//!
//! The query layer never touches dictionary sections or triple orderings
//! directly. It consumes an index through four capabilities:
//!
//! 1. **Dictionary**: term <-> identifier translation, scoped per triple position
//! 2. **Triple search**: identifier pattern -> forward-only native iterator with
//!    a cheap cardinality estimate and a prefix skip
//! 3. **Join search**: several term patterns sharing variables -> binding stream
//! 4. **Metadata**: triple / subject / predicate / object / shared counts
//!
//! [`MemoryIndex`] is an in-memory reference engine implementing all four,
//! laid out the way compressed triple stores are (four-section dictionary,
//! SPO-sorted triples with object and predicate access paths).
//!
//! ## Identifier conventions
//!
//! - `0` never names a term: dictionaries answer `0` for unknown terms and
//!   identifier patterns use `0` as the wildcard.
//! - Subject and object spaces share the prefix `1..=shared` for terms that
//!   occur in both positions.

mod dictionary;
mod join;
mod memory;
mod triples;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

pub use dictionary::SectionDictionary;
pub use join::NestedLoopJoin;
pub use memory::{MemoryIndex, MemoryIndexBuilder};
pub use triples::{MemoryTripleIterator, TripleTable};

// ============================================================================
// Shared Value Types
// ============================================================================

/// Term identifier. `0` is reserved for "no such term" / wildcard.
pub type Id = u32;

/// The reserved identifier.
pub const WILDCARD: Id = 0;

/// Which slot of a triple a term or identifier belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriplePosition {
    Subject,
    Predicate,
    Object,
}

impl TriplePosition {
    pub const ALL: [TriplePosition; 3] = [Self::Subject, Self::Predicate, Self::Object];
}

impl fmt::Display for TriplePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Subject => "subject",
            Self::Predicate => "predicate",
            Self::Object => "object",
        };
        f.write_str(name)
    }
}

/// A triple of identifiers.
///
/// Doubles as an identifier pattern, where [`WILDCARD`] in a slot matches
/// anything.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct TripleId {
    pub subject: Id,
    pub predicate: Id,
    pub object: Id,
}

/// An identifier pattern: a [`TripleId`] whose `0` slots are wildcards.
pub type IdPattern = TripleId;

impl TripleId {
    pub const fn new(subject: Id, predicate: Id, object: Id) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }

    pub const fn get(&self, position: TriplePosition) -> Id {
        match position {
            TriplePosition::Subject => self.subject,
            TriplePosition::Predicate => self.predicate,
            TriplePosition::Object => self.object,
        }
    }

    pub fn set(&mut self, position: TriplePosition, id: Id) {
        match position {
            TriplePosition::Subject => self.subject = id,
            TriplePosition::Predicate => self.predicate = id,
            TriplePosition::Object => self.object = id,
        }
    }

    /// Treating `self` as a pattern, does `triple` match it?
    pub fn matches(&self, triple: &TripleId) -> bool {
        (self.subject == WILDCARD || self.subject == triple.subject)
            && (self.predicate == WILDCARD || self.predicate == triple.predicate)
            && (self.object == WILDCARD || self.object == triple.object)
    }

    pub fn is_fully_unbound(&self) -> bool {
        self.subject == WILDCARD && self.predicate == WILDCARD && self.object == WILDCARD
    }
}

/// A triple of terms in their string form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TripleString {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

impl TripleString {
    pub fn new(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }

    pub fn get(&self, position: TriplePosition) -> &str {
        match position {
            TriplePosition::Subject => &self.subject,
            TriplePosition::Predicate => &self.predicate,
            TriplePosition::Object => &self.object,
        }
    }
}

impl<S: Into<String>> From<(S, S, S)> for TripleString {
    fn from((subject, predicate, object): (S, S, S)) -> Self {
        Self::new(subject, predicate, object)
    }
}

/// One slot of a join pattern, already classified.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JoinTerm {
    /// Matches anything and binds nothing.
    Wildcard,
    /// A concrete term that must match.
    Constant(String),
    /// A named variable (name includes the sigil, e.g. `?s`).
    Variable(String),
}

impl JoinTerm {
    pub fn variable_name(&self) -> Option<&str> {
        match self {
            Self::Variable(name) => Some(name),
            _ => None,
        }
    }
}

/// A triple pattern taking part in a join.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JoinPattern {
    pub subject: JoinTerm,
    pub predicate: JoinTerm,
    pub object: JoinTerm,
}

impl JoinPattern {
    pub fn new(subject: JoinTerm, predicate: JoinTerm, object: JoinTerm) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }

    pub fn get(&self, position: TriplePosition) -> &JoinTerm {
        match position {
            TriplePosition::Subject => &self.subject,
            TriplePosition::Predicate => &self.predicate,
            TriplePosition::Object => &self.object,
        }
    }
}

/// Variable name -> bound term.
pub type Bindings = BTreeMap<String, String>;

// ============================================================================
// Consumed Capabilities
// ============================================================================

/// Term <-> identifier translation.
pub trait Dictionary {
    /// Identifier of `term` in `position`'s space, or [`WILDCARD`] if unknown
    /// (the empty term is always unknown).
    fn id_of(&self, term: &str, position: TriplePosition) -> Id;

    /// Term behind `id` in `position`'s space.
    fn term_of(&self, id: Id, position: TriplePosition) -> Option<String>;
}

/// A native search result cursor.
///
/// Forward-only and not restartable. `skip` is only guaranteed to be cheap
/// within the estimated number of results.
pub trait NativeTripleIterator {
    fn has_next(&self) -> bool;

    fn next_triple(&mut self) -> Option<TripleId>;

    /// Discard the next `n` results (or all remaining ones, if fewer).
    fn skip(&mut self, n: usize);

    /// Cached estimate of the total number of matches. May be inexact.
    fn estimated_num_results(&self) -> usize;

    /// Exact total number of matches of the searched pattern, counted
    /// without moving this cursor.
    fn count_exact(&self) -> usize;
}

/// Identifier-pattern search.
pub trait TripleIndex {
    fn search<'a>(&'a self, pattern: IdPattern) -> Box<dyn NativeTripleIterator + 'a>;
}

/// A native stream of join results.
pub trait NativeBindingStream {
    fn has_next(&self) -> bool;

    fn next_binding(&mut self) -> Option<Bindings>;
}

/// Multi-pattern join search.
pub trait JoinEngine {
    /// Stream every assignment of `variables` under which all `patterns`
    /// match simultaneously.
    fn search_join<'a>(
        &'a self,
        patterns: &[JoinPattern],
        variables: &BTreeSet<String>,
    ) -> Box<dyn NativeBindingStream + 'a>;
}

/// O(1) statistics about the store.
pub trait IndexMetadata {
    fn number_of_triples(&self) -> usize;

    /// Distinct subjects, shared terms included.
    fn number_of_subjects(&self) -> usize;

    fn number_of_predicates(&self) -> usize;

    /// Distinct objects, shared terms included.
    fn number_of_objects(&self) -> usize;

    /// Terms occurring both as subject and as object.
    fn number_of_shared_subject_object(&self) -> usize;
}

/// Everything the query layer needs from an index.
pub trait IndexEngine: Dictionary + TripleIndex + JoinEngine + IndexMetadata {}

impl<T> IndexEngine for T where T: Dictionary + TripleIndex + JoinEngine + IndexMetadata {}

/// Opens a persisted store.
///
/// The on-disk format belongs to the implementor; the query layer only asks
/// for a live engine.
pub trait StoreLoader {
    type Engine: IndexEngine;

    fn open(&self, path: &Path) -> anyhow::Result<Self::Engine>;
}

impl<F, E> StoreLoader for F
where
    F: Fn(&Path) -> anyhow::Result<E>,
    E: IndexEngine,
{
    type Engine = E;

    fn open(&self, path: &Path) -> anyhow::Result<E> {
        self(path)
    }
}

// ============================================================================
// Empty Results
// ============================================================================

/// A search result with nothing in it.
///
/// Used where a search is known to be empty without asking the index.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyTripleIterator;

impl NativeTripleIterator for EmptyTripleIterator {
    fn has_next(&self) -> bool {
        false
    }

    fn next_triple(&mut self) -> Option<TripleId> {
        None
    }

    fn skip(&mut self, _n: usize) {}

    fn estimated_num_results(&self) -> usize {
        0
    }

    fn count_exact(&self) -> usize {
        0
    }
}
