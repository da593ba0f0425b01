//! The document facade: owns an index engine and opens iterators over it.

use std::collections::BTreeSet;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

use hdtq_index::{
    EmptyTripleIterator, Id, IndexEngine, JoinPattern, NativeTripleIterator, StoreLoader,
    TripleId, TriplePosition, TripleString,
};

use crate::config::QueryConfig;
use crate::dictionary::DictionaryAdapter;
use crate::error::{HdtError, Result};
use crate::id_iterator::TripleIdIterator;
use crate::join::JoinIterator;
use crate::offset::apply_offset;
use crate::pattern::PatternTranslator;
use crate::string_iterator::TripleIterator;

/// A queryable triple store.
///
/// The engine is treated as immutable for as long as the document lives.
/// Every iterator borrows the document, so nothing can replace or mutate
/// the engine while results are still being read.
pub struct HdtDocument<E> {
    engine: E,
    path: Option<PathBuf>,
    config: QueryConfig,
}

impl<E: IndexEngine> HdtDocument<E> {
    /// Wrap an already initialised engine.
    pub fn new(engine: E) -> Self {
        Self::with_config(engine, QueryConfig::default())
    }

    pub fn with_config(engine: E, config: QueryConfig) -> Self {
        Self {
            engine,
            path: None,
            config,
        }
    }

    /// Open the store at `path` through `loader`.
    pub fn open<L>(path: impl AsRef<Path>, loader: &L) -> Result<Self>
    where
        L: StoreLoader<Engine = E>,
    {
        Self::open_with_config(path, loader, QueryConfig::default())
    }

    pub fn open_with_config<L>(
        path: impl AsRef<Path>,
        loader: &L,
        config: QueryConfig,
    ) -> Result<Self>
    where
        L: StoreLoader<Engine = E>,
    {
        let path = path.as_ref();
        File::open(path).map_err(|source| HdtError::NotFound {
            path: path.to_path_buf(),
            source,
        })?;

        let engine = loader.open(path).map_err(|source| HdtError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(
            path = %path.display(),
            triples = engine.number_of_triples(),
            "opened store"
        );

        Ok(Self {
            engine,
            path: Some(path.to_path_buf()),
            config,
        })
    }

    /// Where the store was opened from; `None` for stores built in memory.
    pub fn file_path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    // ========================================================================
    // Statistics
    // ========================================================================

    pub fn total_triples(&self) -> usize {
        self.engine.number_of_triples()
    }

    pub fn subject_count(&self) -> usize {
        self.engine.number_of_subjects()
    }

    pub fn predicate_count(&self) -> usize {
        self.engine.number_of_predicates()
    }

    pub fn object_count(&self) -> usize {
        self.engine.number_of_objects()
    }

    pub fn shared_subject_object_count(&self) -> usize {
        self.engine.number_of_shared_subject_object()
    }

    pub fn len(&self) -> usize {
        self.total_triples()
    }

    pub fn is_empty(&self) -> bool {
        self.total_triples() == 0
    }

    // ========================================================================
    // Query Operations
    // ========================================================================

    fn dictionary(&self) -> DictionaryAdapter<'_> {
        DictionaryAdapter::new(&self.engine)
    }

    fn translator(&self) -> PatternTranslator<'_> {
        PatternTranslator::new(self.dictionary(), self.config.variable_sigil)
    }

    /// Search triples matching `(subject, predicate, object)`, where `""`
    /// matches anything and every other term is matched literally (there are
    /// no variables outside joins). `limit == 0` means no limit.
    ///
    /// Returns the iterator and the estimated number of matches of the whole
    /// pattern (before windowing).
    pub fn search(
        &self,
        subject: &str,
        predicate: &str,
        object: &str,
        limit: usize,
        offset: usize,
    ) -> (TripleIterator<'_>, usize) {
        let (ids, estimate) = self.search_ids(subject, predicate, object, limit, offset);
        (TripleIterator::new(ids, self.dictionary()), estimate)
    }

    /// Like [`search`](Self::search), but yields identifier triples.
    pub fn search_ids(
        &self,
        subject: &str,
        predicate: &str,
        object: &str,
        limit: usize,
        offset: usize,
    ) -> (TripleIdIterator<'_>, usize) {
        let pattern = TripleString::new(subject, predicate, object);
        let translation = self.translator().translate(&pattern);

        if translation.short_circuit {
            tracing::debug!(
                subject,
                predicate,
                object,
                "pattern holds a term missing from the dictionary, nothing to search"
            );
            let it = TripleIdIterator::new(Box::new(EmptyTripleIterator), pattern, limit, offset);
            return (it, 0);
        }

        let mut native = self.engine.search(translation.pattern);
        let estimate = native.estimated_num_results();
        apply_offset(native.as_mut(), offset, estimate);
        tracing::debug!(
            subject,
            predicate,
            object,
            limit,
            offset,
            estimate,
            "opened triple search"
        );

        (
            TripleIdIterator::new(native, pattern, limit, offset),
            estimate,
        )
    }

    /// Resolve an identifier triple to its terms.
    pub fn ids_to_string(&self, subject: Id, predicate: Id, object: Id) -> Result<TripleString> {
        self.dictionary()
            .resolve_triple(TripleId::new(subject, predicate, object))
    }

    /// Join several patterns on their shared variables.
    ///
    /// Terms starting with the configured sigil (`?` by default) are
    /// variables; `""` is a wildcard; anything else must match exactly.
    pub fn search_join(&self, patterns: &[TripleString]) -> Result<JoinIterator<'_>> {
        if patterns.is_empty() {
            return Err(HdtError::InvalidPattern(
                "a join needs at least one pattern".to_string(),
            ));
        }

        let translator = self.translator();
        let mut variables = BTreeSet::new();
        let mut join_patterns: Vec<JoinPattern> = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            let join_pattern = translator.join_pattern(pattern)?;
            for position in TriplePosition::ALL {
                if let Some(name) = join_pattern.get(position).variable_name() {
                    variables.insert(name.to_string());
                }
            }
            join_patterns.push(join_pattern);
        }

        tracing::debug!(
            patterns = join_patterns.len(),
            variables = ?variables,
            "opened join search"
        );
        let native = self.engine.search_join(&join_patterns, &variables);
        Ok(JoinIterator::new(native, variables))
    }
}

impl<E: IndexEngine> fmt::Display for HdtDocument<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = self
            .path
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<memory>".to_string());
        write!(
            f,
            "<HDTDocument {} (~{} RDF triples)>",
            path,
            self.total_triples()
        )
    }
}
