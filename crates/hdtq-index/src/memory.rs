//! In-memory reference engine.

use std::collections::BTreeSet;

use ahash::AHashSet;
use anyhow::{bail, Result};

use crate::{
    Dictionary, Id, IdPattern, IndexMetadata, JoinEngine, JoinPattern,
    NativeBindingStream, NativeTripleIterator, NestedLoopJoin, SectionDictionary, TripleId,
    TripleIndex, TriplePosition, TripleTable,
};

/// An immutable, fully indexed triple set held in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryIndex {
    dictionary: SectionDictionary,
    triples: TripleTable,
}

impl MemoryIndex {
    pub fn builder() -> MemoryIndexBuilder {
        MemoryIndexBuilder::new()
    }

    /// Build an index from string triples in one go.
    pub fn from_triples<I, S>(triples: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, S, S)>,
        S: AsRef<str>,
    {
        let mut builder = MemoryIndexBuilder::new();
        for (s, p, o) in triples {
            builder.add_triple(s.as_ref(), p.as_ref(), o.as_ref())?;
        }
        Ok(builder.build())
    }

    pub fn dictionary(&self) -> &SectionDictionary {
        &self.dictionary
    }

    pub fn triples(&self) -> &TripleTable {
        &self.triples
    }
}

impl Dictionary for MemoryIndex {
    fn id_of(&self, term: &str, position: TriplePosition) -> Id {
        self.dictionary.id_of(term, position)
    }

    fn term_of(&self, id: Id, position: TriplePosition) -> Option<String> {
        self.dictionary.term_of(id, position)
    }
}

impl TripleIndex for MemoryIndex {
    fn search<'a>(&'a self, pattern: IdPattern) -> Box<dyn NativeTripleIterator + 'a> {
        Box::new(self.triples.search(pattern))
    }
}

impl JoinEngine for MemoryIndex {
    fn search_join<'a>(
        &'a self,
        patterns: &[JoinPattern],
        variables: &BTreeSet<String>,
    ) -> Box<dyn NativeBindingStream + 'a> {
        Box::new(NestedLoopJoin::new(self, patterns, variables))
    }
}

impl IndexMetadata for MemoryIndex {
    fn number_of_triples(&self) -> usize {
        self.triples.len()
    }

    fn number_of_subjects(&self) -> usize {
        self.dictionary.subjects_len()
    }

    fn number_of_predicates(&self) -> usize {
        self.dictionary.predicates_len()
    }

    fn number_of_objects(&self) -> usize {
        self.dictionary.objects_len()
    }

    fn number_of_shared_subject_object(&self) -> usize {
        self.dictionary.shared_len()
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Collects string triples, then freezes them into a [`MemoryIndex`].
#[derive(Debug, Default)]
pub struct MemoryIndexBuilder {
    triples: AHashSet<(String, String, String)>,
}

impl MemoryIndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Add a triple. Returns `false` if it was already present.
    ///
    /// The empty string is the wildcard and cannot be stored.
    pub fn add_triple(&mut self, subject: &str, predicate: &str, object: &str) -> Result<bool> {
        for (position, term) in [
            (TriplePosition::Subject, subject),
            (TriplePosition::Predicate, predicate),
            (TriplePosition::Object, object),
        ] {
            if term.is_empty() {
                bail!("cannot store an empty {position} term");
            }
        }
        Ok(self.triples.insert((
            subject.to_string(),
            predicate.to_string(),
            object.to_string(),
        )))
    }

    pub fn build(self) -> MemoryIndex {
        let mut subjects = BTreeSet::new();
        let mut predicates = BTreeSet::new();
        let mut objects = BTreeSet::new();
        for (s, p, o) in &self.triples {
            subjects.insert(s.clone());
            predicates.insert(p.clone());
            objects.insert(o.clone());
        }

        let dictionary = SectionDictionary::from_terms(subjects, predicates, objects);
        let ids: Vec<TripleId> = self
            .triples
            .iter()
            .map(|(s, p, o)| {
                TripleId::new(
                    dictionary.id_of(s, TriplePosition::Subject),
                    dictionary.id_of(p, TriplePosition::Predicate),
                    dictionary.id_of(o, TriplePosition::Object),
                )
            })
            .collect();
        let triples = TripleTable::new(ids);

        tracing::debug!(
            triples = triples.len(),
            subjects = dictionary.subjects_len(),
            predicates = dictionary.predicates_len(),
            objects = dictionary.objects_len(),
            shared = dictionary.shared_len(),
            "built in-memory index"
        );

        MemoryIndex {
            dictionary,
            triples,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Bindings, JoinTerm, TripleString};

    fn social() -> MemoryIndex {
        MemoryIndex::from_triples([
            ("urn:alice", "urn:knows", "urn:bob"),
            ("urn:alice", "urn:age", "\"30\""),
            ("urn:carol", "urn:knows", "urn:bob"),
            ("urn:bob", "urn:knows", "urn:alice"),
        ])
        .unwrap()
    }

    fn collect_bindings(mut stream: Box<dyn NativeBindingStream + '_>) -> Vec<Bindings> {
        let mut out = Vec::new();
        while let Some(b) = stream.next_binding() {
            out.push(b);
        }
        out
    }

    fn var(name: &str) -> JoinTerm {
        JoinTerm::Variable(name.to_string())
    }

    fn constant(value: &str) -> JoinTerm {
        JoinTerm::Constant(value.to_string())
    }

    #[test]
    fn builder_rejects_empty_terms() {
        let mut builder = MemoryIndex::builder();
        assert!(builder.add_triple("", "urn:p", "urn:o").is_err());
        assert!(builder.add_triple("urn:s", "urn:p", "").is_err());
        assert!(builder.is_empty());
    }

    #[test]
    fn builder_collapses_duplicates() {
        let mut builder = MemoryIndex::builder();
        assert!(builder.add_triple("urn:s", "urn:p", "urn:o").unwrap());
        assert!(!builder.add_triple("urn:s", "urn:p", "urn:o").unwrap());
        let index = builder.build();
        assert_eq!(index.number_of_triples(), 1);
    }

    #[test]
    fn metadata_counts_sections() {
        let index = social();
        assert_eq!(index.number_of_triples(), 4);
        // alice, bob, carol
        assert_eq!(index.number_of_subjects(), 3);
        assert_eq!(index.number_of_predicates(), 2);
        // bob, alice, "30"
        assert_eq!(index.number_of_objects(), 3);
        // alice, bob
        assert_eq!(index.number_of_shared_subject_object(), 2);
    }

    #[test]
    fn every_stored_triple_round_trips_through_the_dictionary() {
        let index = social();
        for t in index.triples().as_slice() {
            let strings = TripleString::new(
                index.term_of(t.subject, TriplePosition::Subject).unwrap(),
                index.term_of(t.predicate, TriplePosition::Predicate).unwrap(),
                index.term_of(t.object, TriplePosition::Object).unwrap(),
            );
            let back = TripleId::new(
                index.id_of(&strings.subject, TriplePosition::Subject),
                index.id_of(&strings.predicate, TriplePosition::Predicate),
                index.id_of(&strings.object, TriplePosition::Object),
            );
            assert_eq!(*t, back);
        }
    }

    #[test]
    fn join_on_shared_subject_variable() {
        let index = social();
        let patterns = vec![
            JoinPattern::new(var("?s"), constant("urn:knows"), constant("urn:bob")),
            JoinPattern::new(var("?s"), constant("urn:age"), var("?a")),
        ];
        let variables: BTreeSet<String> = ["?s", "?a"].iter().map(|v| v.to_string()).collect();

        let results = collect_bindings(index.search_join(&patterns, &variables));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].get("?s").map(String::as_str), Some("urn:alice"));
        assert_eq!(results[0].get("?a").map(String::as_str), Some("\"30\""));
    }

    #[test]
    fn join_variable_can_cross_subject_and_object_positions() {
        let index = social();
        // ?x knows ?y and ?y knows ?x
        let patterns = vec![
            JoinPattern::new(var("?x"), constant("urn:knows"), var("?y")),
            JoinPattern::new(var("?y"), constant("urn:knows"), var("?x")),
        ];
        let variables: BTreeSet<String> = ["?x", "?y"].iter().map(|v| v.to_string()).collect();

        let results = collect_bindings(index.search_join(&patterns, &variables));
        let pairs: Vec<(String, String)> = results
            .into_iter()
            .map(|b| (b["?x"].clone(), b["?y"].clone()))
            .collect();
        assert_eq!(pairs.len(), 2);
        assert!(pairs.contains(&("urn:alice".to_string(), "urn:bob".to_string())));
        assert!(pairs.contains(&("urn:bob".to_string(), "urn:alice".to_string())));
    }

    #[test]
    fn join_with_unknown_constant_is_empty() {
        let index = social();
        let patterns = vec![JoinPattern::new(
            var("?s"),
            constant("urn:hates"),
            JoinTerm::Wildcard,
        )];
        let variables: BTreeSet<String> = ["?s"].iter().map(|v| v.to_string()).collect();

        let stream = index.search_join(&patterns, &variables);
        assert!(!stream.has_next());
    }

    #[test]
    fn join_repeated_variable_within_one_pattern_must_agree() {
        let index = MemoryIndex::from_triples([
            ("urn:a", "urn:same", "urn:a"),
            ("urn:a", "urn:same", "urn:b"),
        ])
        .unwrap();
        let patterns = vec![JoinPattern::new(
            var("?x"),
            constant("urn:same"),
            var("?x"),
        )];
        let variables: BTreeSet<String> = ["?x"].iter().map(|v| v.to_string()).collect();

        let results = collect_bindings(index.search_join(&patterns, &variables));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["?x"], "urn:a");
    }
}
