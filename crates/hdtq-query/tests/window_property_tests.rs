use std::collections::BTreeSet;

use hdtq_index::{
    Dictionary, Id, IdPattern, IndexMetadata, JoinEngine, JoinPattern, MemoryIndex,
    NativeBindingStream, NativeTripleIterator, TripleId, TripleIndex, TriplePosition,
};
use hdtq_query::{HdtDocument, TripleCursor, TripleString};
use proptest::prelude::*;

const MAX_TERMS: usize = 5;
const MAX_TRIPLES: usize = 50;

fn term(i: usize) -> String {
    format!("urn:t{i}")
}

fn build(triples: &[(usize, usize, usize)]) -> MemoryIndex {
    MemoryIndex::from_triples(triples.iter().map(|&(s, p, o)| (term(s), term(p), term(o))))
        .unwrap()
}

fn slot(bound: Option<usize>) -> String {
    bound.map(term).unwrap_or_default()
}

// ============================================================================
// An engine whose estimates undercount
// ============================================================================

/// Wraps a native cursor and reports `estimate / divisor` as its estimate.
struct Understated<'a> {
    inner: Box<dyn NativeTripleIterator + 'a>,
    divisor: usize,
}

impl NativeTripleIterator for Understated<'_> {
    fn has_next(&self) -> bool {
        self.inner.has_next()
    }

    fn next_triple(&mut self) -> Option<TripleId> {
        self.inner.next_triple()
    }

    fn skip(&mut self, n: usize) {
        self.inner.skip(n)
    }

    fn estimated_num_results(&self) -> usize {
        self.inner.estimated_num_results() / self.divisor
    }

    fn count_exact(&self) -> usize {
        self.inner.count_exact()
    }
}

struct UnderstatingIndex {
    inner: MemoryIndex,
    divisor: usize,
}

impl Dictionary for UnderstatingIndex {
    fn id_of(&self, term: &str, position: TriplePosition) -> Id {
        self.inner.id_of(term, position)
    }

    fn term_of(&self, id: Id, position: TriplePosition) -> Option<String> {
        self.inner.term_of(id, position)
    }
}

impl TripleIndex for UnderstatingIndex {
    fn search<'a>(&'a self, pattern: IdPattern) -> Box<dyn NativeTripleIterator + 'a> {
        Box::new(Understated {
            inner: self.inner.search(pattern),
            divisor: self.divisor,
        })
    }
}

impl JoinEngine for UnderstatingIndex {
    fn search_join<'a>(
        &'a self,
        patterns: &[JoinPattern],
        variables: &BTreeSet<String>,
    ) -> Box<dyn NativeBindingStream + 'a> {
        self.inner.search_join(patterns, variables)
    }
}

impl IndexMetadata for UnderstatingIndex {
    fn number_of_triples(&self) -> usize {
        self.inner.number_of_triples()
    }

    fn number_of_subjects(&self) -> usize {
        self.inner.number_of_subjects()
    }

    fn number_of_predicates(&self) -> usize {
        self.inner.number_of_predicates()
    }

    fn number_of_objects(&self) -> usize {
        self.inner.number_of_objects()
    }

    fn number_of_shared_subject_object(&self) -> usize {
        self.inner.number_of_shared_subject_object()
    }
}

// ============================================================================
// Properties
// ============================================================================

fn triples_strategy() -> impl Strategy<Value = Vec<(usize, usize, usize)>> {
    prop::collection::vec((0..MAX_TERMS, 0..MAX_TERMS, 0..MAX_TERMS), 1..=MAX_TRIPLES)
}

fn pattern_strategy() -> impl Strategy<Value = (Option<usize>, Option<usize>, Option<usize>)> {
    (
        prop::option::of(0..MAX_TERMS + 1),
        prop::option::of(0..MAX_TERMS + 1),
        prop::option::of(0..MAX_TERMS + 1),
    )
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 96, .. ProptestConfig::default() })]

    #[test]
    fn exhaustive_read_matches_accurate_cardinality(
        triples in triples_strategy(),
        pattern in pattern_strategy(),
    ) {
        let doc = HdtDocument::new(build(&triples));
        let (s, p, o) = (slot(pattern.0), slot(pattern.1), slot(pattern.2));
        let (it, _) = doc.search(&s, &p, &o, 0, 0);
        let accurate = it.accurate_cardinality();
        let read = it.map(|t| t.unwrap()).count();
        prop_assert_eq!(read, accurate);
    }

    #[test]
    fn window_is_a_slice_of_the_full_result(
        triples in triples_strategy(),
        pattern in pattern_strategy(),
        limit in 0usize..8,
        offset in 0usize..60,
        divisor in 1usize..4,
    ) {
        let (s, p, o) = (slot(pattern.0), slot(pattern.1), slot(pattern.2));
        let exact = HdtDocument::new(build(&triples));
        let full: Vec<TripleString> = exact.search(&s, &p, &o, 0, 0).0.map(|t| t.unwrap()).collect();

        let understated = HdtDocument::new(UnderstatingIndex { inner: build(&triples), divisor });
        let (it, _) = understated.search(&s, &p, &o, limit, offset);
        let window: Vec<TripleString> = it.map(|t| t.unwrap()).collect();

        let start = offset.min(full.len());
        let end = if limit == 0 { full.len() } else { (start + limit).min(full.len()) };
        prop_assert_eq!(window, full[start..end].to_vec());
    }

    #[test]
    fn estimate_is_stable_while_reading(
        triples in triples_strategy(),
        pattern in pattern_strategy(),
        offset in 0usize..10,
    ) {
        let doc = HdtDocument::new(build(&triples));
        let (s, p, o) = (slot(pattern.0), slot(pattern.1), slot(pattern.2));
        let (mut it, estimate) = doc.search(&s, &p, &o, 0, offset);
        prop_assert_eq!(it.estimated_cardinality(), estimate);
        while it.has_next() {
            it.next_triple().unwrap();
            prop_assert_eq!(it.estimated_cardinality(), estimate);
        }
        prop_assert!(it.next_triple().is_err());
    }

    #[test]
    fn limit_bounds_results_read(
        triples in triples_strategy(),
        limit in 1usize..6,
    ) {
        let doc = HdtDocument::new(build(&triples));
        let (mut it, _) = doc.search_ids("", "", "", limit, 0);
        let mut read = 0;
        while it.has_next() {
            it.next_triple().unwrap();
            read += 1;
        }
        prop_assert!(read <= limit);
        prop_assert_eq!(read, it.results_read());
        prop_assert_eq!(read, limit.min(doc.total_triples()));
    }
}
