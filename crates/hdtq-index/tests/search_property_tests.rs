use hdtq_index::*;
use proptest::prelude::*;

const MAX_TERMS: usize = 6;
const MAX_TRIPLES: usize = 60;

#[derive(Debug, Clone)]
struct SearchCase {
    triples: Vec<(usize, usize, usize)>,
    pattern: (Option<usize>, Option<usize>, Option<usize>),
    skip: usize,
}

fn search_case_strategy() -> impl Strategy<Value = SearchCase> {
    (
        prop::collection::vec((0..MAX_TERMS, 0..MAX_TERMS, 0..MAX_TERMS), 1..=MAX_TRIPLES),
        (
            prop::option::of(0..MAX_TERMS),
            prop::option::of(0..MAX_TERMS),
            prop::option::of(0..MAX_TERMS),
        ),
        0usize..20,
    )
        .prop_map(|(triples, pattern, skip)| SearchCase {
            triples,
            pattern,
            skip,
        })
}

fn term(i: usize) -> String {
    format!("urn:t{i}")
}

fn build(case: &SearchCase) -> MemoryIndex {
    MemoryIndex::from_triples(
        case.triples
            .iter()
            .map(|&(s, p, o)| (term(s), term(p), term(o))),
    )
    .unwrap()
}

/// Id pattern for the case, or `None` if a bound term is not in the store.
fn id_pattern(index: &MemoryIndex, case: &SearchCase) -> Option<IdPattern> {
    let mut pattern = IdPattern::default();
    let slots = [case.pattern.0, case.pattern.1, case.pattern.2];
    for (position, slot) in TriplePosition::ALL.into_iter().zip(slots) {
        if let Some(i) = slot {
            let id = index.id_of(&term(i), position);
            if id == WILDCARD {
                return None;
            }
            pattern.set(position, id);
        }
    }
    Some(pattern)
}

fn naive(index: &MemoryIndex, pattern: &IdPattern) -> Vec<TripleId> {
    index
        .triples()
        .as_slice()
        .iter()
        .filter(|t| pattern.matches(t))
        .copied()
        .collect()
}

fn drain(it: &mut (dyn NativeTripleIterator + '_)) -> Vec<TripleId> {
    let mut out = Vec::new();
    while let Some(t) = it.next_triple() {
        out.push(t);
    }
    out
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]

    #[test]
    fn search_matches_naive_filter(case in search_case_strategy()) {
        let index = build(&case);
        let Some(pattern) = id_pattern(&index, &case) else {
            return Ok(());
        };

        let mut it = index.search(pattern);
        let estimate = it.estimated_num_results();
        let exact = it.count_exact();
        let mut got = drain(it.as_mut());
        got.sort();

        let expected = naive(&index, &pattern);
        prop_assert_eq!(&got, &expected);
        prop_assert_eq!(exact, expected.len());
        prop_assert!(estimate >= exact);
    }

    #[test]
    fn skip_equals_dropping_a_prefix(case in search_case_strategy()) {
        let index = build(&case);
        let Some(pattern) = id_pattern(&index, &case) else {
            return Ok(());
        };

        let full = drain(index.search(pattern).as_mut());
        let mut it = index.search(pattern);
        it.skip(case.skip);
        let rest = drain(it.as_mut());

        let expected: Vec<TripleId> = full.into_iter().skip(case.skip).collect();
        prop_assert_eq!(rest, expected);
    }
}
