//! Triple storage and native search cursors.
//!
//! Triples are kept sorted in SPO order. Two secondary access paths cover
//! patterns whose subject is unbound:
//! - object index: positions ordered by `(object, predicate, subject)`
//! - predicate index: `predicate -> bitmap of positions`

use ahash::AHashMap;
use roaring::RoaringBitmap;

use crate::{Id, IdPattern, NativeTripleIterator, TripleId, WILDCARD};

#[derive(Debug, Default, Clone)]
pub struct TripleTable {
    /// Sorted, deduplicated.
    spo: Vec<TripleId>,
    /// Positions into `spo`, ordered by (o, p, s).
    object_index: Vec<u32>,
    predicate_index: AHashMap<Id, RoaringBitmap>,
}

impl TripleTable {
    pub fn new(mut triples: Vec<TripleId>) -> Self {
        triples.sort_unstable();
        triples.dedup();

        let mut object_index: Vec<u32> = (0..triples.len() as u32).collect();
        object_index.sort_unstable_by_key(|&pos| {
            let t = &triples[pos as usize];
            (t.object, t.predicate, t.subject)
        });

        let mut predicate_index: AHashMap<Id, RoaringBitmap> = AHashMap::new();
        for (pos, t) in triples.iter().enumerate() {
            predicate_index
                .entry(t.predicate)
                .or_insert_with(RoaringBitmap::new)
                .insert(pos as u32);
        }

        Self {
            spo: triples,
            object_index,
            predicate_index,
        }
    }

    pub fn len(&self) -> usize {
        self.spo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spo.is_empty()
    }

    /// All triples in SPO order.
    pub fn as_slice(&self) -> &[TripleId] {
        &self.spo
    }

    /// Open a cursor over every triple matching `pattern`.
    pub fn search(&self, pattern: IdPattern) -> MemoryTripleIterator<'_> {
        let (path, filtered) = self.access_path(pattern);
        MemoryTripleIterator::new(self, path, pattern, filtered)
    }

    /// Pick the narrowest access path for `pattern`, and whether the path
    /// still yields triples that need filtering.
    fn access_path(&self, pattern: IdPattern) -> (AccessPath<'_>, bool) {
        let IdPattern {
            subject: s,
            predicate: p,
            object: o,
        } = pattern;

        if s != WILDCARD {
            // Prefix of (s, p, o) that is contiguous in SPO order.
            let p_key = if p != WILDCARD { p } else { 0 };
            let o_key = if p != WILDCARD { o } else { 0 };
            let key = |t: &TripleId| {
                (
                    t.subject,
                    if p != WILDCARD { t.predicate } else { 0 },
                    if p != WILDCARD && o != WILDCARD {
                        t.object
                    } else {
                        0
                    },
                )
            };
            let target = (s, p_key, o_key);
            let start = self.spo.partition_point(|t| key(t) < target);
            let end = self.spo.partition_point(|t| key(t) <= target);
            let filtered = o != WILDCARD && p == WILDCARD;
            return (AccessPath::Spo { start, end }, filtered);
        }

        if o != WILDCARD {
            let key = |pos: &u32| {
                let t = &self.spo[*pos as usize];
                (t.object, if p != WILDCARD { t.predicate } else { 0 })
            };
            let target = (o, if p != WILDCARD { p } else { 0 });
            let start = self.object_index.partition_point(|pos| key(pos) < target);
            let end = self.object_index.partition_point(|pos| key(pos) <= target);
            return (AccessPath::Object(&self.object_index[start..end]), false);
        }

        if p != WILDCARD {
            return match self.predicate_index.get(&p) {
                Some(bitmap) => (AccessPath::Predicate(bitmap), false),
                None => (AccessPath::Spo { start: 0, end: 0 }, false),
            };
        }

        (
            AccessPath::Spo {
                start: 0,
                end: self.spo.len(),
            },
            false,
        )
    }
}

#[derive(Debug, Clone, Copy)]
enum AccessPath<'a> {
    Spo { start: usize, end: usize },
    Object(&'a [u32]),
    Predicate(&'a RoaringBitmap),
}

impl AccessPath<'_> {
    fn len(&self) -> usize {
        match self {
            Self::Spo { start, end } => end - start,
            Self::Object(positions) => positions.len(),
            Self::Predicate(bitmap) => bitmap.len() as usize,
        }
    }

    /// Position in the SPO table of the `k`-th entry of this path.
    fn position(&self, k: usize) -> Option<usize> {
        match self {
            Self::Spo { start, end } => {
                let pos = start + k;
                (pos < *end).then_some(pos)
            }
            Self::Object(positions) => positions.get(k).map(|&pos| pos as usize),
            Self::Predicate(bitmap) => bitmap.select(k as u32).map(|pos| pos as usize),
        }
    }
}

/// Native cursor over a [`TripleTable`] search.
///
/// Keeps one result of lookahead so `has_next` needs no mutation.
pub struct MemoryTripleIterator<'a> {
    table: &'a TripleTable,
    path: AccessPath<'a>,
    pattern: IdPattern,
    filtered: bool,
    /// Next path entry to inspect.
    cursor: usize,
    pending: Option<TripleId>,
}

impl<'a> MemoryTripleIterator<'a> {
    fn new(table: &'a TripleTable, path: AccessPath<'a>, pattern: IdPattern, filtered: bool) -> Self {
        let mut it = Self {
            table,
            path,
            pattern,
            filtered,
            cursor: 0,
            pending: None,
        };
        it.fill();
        it
    }

    pub fn pattern(&self) -> IdPattern {
        self.pattern
    }

    fn entry(&self, k: usize) -> Option<TripleId> {
        self.path
            .position(k)
            .and_then(|pos| self.table.spo.get(pos).copied())
    }

    fn fill(&mut self) {
        self.pending = None;
        let len = self.path.len();
        while self.cursor < len {
            let k = self.cursor;
            self.cursor += 1;
            let Some(triple) = self.entry(k) else {
                continue;
            };
            if !self.filtered || self.pattern.matches(&triple) {
                self.pending = Some(triple);
                return;
            }
        }
    }
}

impl NativeTripleIterator for MemoryTripleIterator<'_> {
    fn has_next(&self) -> bool {
        self.pending.is_some()
    }

    fn next_triple(&mut self) -> Option<TripleId> {
        let triple = self.pending.take()?;
        self.fill();
        Some(triple)
    }

    fn skip(&mut self, n: usize) {
        if n == 0 || self.pending.is_none() {
            return;
        }
        if self.filtered {
            for _ in 0..n {
                if self.next_triple().is_none() {
                    break;
                }
            }
            return;
        }
        // `pending` sits at entry `cursor - 1`.
        self.cursor = (self.cursor - 1).saturating_add(n).min(self.path.len());
        self.fill();
    }

    fn estimated_num_results(&self) -> usize {
        self.path.len()
    }

    fn count_exact(&self) -> usize {
        if !self.filtered {
            return self.path.len();
        }
        (0..self.path.len())
            .filter_map(|k| self.entry(k))
            .filter(|t| self.pattern.matches(t))
            .count()
    }
}
