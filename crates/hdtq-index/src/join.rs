//! Nested-loop join over triple patterns.
//!
//! Patterns are evaluated left to right. Each open pattern holds a native
//! search cursor; a match extends the bindings inherited from the patterns
//! before it, and the next pattern is searched with those bindings
//! substituted. Evaluation is lazy: one binding is produced per pull.

use std::collections::BTreeSet;

use crate::{
    Bindings, Dictionary, EmptyTripleIterator, IdPattern, JoinPattern, JoinTerm, MemoryIndex,
    NativeBindingStream, NativeTripleIterator, TripleId, TripleIndex, TriplePosition, WILDCARD,
};

struct Frame<'a> {
    cursor: Box<dyn NativeTripleIterator + 'a>,
    /// Bindings in force when this pattern was opened.
    inherited: Bindings,
}

pub struct NestedLoopJoin<'a> {
    index: &'a MemoryIndex,
    patterns: Vec<JoinPattern>,
    variables: BTreeSet<String>,
    frames: Vec<Frame<'a>>,
    pending: Option<Bindings>,
}

impl<'a> NestedLoopJoin<'a> {
    pub fn new(
        index: &'a MemoryIndex,
        patterns: &[JoinPattern],
        variables: &BTreeSet<String>,
    ) -> Self {
        let mut join = Self {
            index,
            patterns: patterns.to_vec(),
            variables: variables.clone(),
            frames: Vec::new(),
            pending: None,
        };
        if !join.patterns.is_empty() {
            let root = join.open(0, Bindings::new());
            join.frames.push(root);
            join.advance();
        }
        join
    }

    /// Search pattern `depth` with `inherited` substituted.
    fn open(&self, depth: usize, inherited: Bindings) -> Frame<'a> {
        let pattern = &self.patterns[depth];
        let mut ids = IdPattern::default();

        for position in TriplePosition::ALL {
            let term = match pattern.get(position) {
                JoinTerm::Wildcard => None,
                JoinTerm::Constant(value) => Some(value.as_str()),
                JoinTerm::Variable(name) => inherited.get(name).map(String::as_str),
            };
            let Some(term) = term else {
                continue;
            };
            let id = self.index.id_of(term, position);
            if id == WILDCARD {
                // The term never occurs in this position.
                return Frame {
                    cursor: Box::new(EmptyTripleIterator),
                    inherited,
                };
            }
            ids.set(position, id);
        }

        let index: &'a MemoryIndex = self.index;
        Frame {
            cursor: index.search(ids),
            inherited,
        }
    }

    /// Bindings of `inherited` extended with the variables `triple` binds,
    /// or `None` when a repeated variable would bind two different terms.
    fn extend(&self, depth: usize, inherited: &Bindings, triple: TripleId) -> Option<Bindings> {
        let pattern = &self.patterns[depth];
        let mut out = inherited.clone();

        for position in TriplePosition::ALL {
            let Some(name) = pattern.get(position).variable_name() else {
                continue;
            };
            let id = triple.get(position);
            let Some(value) = self.index.term_of(id, position) else {
                tracing::warn!(
                    id,
                    position = %position,
                    "join result references an identifier missing from the dictionary"
                );
                return None;
            };
            match out.get(name) {
                Some(existing) if *existing != value => return None,
                Some(_) => {}
                None => {
                    out.insert(name.to_string(), value);
                }
            }
        }
        Some(out)
    }

    fn project(&self, bindings: Bindings) -> Bindings {
        bindings
            .into_iter()
            .filter(|(name, _)| self.variables.contains(name))
            .collect()
    }

    fn advance(&mut self) {
        self.pending = None;
        loop {
            let depth = self.frames.len();
            let Some(frame) = self.frames.last_mut() else {
                return;
            };
            let pulled = frame
                .cursor
                .next_triple()
                .map(|triple| (triple, frame.inherited.clone()));
            let Some((triple, inherited)) = pulled else {
                self.frames.pop();
                continue;
            };
            let Some(bindings) = self.extend(depth - 1, &inherited, triple) else {
                continue;
            };

            if depth == self.patterns.len() {
                self.pending = Some(self.project(bindings));
                return;
            }
            let next = self.open(depth, bindings);
            self.frames.push(next);
        }
    }
}

impl NativeBindingStream for NestedLoopJoin<'_> {
    fn has_next(&self) -> bool {
        self.pending.is_some()
    }

    fn next_binding(&mut self) -> Option<Bindings> {
        let bindings = self.pending.take()?;
        self.advance();
        Some(bindings)
    }
}
