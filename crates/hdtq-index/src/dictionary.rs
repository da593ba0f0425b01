//! Four-section dictionary.
//!
//! Terms are split into sections so that subject and object identifiers can
//! share a common prefix:
//!
//! | section    | subject ids            | object ids             |
//! |------------|------------------------|------------------------|
//! | shared     | `1..=S`                | `1..=S`                |
//! | subjects   | `S+1..=S+subjects`     | -                      |
//! | objects    | -                      | `S+1..=S+objects`      |
//!
//! Predicates live in their own space `1..=predicates`. Every section is
//! sorted, so lookups are binary searches.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{Dictionary, Id, TriplePosition, WILDCARD};

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct SectionDictionary {
    shared: Vec<String>,
    subjects: Vec<String>,
    predicates: Vec<String>,
    objects: Vec<String>,
}

impl SectionDictionary {
    /// Split the distinct terms of each position into sections.
    pub fn from_terms(
        subjects: BTreeSet<String>,
        predicates: BTreeSet<String>,
        objects: BTreeSet<String>,
    ) -> Self {
        let shared: Vec<String> = subjects.intersection(&objects).cloned().collect();
        let subjects_only: Vec<String> = subjects.difference(&objects).cloned().collect();
        let objects_only: Vec<String> = objects.difference(&subjects).cloned().collect();

        Self {
            shared,
            subjects: subjects_only,
            predicates: predicates.into_iter().collect(),
            objects: objects_only,
        }
    }

    pub fn shared_len(&self) -> usize {
        self.shared.len()
    }

    pub fn subjects_len(&self) -> usize {
        self.shared.len() + self.subjects.len()
    }

    pub fn predicates_len(&self) -> usize {
        self.predicates.len()
    }

    pub fn objects_len(&self) -> usize {
        self.shared.len() + self.objects.len()
    }

    /// The position-specific section that follows the shared one.
    fn own_section(&self, position: TriplePosition) -> &[String] {
        match position {
            TriplePosition::Subject => &self.subjects,
            TriplePosition::Object => &self.objects,
            TriplePosition::Predicate => &self.predicates,
        }
    }

    fn locate(section: &[String], term: &str) -> Option<usize> {
        section
            .binary_search_by(|probe| probe.as_str().cmp(term))
            .ok()
    }
}

impl Dictionary for SectionDictionary {
    fn id_of(&self, term: &str, position: TriplePosition) -> Id {
        if term.is_empty() {
            return WILDCARD;
        }

        if position == TriplePosition::Predicate {
            return Self::locate(&self.predicates, term)
                .map(|i| (i + 1) as Id)
                .unwrap_or(WILDCARD);
        }

        if let Some(i) = Self::locate(&self.shared, term) {
            return (i + 1) as Id;
        }
        Self::locate(self.own_section(position), term)
            .map(|i| (self.shared.len() + i + 1) as Id)
            .unwrap_or(WILDCARD)
    }

    fn term_of(&self, id: Id, position: TriplePosition) -> Option<String> {
        if id == WILDCARD {
            return None;
        }
        let index = id as usize - 1;

        if position == TriplePosition::Predicate {
            return self.predicates.get(index).cloned();
        }

        if index < self.shared.len() {
            return self.shared.get(index).cloned();
        }
        self.own_section(position)
            .get(index - self.shared.len())
            .cloned()
    }
}
