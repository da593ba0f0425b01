use std::path::PathBuf;

use hdtq_index::{Id, TriplePosition};

/// Failures surfaced by the query layer.
///
/// A bound term that is missing from the dictionary is *not* an error: it
/// produces an empty iterator.
#[derive(Debug, thiserror::Error)]
pub enum HdtError {
    #[error("cannot open store '{}': not found", .path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to load store '{}': {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    /// `next` was called after the source ran dry or the limit was reached.
    #[error("iterator exhausted after {results_read} results")]
    Exhausted { results_read: usize },

    /// A result identifier has no term in the live dictionary.
    #[error("{position} id {id} does not resolve in the dictionary")]
    DictionaryLookup { id: Id, position: TriplePosition },

    #[error("invalid join pattern: {0}")]
    InvalidPattern(String),
}

pub type Result<T, E = HdtError> = std::result::Result<T, E>;
