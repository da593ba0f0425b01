use serde::{Deserialize, Serialize};

/// Query-layer settings, fixed for the lifetime of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Leading character that marks a term as a named variable.
    pub variable_sigil: char,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            variable_sigil: '?',
        }
    }
}
