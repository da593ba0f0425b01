use std::collections::BTreeSet;

use hdtq_index::{Bindings, NativeBindingStream};

use crate::error::{HdtError, Result};

/// Iterator over the variable bindings of a multi-pattern join.
///
/// No limit/offset window applies here; callers window the stream
/// themselves.
pub struct JoinIterator<'a> {
    native: Box<dyn NativeBindingStream + 'a>,
    variables: BTreeSet<String>,
    results_read: usize,
}

impl<'a> JoinIterator<'a> {
    pub(crate) fn new(
        native: Box<dyn NativeBindingStream + 'a>,
        variables: BTreeSet<String>,
    ) -> Self {
        Self {
            native,
            variables,
            results_read: 0,
        }
    }

    /// Distinct variables across all joined patterns.
    pub fn variables(&self) -> &BTreeSet<String> {
        &self.variables
    }

    pub fn results_read(&self) -> usize {
        self.results_read
    }

    pub fn has_next(&self) -> bool {
        self.native.has_next()
    }

    pub fn next_binding(&mut self) -> Result<Bindings> {
        let bindings = self.native.next_binding().ok_or(HdtError::Exhausted {
            results_read: self.results_read,
        })?;
        self.results_read += 1;
        Ok(bindings)
    }
}

impl Iterator for JoinIterator<'_> {
    type Item = Bindings;

    fn next(&mut self) -> Option<Bindings> {
        self.next_binding().ok()
    }
}

impl Drop for JoinIterator<'_> {
    fn drop(&mut self) {
        tracing::trace!(
            results_read = self.results_read,
            "releasing native join stream"
        );
    }
}
