//! Offset skipping over native search cursors.
//!
//! Native cursors can only jump cheaply within their estimated result
//! count. Estimates on compressed indexes may undercount, so an offset at or
//! past the estimate jumps to the last estimated position and walks the rest.
//! Very large offsets over badly undercounted patterns degrade to a linear
//! scan.

use hdtq_index::NativeTripleIterator;

/// Advance `it` so that its next result is the one at index `offset`.
pub fn apply_offset<I>(it: &mut I, offset: usize, estimated: usize)
where
    I: NativeTripleIterator + ?Sized,
{
    if offset == 0 {
        return;
    }
    if offset < estimated {
        it.skip(offset);
        return;
    }

    let mut remaining = offset;
    if estimated > 0 {
        it.skip(estimated - 1);
        remaining = offset - estimated + 1;
    }
    tracing::debug!(
        offset,
        estimated,
        remaining,
        "offset reaches past the estimate, skipping the rest one by one"
    );
    while remaining > 0 && it.has_next() {
        it.next_triple();
        remaining -= 1;
    }
}
