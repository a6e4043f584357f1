//! Splitting message IDs into delete-sized batches.

use std::num::NonZeroUsize;

/// Most IDs a single `batchDelete` call accepts.
pub const MAX_BATCH_DELETE: NonZeroUsize = match NonZeroUsize::new(1000) {
    Some(n) => n,
    None => panic!("batch size must be non-zero"),
};

/// Splits `ids` into consecutive chunks of at most `max_size` elements.
///
/// Every chunk but the last holds exactly `max_size` elements and the
/// chunks concatenate back to `ids`. An empty input yields no chunks.
#[must_use]
pub fn chunk<T>(ids: &[T], max_size: NonZeroUsize) -> Vec<&[T]> {
    ids.chunks(max_size.get()).collect()
}
