//! Bulk deletion.

use tracing::{info, warn};

use super::{MailApi, MessageId};
use crate::error::{Error, Result};

/// Deletes every chunk in order, one `batchDelete` call per chunk, and
/// returns the number of messages deleted.
///
/// # Errors
///
/// Returns [`Error::Deletion`] on the first failed call. Later chunks are not
/// attempted and earlier ones are not restored; the error records how far
/// the run got.
pub async fn delete_all<A>(api: &A, user_id: &str, chunks: &[&[MessageId]]) -> Result<usize>
where
    A: MailApi + ?Sized,
{
    let total: usize = chunks.iter().map(|c| c.len()).sum();
    let mut deleted = 0;

    for (index, ids) in chunks.iter().enumerate() {
        if let Err(source) = api.batch_delete(user_id, ids).await {
            warn!(
                "Chunk {} of {} failed, {deleted} of {total} messages already deleted",
                index + 1,
                chunks.len()
            );
            return Err(Error::Deletion {
                deleted,
                total,
                chunks_done: index,
                chunks_total: chunks.len(),
                source,
            });
        }

        deleted += ids.len();
        info!(
            "Deleted chunk {} of {} ({deleted}/{total} messages)",
            index + 1,
            chunks.len()
        );
    }

    Ok(deleted)
}
