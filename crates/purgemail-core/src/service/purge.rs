//! Confirmation-gated purge of one category.

use std::num::NonZeroUsize;

use tracing::info;

use super::batch::{MAX_BATCH_DELETE, chunk};
use super::delete::delete_all;
use super::list::{DEFAULT_PAGE_SIZE, list_all};
use super::MailApi;
use crate::category::Category;
use crate::error::Result;

/// Asks the user before anything irreversible happens.
pub trait Confirm {
    /// Whether to look up every message in `category`.
    fn confirm_purge(&mut self, category: Category) -> bool;

    /// Whether to permanently delete the `count` messages found.
    fn confirm_delete(&mut self, category: Category, count: usize) -> bool;
}

/// Tunables for a purge run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurgeOptions {
    /// Mailbox owner; `"me"` is the authenticated user.
    pub user_id: String,
    /// Listing page size.
    pub page_size: u32,
    /// Most IDs per delete call.
    pub chunk_size: NonZeroUsize,
    /// Stop after listing.
    pub dry_run: bool,
}

impl Default for PurgeOptions {
    fn default() -> Self {
        Self {
            user_id: "me".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            chunk_size: MAX_BATCH_DELETE,
            dry_run: false,
        }
    }
}

/// Which confirmation was declined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortStage {
    /// The user declined before listing.
    BeforeListing,
    /// The user declined after seeing the message count.
    BeforeDeletion,
}

/// How a purge run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurgeOutcome {
    /// The user said no.
    Aborted(AbortStage),
    /// The category holds no messages.
    Empty,
    /// Dry run; this many messages would have been deleted.
    DryRun(usize),
    /// This many messages were deleted.
    Deleted(usize),
}

/// Lists every message in `category` and deletes them in batches, asking
/// `confirm` before listing and again before deleting.
///
/// # Errors
///
/// Returns [`Error::Listing`](crate::Error::Listing) if listing fails (nothing
/// is deleted) or [`Error::Deletion`](crate::Error::Deletion) if a delete call
/// fails.
pub async fn purge<A, C>(
    api: &A,
    category: Category,
    confirm: &mut C,
    options: &PurgeOptions,
) -> Result<PurgeOutcome>
where
    A: MailApi + ?Sized,
    C: Confirm + ?Sized,
{
    if !confirm.confirm_purge(category) {
        return Ok(PurgeOutcome::Aborted(AbortStage::BeforeListing));
    }

    let ids = list_all(api, &category.query(), options.page_size).await?;
    if ids.is_empty() {
        info!("No messages in {category}");
        return Ok(PurgeOutcome::Empty);
    }
    if options.dry_run {
        return Ok(PurgeOutcome::DryRun(ids.len()));
    }

    if !confirm.confirm_delete(category, ids.len()) {
        return Ok(PurgeOutcome::Aborted(AbortStage::BeforeDeletion));
    }

    let chunks = chunk(&ids, options.chunk_size);
    let deleted = delete_all(api, &options.user_id, &chunks).await?;
    Ok(PurgeOutcome::Deleted(deleted))
}
