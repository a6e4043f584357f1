//! Purge services.
//!
//! This module holds the pieces of a purge run, leaf first: the batcher,
//! the paginated lister, the bulk deleter and the confirmation-gated
//! pipeline that strings them together. All remote work goes through the
//! [`MailApi`] trait.

pub mod batch;
pub mod delete;
pub mod list;
pub mod purge;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

pub use batch::{MAX_BATCH_DELETE, chunk};
pub use delete::delete_all;
pub use list::{DEFAULT_PAGE_SIZE, list_all};
pub use purge::{AbortStage, Confirm, PurgeOptions, PurgeOutcome, purge};

/// Opaque identifier of one message in the user's mailbox.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub String);

impl MessageId {
    /// Creates a message ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One page of a message listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessagePage {
    /// Messages on this page.
    pub ids: Vec<MessageId>,
    /// Cursor for the next page; `None` or empty when this is the last one.
    pub next_page_token: Option<String>,
}

/// The two remote operations a purge needs.
#[allow(async_fn_in_trait)]
pub trait MailApi {
    /// Lists one page of messages matching `query`.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    async fn list_messages(
        &self,
        query: &str,
        max_results: u32,
        page_token: Option<&str>,
    ) -> Result<MessagePage, ApiError>;

    /// Permanently deletes `ids` from the mailbox of `user_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails. No per-message outcome is
    /// reported.
    async fn batch_delete(&self, user_id: &str, ids: &[MessageId]) -> Result<(), ApiError>;
}
