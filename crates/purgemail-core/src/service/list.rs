//! Paginated message listing.

use tracing::{debug, info};

use super::{MailApi, MessageId};
use crate::error::{Error, Result};

/// Largest page the Gmail listing endpoint serves.
pub const DEFAULT_PAGE_SIZE: u32 = 500;

/// Collects the IDs of every message matching `query`, following page
/// cursors until the listing is exhausted.
///
/// # Errors
///
/// Returns [`Error::Listing`] on the first failed call, or
/// [`Error::Authorization`] if the session could not supply a token. IDs
/// gathered from earlier pages are discarded.
pub async fn list_all<A>(api: &A, query: &str, page_size: u32) -> Result<Vec<MessageId>>
where
    A: MailApi + ?Sized,
{
    let mut ids = Vec::new();
    let mut page_token: Option<String> = None;
    let mut pages = 0_usize;

    loop {
        let page = api
            .list_messages(query, page_size, page_token.as_deref())
            .await
            .map_err(Error::listing)?;
        pages += 1;

        ids.extend(page.ids);
        debug!("Listed page {pages} for {query:?}, {} messages so far", ids.len());

        match page.next_page_token.filter(|token| !token.is_empty()) {
            Some(token) => page_token = Some(token),
            None => break,
        }
    }

    info!("Found {} messages matching {query:?} in {pages} pages", ids.len());
    Ok(ids)
}
