//! # purgemail-core
//!
//! Core logic for purging a Gmail inbox category.
//!
//! This crate provides:
//! - **Gmail client** - `users.messages.list` and `users.messages.batchDelete`
//!   over an authenticated session
//! - **Paginated listing** - every message ID matching a query
//! - **Batching** - delete-sized chunks of IDs
//! - **Bulk deletion** - sequential, stop-on-first-failure
//! - **Purge pipeline** - confirmation-gated list-then-delete of one category

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod category;
mod error;
pub mod gmail;
pub mod service;

pub use category::{Category, UnknownCategory};
pub use error::{ApiError, Error, Result};
pub use gmail::{GMAIL_API_BASE, GmailClient};
pub use service::{
    AbortStage, Confirm, DEFAULT_PAGE_SIZE, MAX_BATCH_DELETE, MailApi, MessageId, MessagePage,
    PurgeOptions, PurgeOutcome, chunk, delete_all, list_all, purge,
};
