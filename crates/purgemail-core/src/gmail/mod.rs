//! Gmail REST API access.

pub mod api;
mod client;

pub use client::{GMAIL_API_BASE, GmailClient};
