//! Command-line arguments.

use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::Parser;
use purgemail_core::{Category, DEFAULT_PAGE_SIZE, MAX_BATCH_DELETE};
use purgemail_oauth::authorize::DEFAULT_REDIRECT_PORT;
use purgemail_oauth::store::DEFAULT_TOKEN_PATH;

/// Largest page Gmail will return from `users.messages.list`.
const MAX_PAGE_SIZE: u32 = 500;

#[derive(Parser, Debug)]
#[command(name = "purgemail")]
#[command(about = "Permanently delete every Gmail message in an inbox category")]
#[command(version)]
pub struct Cli {
    /// OAuth client secret file from the Google Cloud console
    #[arg(long, env = "PURGEMAIL_CREDENTIALS", default_value = "credentials.json")]
    pub credentials: PathBuf,

    /// Where the authorized credential is cached between runs
    #[arg(long, env = "PURGEMAIL_TOKEN", default_value = DEFAULT_TOKEN_PATH)]
    pub token: PathBuf,

    /// Local port that receives the browser redirect
    #[arg(long, env = "PURGEMAIL_PORT", default_value_t = DEFAULT_REDIRECT_PORT)]
    pub port: u16,

    /// Give up waiting for the browser redirect after this many seconds
    #[arg(long, value_name = "SECS")]
    pub redirect_timeout: Option<u64>,

    /// Category to purge, by name or menu number (asks if omitted)
    #[arg(long, short)]
    pub category: Option<Category>,

    /// Message IDs requested per listing page
    #[arg(
        long,
        default_value_t = DEFAULT_PAGE_SIZE,
        value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_PAGE_SIZE))
    )]
    pub page_size: u32,

    /// Message IDs sent per delete call
    #[arg(long, default_value_t = MAX_BATCH_DELETE, value_parser = parse_chunk_size)]
    pub chunk_size: NonZeroUsize,

    /// List and count the messages but delete nothing
    #[arg(long)]
    pub dry_run: bool,
}

fn parse_chunk_size(s: &str) -> Result<NonZeroUsize, String> {
    let size: NonZeroUsize = s.parse().map_err(|e| format!("{e}"))?;
    if size > MAX_BATCH_DELETE {
        return Err(format!("at most {MAX_BATCH_DELETE} IDs fit in one delete call"));
    }
    Ok(size)
}
