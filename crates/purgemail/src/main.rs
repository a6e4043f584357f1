//! `purgemail` - permanently delete every message in a Gmail inbox category.
//!
//! Authorizes against Google with a loopback `OAuth2` redirect, lists the
//! category and deletes it in batches after two confirmations.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod cli;
mod config;
mod prompt;

use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use purgemail_core::{GmailClient, PurgeOutcome, purge};
use purgemail_oauth::{FileTokenStore, SystemBrowser, authorize};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::Cli;
use prompt::Terminal;

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr so they never land inside a prompt.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "purgemail=info,purgemail_core=info,purgemail_oauth=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", failure_message(&e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let secret = config::load_client_secret(&cli.credentials)?;
    let flow = config::authorization_flow(&secret)?;
    let store = Arc::new(FileTokenStore::new(&cli.token));

    let session = authorize(flow, store, &SystemBrowser, &config::loopback_config(&cli))
        .await
        .map_err(purgemail_core::Error::Authorization)?;
    let client = GmailClient::new(session)?;

    let mut terminal = Terminal::new(io::stdin().lock(), io::stdout());
    let category = match cli.category {
        Some(category) => category,
        None => terminal.choose_category()?,
    };

    info!("Purging {category}");
    let outcome = purge(&client, category, &mut terminal, &config::purge_options(&cli)).await?;

    match outcome {
        PurgeOutcome::Aborted(stage) => {
            info!("Declined {stage:?}");
            terminal.say("Exiting...")?;
        }
        PurgeOutcome::Empty => terminal.say(&format!("No messages in {category}"))?,
        PurgeOutcome::DryRun(count) => {
            terminal.say(&format!("Dry run: {count} messages would be deleted"))?;
        }
        PurgeOutcome::Deleted(count) => terminal.say(&format!("Deleted {count} messages"))?,
    }

    Ok(())
}

/// One line naming the failed stage and every cause below it.
fn failure_message(err: &anyhow::Error) -> String {
    format!("Error: {err:#}")
}
