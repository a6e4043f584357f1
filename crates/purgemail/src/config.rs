//! Turns command-line arguments into library configuration.

use std::fs;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use purgemail_core::PurgeOptions;
use purgemail_oauth::{AuthorizationCodeFlow, ClientSecret, LoopbackConfig, OAuthClient};
use tracing::debug;

use crate::cli::Cli;

/// Reads the client secret file.
pub fn load_client_secret(path: &Path) -> Result<ClientSecret> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Unable to read client secret file {}", path.display()))?;
    let secret = ClientSecret::from_json(&json)
        .with_context(|| format!("Unable to parse client secret file {}", path.display()))?;

    debug!("Loaded client secret for {}", secret.client_id);
    Ok(secret)
}

/// Builds the authorization flow for `secret`.
pub fn authorization_flow(secret: &ClientSecret) -> Result<AuthorizationCodeFlow> {
    let provider = secret
        .provider()
        .context("Client secret file has an invalid endpoint")?;

    let mut client = OAuthClient::new(&secret.client_id, provider);
    if let Some(client_secret) = &secret.client_secret {
        client = client.with_client_secret(client_secret);
    }

    Ok(AuthorizationCodeFlow::new(client))
}

/// Listener settings: loopback on `--port`, optional redirect timeout.
pub fn loopback_config(cli: &Cli) -> LoopbackConfig {
    LoopbackConfig {
        addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), cli.port),
        redirect_timeout: cli.redirect_timeout.map(Duration::from_secs),
        ..LoopbackConfig::default()
    }
}

/// Purge tunables from the listing, batching and dry-run flags.
pub fn purge_options(cli: &Cli) -> PurgeOptions {
    PurgeOptions {
        page_size: cli.page_size,
        chunk_size: cli.chunk_size,
        dry_run: cli.dry_run,
        ..PurgeOptions::default()
    }
}
