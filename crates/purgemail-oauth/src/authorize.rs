//! Interactive authorization driver.
//!
//! [`authorize`] returns a session straight from the token store when a
//! usable credential is cached. Otherwise it binds the loopback listener,
//! sends the user's browser to the consent page, waits for the redirect,
//! exchanges the code, stops the listener and persists the new credential.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use tracing::{debug, info, warn};
use url::Url;

use crate::error::{Error, Result};
use crate::flow::TokenEndpoint;
use crate::listener::RedirectListener;
use crate::session::{AuthenticatedSession, SharedTokenStore};
use crate::token::Token;

/// Default port for the redirect listener.
pub const DEFAULT_REDIRECT_PORT: u16 = 8080;

/// Default anti-replay state value sent with the authorization request.
pub const DEFAULT_STATE: &str = "state-token";

/// Where the redirect listener binds and what it expects.
#[derive(Debug, Clone)]
pub struct LoopbackConfig {
    /// Address the listener binds.
    pub addr: SocketAddr,
    /// The single path the listener serves.
    pub path: String,
    /// State value sent to and expected back from the provider.
    pub state: String,
    /// How long to wait for the redirect; `None` waits forever.
    pub redirect_timeout: Option<Duration>,
}

impl Default for LoopbackConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), DEFAULT_REDIRECT_PORT),
            path: "/".to_string(),
            state: DEFAULT_STATE.to_string(),
            redirect_timeout: None,
        }
    }
}

/// Opens URLs for the user.
pub trait BrowserLauncher {
    /// Opens `url` in a browser.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Browser`] if no browser could be launched.
    fn open(&self, url: &Url) -> Result<()>;
}

/// Launches the platform's default browser.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBrowser;

impl BrowserLauncher for SystemBrowser {
    fn open(&self, url: &Url) -> Result<()> {
        opener::open_browser(url.as_str()).map_err(|e| Error::Browser(e.to_string()))
    }
}

/// Progress of one authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    /// Nothing usable is cached.
    NoCredential,
    /// The consent page has been opened.
    AwaitingUserConsent,
    /// Waiting for the provider to redirect back.
    AwaitingRedirect,
    /// Trading the code for a credential.
    Exchanging,
    /// A credential is in hand.
    Authenticated,
}

impl fmt::Display for AuthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NoCredential => "no credential",
            Self::AwaitingUserConsent => "awaiting user consent",
            Self::AwaitingRedirect => "awaiting redirect",
            Self::Exchanging => "exchanging code",
            Self::Authenticated => "authenticated",
        };
        f.write_str(name)
    }
}

fn enter(state: &mut AuthState, next: AuthState) {
    debug!("Authorization: {state} -> {next}");
    *state = next;
}

/// Produces an authenticated session, running the browser flow if needed.
///
/// # Errors
///
/// Returns an error if the listener cannot bind, the browser cannot be
/// opened, the redirect carries an error, the wait times out, the code
/// exchange fails or the new credential cannot be saved.
pub async fn authorize<E, B>(
    endpoint: E,
    store: SharedTokenStore,
    browser: &B,
    config: &LoopbackConfig,
) -> Result<AuthenticatedSession<E>>
where
    E: TokenEndpoint,
    B: BrowserLauncher + ?Sized,
{
    let mut state = AuthState::NoCredential;

    match store.load() {
        Some(token) if token.is_usable() => {
            enter(&mut state, AuthState::Authenticated);
            info!("Using cached credential");
            return Ok(AuthenticatedSession::new(endpoint, token).with_store(store));
        }
        Some(_) => warn!("Cached credential is expired and cannot be refreshed"),
        None => debug!("No cached credential"),
    }

    let token = authorize_interactively(&endpoint, browser, config, &mut state).await?;
    store.save(&token)?;
    enter(&mut state, AuthState::Authenticated);

    Ok(AuthenticatedSession::new(endpoint, token).with_store(store))
}

async fn authorize_interactively<E, B>(
    endpoint: &E,
    browser: &B,
    config: &LoopbackConfig,
    state: &mut AuthState,
) -> Result<Token>
where
    E: TokenEndpoint,
    B: BrowserLauncher + ?Sized,
{
    // The listener must be up before the browser can possibly redirect to it
    let mut listener =
        RedirectListener::bind(config.addr, &config.path, Some(config.state.clone())).await?;
    let redirect_uri = listener.redirect_uri();

    let outcome = async {
        let auth_url = endpoint.authorization_url(&redirect_uri, &config.state)?;
        info!("Opening browser for authorization: {auth_url}");
        browser.open(&auth_url)?;
        enter(state, AuthState::AwaitingUserConsent);

        enter(state, AuthState::AwaitingRedirect);
        let code = listener.wait_for_code(config.redirect_timeout).await?;

        enter(state, AuthState::Exchanging);
        endpoint.exchange_code(&code, &redirect_uri).await
    }
    .await;

    let stopped = listener.shutdown().await;
    let token = outcome?;
    stopped?;

    info!("Authorization successful");
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoopbackConfig::default();
        assert_eq!(config.addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.path, "/");
        assert_eq!(config.state, "state-token");
        assert!(config.redirect_timeout.is_none());
    }

    #[test]
    fn test_state_display() {
        assert_eq!(AuthState::AwaitingRedirect.to_string(), "awaiting redirect");
    }
}
