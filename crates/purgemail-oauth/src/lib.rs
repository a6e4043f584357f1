//! # purgemail-oauth
//!
//! `OAuth2` authorization for purgemail.
//!
//! ## Features
//!
//! - **Authorization code flow** with a loopback redirect listener
//! - **Token management**: expiry checking, automatic refresh
//! - **Credential storage**: JSON token file compatible with Go `oauth2` records
//! - **Client secrets**: Google Cloud console `credentials.json` parsing
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use purgemail_oauth::{
//!     authorize, AuthorizationCodeFlow, ClientSecret, FileTokenStore, LoopbackConfig,
//!     OAuthClient, SystemBrowser,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let secret = ClientSecret::from_json(&std::fs::read_to_string("credentials.json")?)?;
//!     let mut client = OAuthClient::new(&secret.client_id, secret.provider()?);
//!     if let Some(s) = &secret.client_secret {
//!         client = client.with_client_secret(s);
//!     }
//!
//!     let session = authorize(
//!         AuthorizationCodeFlow::new(client),
//!         Arc::new(FileTokenStore::default()),
//!         &SystemBrowser,
//!         &LoopbackConfig::default(),
//!     )
//!     .await?;
//!
//!     println!("Authorization: {}", session.authorization_header().await?);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod authorize;
mod error;
pub mod flow;
pub mod listener;
pub mod provider;
pub mod session;
pub mod store;
pub mod token;

pub use authorize::{AuthState, BrowserLauncher, LoopbackConfig, SystemBrowser, authorize};
pub use error::{Error, Result};
pub use flow::{AuthorizationCodeFlow, OAuthClient, TokenEndpoint};
pub use listener::RedirectListener;
pub use provider::{ClientSecret, Provider};
pub use session::{AuthenticatedSession, SharedTokenStore};
pub use store::{FileTokenStore, TokenStore};
pub use token::Token;
