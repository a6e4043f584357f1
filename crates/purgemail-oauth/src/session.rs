//! Authenticated session bound to a credential.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::flow::{AuthorizationCodeFlow, TokenEndpoint};
use crate::store::TokenStore;
use crate::token::Token;

/// Shared handle to a credential store.
pub type SharedTokenStore = Arc<dyn TokenStore + Send + Sync>;

/// Hands out access tokens for API calls, refreshing them when they expire.
///
/// A refreshed credential replaces the old one in memory and, when a store
/// is attached, on disk.
pub struct AuthenticatedSession<E = AuthorizationCodeFlow> {
    endpoint: E,
    token: Mutex<Token>,
    store: Option<SharedTokenStore>,
}

impl<E: TokenEndpoint> AuthenticatedSession<E> {
    /// Creates a session from a usable credential.
    #[must_use]
    pub fn new(endpoint: E, token: Token) -> Self {
        Self {
            endpoint,
            token: Mutex::new(token),
            store: None,
        }
    }

    /// Persists refreshed credentials to `store`.
    #[must_use]
    pub fn with_store(mut self, store: SharedTokenStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Returns the `Authorization` header value for the next request.
    ///
    /// # Errors
    ///
    /// Returns an error if the access token expired and could not be refreshed.
    pub async fn authorization_header(&self) -> Result<String> {
        let mut token = self.token.lock().await;

        if !token.is_valid() {
            debug!("Access token expired, refreshing");
            let refreshed = self.endpoint.refresh(&token).await?;
            info!("Refreshed access token");

            if let Some(store) = &self.store
                && let Err(e) = store.save(&refreshed)
            {
                warn!("Failed to persist refreshed credential: {e}");
            }
            *token = refreshed;
        }

        Ok(token.authorization_header())
    }

    /// Returns a copy of the current credential.
    pub async fn token(&self) -> Token {
        self.token.lock().await.clone()
    }

    /// Returns the token endpoint.
    pub const fn endpoint(&self) -> &E {
        &self.endpoint
    }
}

impl<E> std::fmt::Debug for AuthenticatedSession<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticatedSession")
            .field("has_store", &self.store.is_some())
            .finish_non_exhaustive()
    }
}
