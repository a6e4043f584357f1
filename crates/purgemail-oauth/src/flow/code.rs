//! Authorization Code Flow implementation.

use super::{OAuthClient, TokenEndpoint};
use crate::error::Result;
use crate::token::Token;
use url::Url;

/// Authorization Code Flow for `OAuth2`.
///
/// Suitable for applications that can open a browser and receive the
/// authorization code via redirect.
#[derive(Debug)]
pub struct AuthorizationCodeFlow {
    client: OAuthClient,
    scopes: Option<Vec<String>>,
}

impl AuthorizationCodeFlow {
    /// Creates a new authorization code flow.
    #[must_use]
    pub const fn new(client: OAuthClient) -> Self {
        Self {
            client,
            scopes: None,
        }
    }

    /// Requests `scopes` instead of the provider defaults.
    #[must_use]
    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = Some(scopes);
        self
    }

    /// Returns the underlying client.
    #[must_use]
    pub const fn client(&self) -> &OAuthClient {
        &self.client
    }
}

impl TokenEndpoint for AuthorizationCodeFlow {
    fn authorization_url(&self, redirect_uri: &str, state: &str) -> Result<Url> {
        let mut url = self.client.provider.auth_url.clone();

        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("client_id", &self.client.client_id)
                .append_pair("response_type", "code")
                .append_pair("redirect_uri", redirect_uri);

            let scope_str = self.scopes.as_ref().map_or_else(
                || self.client.provider.default_scopes.join(" "),
                |s| s.join(" "),
            );

            if !scope_str.is_empty() {
                pairs.append_pair("scope", &scope_str);
            }

            pairs
                .append_pair("state", state)
                // Offline access is what makes Google issue a refresh token
                .append_pair("access_type", "offline")
                .append_pair("prompt", "consent");
        }

        Ok(url)
    }

    async fn exchange_code(&self, code: &str, redirect_uri: &str) -> Result<Token> {
        self.client.exchange_code(code, redirect_uri).await
    }

    async fn refresh(&self, token: &Token) -> Result<Token> {
        self.client.refresh_token(token).await
    }
}
