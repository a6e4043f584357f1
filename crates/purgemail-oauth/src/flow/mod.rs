//! `OAuth2` authorization-code client.

mod code;

pub use code::AuthorizationCodeFlow;

use crate::error::Result;
use crate::provider::Provider;
use crate::token::{ErrorResponse, Token, TokenResponse};
use reqwest::Client;
use std::collections::HashMap;
use url::Url;

/// Operations the authorization driver and the session need from a token
/// endpoint.
///
/// [`AuthorizationCodeFlow`] talks to a real provider; tests substitute
/// their own implementation.
#[allow(async_fn_in_trait)]
pub trait TokenEndpoint {
    /// Builds the consent URL the user's browser is sent to.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be constructed.
    fn authorization_url(&self, redirect_uri: &str, state: &str) -> Result<Url>;

    /// Exchanges an authorization code for a credential.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint rejects the code or cannot be reached.
    async fn exchange_code(&self, code: &str, redirect_uri: &str) -> Result<Token>;

    /// Mints a new access token from the refresh token in `token`.
    ///
    /// # Errors
    ///
    /// Returns an error if the refresh fails or `token` has no refresh token.
    async fn refresh(&self, token: &Token) -> Result<Token>;
}

/// Common `OAuth2` client configuration.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    /// Client ID from provider.
    pub client_id: String,
    /// Client secret (optional for public clients).
    pub client_secret: Option<String>,
    /// Provider configuration.
    pub provider: Provider,
    /// HTTP client.
    http_client: Client,
}

impl OAuthClient {
    /// Creates a new OAuth client.
    #[must_use]
    pub fn new(client_id: impl Into<String>, provider: Provider) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: None,
            provider,
            http_client: Client::new(),
        }
    }

    /// Sets the client secret.
    #[must_use]
    pub fn with_client_secret(mut self, secret: impl Into<String>) -> Self {
        self.client_secret = Some(secret.into());
        self
    }

    /// Refreshes an access token using a refresh token.
    ///
    /// # Errors
    ///
    /// Returns an error if the refresh fails or if the token has no refresh token.
    pub async fn refresh_token(&self, token: &Token) -> Result<Token> {
        let refresh_token = token.refresh_token()?;

        let mut params = HashMap::new();
        params.insert("grant_type", "refresh_token");
        params.insert("refresh_token", refresh_token);
        params.insert("client_id", &self.client_id);

        if let Some(secret) = &self.client_secret {
            params.insert("client_secret", secret);
        }

        let mut new_token = self.post_token_request(&params).await?;

        // Google only returns a refresh token on the first exchange
        if new_token.refresh_token.is_none() {
            new_token.refresh_token.clone_from(&token.refresh_token);
        }

        Ok(new_token)
    }

    /// Exchanges an authorization code for tokens.
    ///
    /// # Errors
    ///
    /// Returns an error if the exchange fails.
    pub(crate) async fn exchange_code(&self, code: &str, redirect_uri: &str) -> Result<Token> {
        let mut params = HashMap::new();
        params.insert("grant_type", "authorization_code");
        params.insert("code", code);
        params.insert("client_id", &self.client_id);
        params.insert("redirect_uri", redirect_uri);

        if let Some(secret) = &self.client_secret {
            params.insert("client_secret", secret);
        }

        self.post_token_request(&params).await
    }

    async fn post_token_request(&self, params: &HashMap<&str, &str>) -> Result<Token> {
        let response = self
            .http_client
            .post(self.provider.token_url.clone())
            .form(params)
            .send()
            .await?;

        if !response.status().is_success() {
            let error: ErrorResponse = response.json().await?;
            return Err(error.into_error());
        }

        let token_response: TokenResponse = response.json().await?;
        Ok(Token::from_response(token_response))
    }
}
