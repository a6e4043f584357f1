//! `OAuth2` provider configuration and client secret files.

use crate::error::{Error, Result};
use serde::Deserialize;
use url::Url;

/// Full Gmail access, the only scope that permits permanent deletion.
pub const GMAIL_FULL_SCOPE: &str = "https://mail.google.com/";

/// `OAuth2` provider configuration.
#[derive(Debug, Clone)]
pub struct Provider {
    /// Provider name (e.g., "Google").
    pub name: String,
    /// Authorization endpoint URL.
    pub auth_url: Url,
    /// Token endpoint URL.
    pub token_url: Url,
    /// Default scopes.
    pub default_scopes: Vec<String>,
}

impl Provider {
    /// Creates a new provider configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if URLs are invalid.
    pub fn new(
        name: impl Into<String>,
        auth_url: impl AsRef<str>,
        token_url: impl AsRef<str>,
    ) -> Result<Self> {
        Ok(Self {
            name: name.into(),
            auth_url: Url::parse(auth_url.as_ref())?,
            token_url: Url::parse(token_url.as_ref())?,
            default_scopes: Vec::new(),
        })
    }

    /// Sets the default scopes.
    #[must_use]
    pub fn with_default_scopes(mut self, scopes: Vec<String>) -> Self {
        self.default_scopes = scopes;
        self
    }

    /// Google `OAuth2` provider configuration with full Gmail scope.
    ///
    /// # Errors
    ///
    /// Returns an error if URL parsing fails.
    pub fn google() -> Result<Self> {
        Ok(Self::new(
            "Google",
            "https://accounts.google.com/o/oauth2/v2/auth",
            "https://oauth2.googleapis.com/token",
        )?
        .with_default_scopes(vec![GMAIL_FULL_SCOPE.to_string()]))
    }
}

/// Client credentials downloaded from the Google Cloud console.
///
/// The file wraps the fields in either an `installed` (desktop app) or a
/// `web` object.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSecret {
    /// OAuth client ID.
    pub client_id: String,
    /// OAuth client secret.
    #[serde(default)]
    pub client_secret: Option<String>,
    /// Authorization endpoint.
    #[serde(default)]
    pub auth_uri: Option<String>,
    /// Token endpoint.
    #[serde(default)]
    pub token_uri: Option<String>,
}

#[derive(Deserialize)]
struct ClientSecretFile {
    installed: Option<ClientSecret>,
    web: Option<ClientSecret>,
}

impl ClientSecret {
    /// Parses a client secret JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the document is not a client secret
    /// file or carries an empty client id.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: ClientSecretFile = serde_json::from_str(json)
            .map_err(|e| Error::InvalidConfig(format!("unparsable client secret file: {e}")))?;

        let secret = file.installed.or(file.web).ok_or_else(|| {
            Error::InvalidConfig("client secret file has no `installed` or `web` section".into())
        })?;

        if secret.client_id.trim().is_empty() {
            return Err(Error::InvalidConfig("client_id is empty".into()));
        }

        Ok(secret)
    }

    /// Builds the Google provider, honouring endpoint overrides in the file.
    ///
    /// # Errors
    ///
    /// Returns an error if an endpoint URL in the file is invalid.
    pub fn provider(&self) -> Result<Provider> {
        let mut provider = Provider::google()?;
        if let Some(auth_uri) = &self.auth_uri {
            provider.auth_url = Url::parse(auth_uri)?;
        }
        if let Some(token_uri) = &self.token_uri {
            provider.token_url = Url::parse(token_uri)?;
        }
        Ok(provider)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_google_provider() {
        let provider = Provider::google().unwrap();
        assert_eq!(provider.name, "Google");
        assert_eq!(provider.default_scopes, vec![GMAIL_FULL_SCOPE.to_string()]);
    }

    #[test]
    fn test_installed_client_secret() {
        let json = r#"{"installed":{
            "client_id":"123.apps.googleusercontent.com",
            "project_id":"purge",
            "auth_uri":"https://accounts.google.com/o/oauth2/auth",
            "token_uri":"https://oauth2.googleapis.com/token",
            "client_secret":"shh",
            "redirect_uris":["http://localhost"]
        }}"#;

        let secret = ClientSecret::from_json(json).unwrap();
        assert_eq!(secret.client_id, "123.apps.googleusercontent.com");
        assert_eq!(secret.client_secret.as_deref(), Some("shh"));

        let provider = secret.provider().unwrap();
        assert_eq!(
            provider.auth_url.as_str(),
            "https://accounts.google.com/o/oauth2/auth"
        );
    }

    #[test]
    fn test_web_client_secret_without_endpoints() {
        let json = r#"{"web":{"client_id":"abc"}}"#;
        let secret = ClientSecret::from_json(json).unwrap();
        let provider = secret.provider().unwrap();
        assert_eq!(
            provider.token_url.as_str(),
            "https://oauth2.googleapis.com/token"
        );
    }

    #[test]
    fn test_rejects_bad_client_secret() {
        assert!(matches!(
            ClientSecret::from_json("not json"),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            ClientSecret::from_json(r#"{"other":{}}"#),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            ClientSecret::from_json(r#"{"installed":{"client_id":" "}}"#),
            Err(Error::InvalidConfig(_))
        ));
    }
}
