//! Gmail API HTTP client.
//!
//! Each call is made once; failures are returned to the caller untouched.

use purgemail_oauth::{AuthenticatedSession, AuthorizationCodeFlow, TokenEndpoint};
use reqwest::{Client, Response, header::AUTHORIZATION};
use tracing::debug;
use url::Url;

use super::api::{BatchDeleteRequest, ErrorEnvelope, ListMessagesResponse};
use crate::error::ApiError;
use crate::service::{MailApi, MessageId, MessagePage};

/// Gmail API base URL.
pub const GMAIL_API_BASE: &str = "https://gmail.googleapis.com/gmail/v1/";

/// [`MailApi`] backed by the Gmail REST API.
#[derive(Debug)]
pub struct GmailClient<E = AuthorizationCodeFlow> {
    http: Client,
    session: AuthenticatedSession<E>,
    base_url: Url,
}

impl<E: TokenEndpoint> GmailClient<E> {
    /// Creates a client for the public Gmail API.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot be parsed.
    pub fn new(session: AuthenticatedSession<E>) -> Result<Self, ApiError> {
        Ok(Self {
            http: Client::new(),
            session,
            base_url: Url::parse(GMAIL_API_BASE)?,
        })
    }

    /// Points the client at another API root.
    #[must_use]
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    /// Sends requests through `http` instead of a default client.
    #[must_use]
    pub fn with_http_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    /// Returns the session used to authorize calls.
    pub const fn session(&self) -> &AuthenticatedSession<E> {
        &self.session
    }

    fn messages_url(&self, user_id: &str, action: Option<&str>) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?;
            segments.pop_if_empty().extend(["users", user_id, "messages"]);
            if let Some(action) = action {
                segments.push(action);
            }
        }
        Ok(url)
    }

    fn list_url(
        &self,
        query: &str,
        max_results: u32,
        page_token: Option<&str>,
    ) -> Result<Url, ApiError> {
        let mut url = self.messages_url("me", None)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("q", query)
                .append_pair("maxResults", &max_results.to_string());
            if let Some(token) = page_token {
                pairs.append_pair("pageToken", token);
            }
        }
        Ok(url)
    }
}

impl<E: TokenEndpoint> MailApi for GmailClient<E> {
    async fn list_messages(
        &self,
        query: &str,
        max_results: u32,
        page_token: Option<&str>,
    ) -> Result<MessagePage, ApiError> {
        let url = self.list_url(query, max_results, page_token)?;
        let authorization = self.session.authorization_header().await?;

        debug!("Listing messages: {url}");
        let response = self
            .http
            .get(url)
            .header(AUTHORIZATION, authorization)
            .send()
            .await?;

        let list: ListMessagesResponse = check_status(response).await?.json().await?;
        Ok(list.into())
    }

    async fn batch_delete(&self, user_id: &str, ids: &[MessageId]) -> Result<(), ApiError> {
        let url = self.messages_url(user_id, Some("batchDelete"))?;
        let authorization = self.session.authorization_header().await?;

        debug!("Deleting {} messages", ids.len());
        let response = self
            .http
            .post(url)
            .header(AUTHORIZATION, authorization)
            .json(&BatchDeleteRequest { ids })
            .send()
            .await?;

        check_status(response).await?;
        Ok(())
    }
}

async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(status_error(status.as_u16(), &body))
}

fn status_error(status: u16, body: &str) -> ApiError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map_or_else(|_| body.trim().to_string(), |envelope| envelope.error.describe());
    ApiError::Status { status, message }
}
