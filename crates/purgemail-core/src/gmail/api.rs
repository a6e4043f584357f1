//! Gmail REST API payloads.

use serde::{Deserialize, Serialize};

use crate::service::{MessageId, MessagePage};

/// Reference to a message as returned by `users.messages.list`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRef {
    /// Message ID.
    pub id: MessageId,
    /// Thread the message belongs to.
    #[serde(default)]
    pub thread_id: Option<String>,
}

/// Response of `users.messages.list`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMessagesResponse {
    /// Messages on this page; absent when nothing matched.
    #[serde(default)]
    pub messages: Vec<MessageRef>,
    /// Cursor for the next page.
    #[serde(default)]
    pub next_page_token: Option<String>,
    /// Estimated total number of results.
    #[serde(default)]
    pub result_size_estimate: Option<u32>,
}

impl From<ListMessagesResponse> for MessagePage {
    fn from(response: ListMessagesResponse) -> Self {
        Self {
            ids: response.messages.into_iter().map(|m| m.id).collect(),
            next_page_token: response.next_page_token,
        }
    }
}

/// Body of `users.messages.batchDelete`.
#[derive(Debug, Serialize)]
pub struct BatchDeleteRequest<'a> {
    /// IDs to delete.
    pub ids: &'a [MessageId],
}

/// Google API error envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}

impl ErrorBody {
    pub(crate) fn describe(self) -> String {
        match self.status {
            Some(status) if !status.is_empty() => format!("{status}: {}", self.message),
            _ => self.message,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_list_response_with_cursor() {
        let json = r#"{
            "messages": [
                {"id": "18c1", "threadId": "18c1"},
                {"id": "18c2", "threadId": "18c0"}
            ],
            "nextPageToken": "09876",
            "resultSizeEstimate": 201
        }"#;

        let response: ListMessagesResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.result_size_estimate, Some(201));
        assert_eq!(response.messages[1].thread_id.as_deref(), Some("18c0"));

        let page = MessagePage::from(response);
        assert_eq!(page.ids, vec![MessageId::new("18c1"), MessageId::new("18c2")]);
        assert_eq!(page.next_page_token.as_deref(), Some("09876"));
    }

    #[test]
    fn test_empty_list_response() {
        let response: ListMessagesResponse =
            serde_json::from_str(r#"{"resultSizeEstimate": 0}"#).unwrap();
        let page = MessagePage::from(response);
        assert!(page.ids.is_empty());
        assert!(page.next_page_token.is_none());
    }

    #[test]
    fn test_batch_delete_body() {
        let ids = [MessageId::new("a"), MessageId::new("b")];
        let body = serde_json::to_string(&BatchDeleteRequest { ids: &ids }).unwrap();
        assert_eq!(body, r#"{"ids":["a","b"]}"#);
    }

    #[test]
    fn test_error_envelope() {
        let json = r#"{"error":{"code":403,"message":"Insufficient Permission","status":"PERMISSION_DENIED"}}"#;
        let envelope: ErrorEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(
            envelope.error.describe(),
            "PERMISSION_DENIED: Insufficient Permission"
        );
    }
}
