//! JSON request and response types for the HTTP and websocket surfaces.

use msgrelay_core::{Message, MessageId};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Health status.
    pub status: String,
    /// Gateway version.
    pub version: String,
}

/// Body accepted by the structured query endpoint.
#[derive(Debug, Deserialize)]
#[serde(tag = "query", rename_all = "snake_case")]
pub enum QueryRequest {
    /// Fetch the full message collection.
    Messages,
}

/// Structured query response.
#[derive(Debug, Serialize)]
pub struct QueryResponse {
    /// Success flag.
    pub success: bool,
    /// The messages, in insertion order.
    pub data: Vec<Message>,
    /// Metadata about the query.
    pub meta: QueryMeta,
}

/// Query metadata.
#[derive(Debug, Serialize)]
pub struct QueryMeta {
    /// Total messages returned.
    pub total_messages: usize,
}

/// Body accepted by the structured mutation endpoint.
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum MutationRequest {
    /// Append a new message.
    AddMessage {
        content: String,
        #[serde(default)]
        word: Option<String>,
    },
    /// Merge fields into an existing message.
    UpdateMessage {
        id: MessageId,
        #[serde(default)]
        content: Option<String>,
        #[serde(default)]
        word: Option<String>,
    },
}

/// Structured mutation response.
#[derive(Debug, Serialize)]
pub struct MutationResponse {
    /// Success flag.
    pub success: bool,
    /// The created or updated message.
    pub data: Message,
}

/// REST create body. `content` is validated by the handler so a missing
/// field produces the surface's own error shape rather than a decode
/// rejection.
#[derive(Debug, Deserialize)]
pub struct CreateMessageBody {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub word: Option<String>,
}

/// REST update body.
#[derive(Debug, Deserialize)]
pub struct UpdateMessageBody {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub word: Option<String>,
}

/// First frame a websocket client sends to pick its event stream.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "topic", rename_all = "snake_case")]
pub enum SubscribeRequest {
    /// Every create, unfiltered.
    MessageAdded,
    /// Updates to one message.
    MessageUpdated { id: IdArg },
}

/// Message id argument that also accepts its decimal-string spelling.
///
/// Subscription arguments arrive from clients that may quote ids; the
/// comparison against `Message::id` is numeric, so normalize here and
/// reject anything non-numeric instead of silently matching nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdArg(pub MessageId);

impl<'de> Deserialize<'de> for IdArg {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(MessageId),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(id) => Ok(IdArg(id)),
            Raw::Text(text) => text
                .trim()
                .parse()
                .map(IdArg)
                .map_err(|_| de::Error::custom(format!("invalid message id: {:?}", text))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_request_parses() {
        let request: QueryRequest = serde_json::from_str(r#"{"query":"messages"}"#).unwrap();
        assert!(matches!(request, QueryRequest::Messages));
    }

    #[test]
    fn test_unknown_query_is_rejected() {
        assert!(serde_json::from_str::<QueryRequest>(r#"{"query":"users"}"#).is_err());
    }

    #[test]
    fn test_mutation_request_word_defaults_to_none() {
        let request: MutationRequest =
            serde_json::from_str(r#"{"op":"add_message","content":"hi"}"#).unwrap();
        match request {
            MutationRequest::AddMessage { content, word } => {
                assert_eq!(content, "hi");
                assert_eq!(word, None);
            }
            other => panic!("unexpected request: {:?}", other),
        }
    }

    #[test]
    fn test_subscribe_message_added() {
        let request: SubscribeRequest =
            serde_json::from_str(r#"{"topic":"message_added"}"#).unwrap();
        assert_eq!(request, SubscribeRequest::MessageAdded);
    }

    #[test]
    fn test_subscribe_id_accepts_number_and_string() {
        let request: SubscribeRequest =
            serde_json::from_str(r#"{"topic":"message_updated","id":5}"#).unwrap();
        assert_eq!(request, SubscribeRequest::MessageUpdated { id: IdArg(5) });

        let request: SubscribeRequest =
            serde_json::from_str(r#"{"topic":"message_updated","id":"5"}"#).unwrap();
        assert_eq!(request, SubscribeRequest::MessageUpdated { id: IdArg(5) });
    }

    #[test]
    fn test_subscribe_rejects_non_numeric_id() {
        assert!(
            serde_json::from_str::<SubscribeRequest>(r#"{"topic":"message_updated","id":"five"}"#)
                .is_err()
        );
    }

    #[test]
    fn test_subscribe_update_requires_id() {
        assert!(serde_json::from_str::<SubscribeRequest>(r#"{"topic":"message_updated"}"#).is_err());
    }
}
