//! Inbound webhook event model.
//!
//! Mirrors the page-subscription payload the platform POSTs to the webhook:
//! a batch of page entries, each carrying a batch of messaging events. One
//! event holds exactly one kind-specific payload; [`MessagingEvent::classify`]
//! resolves it in the platform's documented precedence order.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct WebhookBatch {
    pub object: String,
    #[serde(default)]
    pub entry: Vec<PageEntry>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PageEntry {
    pub id: String,
    #[serde(default)]
    pub time: i64,
    #[serde(default)]
    pub messaging: Vec<MessagingEvent>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Party {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MessagingEvent {
    pub sender: Party,
    pub recipient: Party,
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optin: Option<Optin>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<InboundMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery: Option<DeliveryReceipt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postback: Option<Postback>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read: Option<ReadReceipt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_linking: Option<AccountLinking>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Optin {
    #[serde(default, rename = "ref")]
    pub data_ref: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct InboundMessage {
    #[serde(default)]
    pub mid: Option<String>,
    #[serde(default)]
    pub is_echo: bool,
    #[serde(default)]
    pub app_id: Option<i64>,
    #[serde(default)]
    pub metadata: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub quick_reply: Option<QuickReplyPayload>,
    #[serde(default)]
    pub attachments: Option<Vec<Attachment>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct QuickReplyPayload {
    pub payload: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Attachment {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub payload: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct DeliveryReceipt {
    #[serde(default)]
    pub mids: Vec<String>,
    #[serde(default)]
    pub watermark: i64,
    #[serde(default)]
    pub seq: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Postback {
    pub payload: String,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ReadReceipt {
    #[serde(default)]
    pub watermark: i64,
    #[serde(default)]
    pub seq: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AccountLinking {
    pub status: String,
    #[serde(default)]
    pub authorization_code: Option<String>,
}

/// Event kind resolved from the first populated payload.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind<'a> {
    Optin(&'a Optin),
    Message(&'a InboundMessage),
    Delivery(&'a DeliveryReceipt),
    Postback(&'a Postback),
    Read(&'a ReadReceipt),
    AccountLink(&'a AccountLinking),
    Unknown,
}

impl MessagingEvent {
    /// First-match classification; kinds are mutually exclusive on the wire.
    pub fn classify(&self) -> EventKind<'_> {
        if let Some(optin) = &self.optin {
            EventKind::Optin(optin)
        } else if let Some(message) = &self.message {
            EventKind::Message(message)
        } else if let Some(delivery) = &self.delivery {
            EventKind::Delivery(delivery)
        } else if let Some(postback) = &self.postback {
            EventKind::Postback(postback)
        } else if let Some(read) = &self.read {
            EventKind::Read(read)
        } else if let Some(link) = &self.account_linking {
            EventKind::AccountLink(link)
        } else {
            EventKind::Unknown
        }
    }
}

/// What a message event actually carries. A message holds exactly one of
/// quick reply, text, or attachments; echoes of our own sends win over all.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageContent<'a> {
    Echo,
    QuickReply(&'a str),
    Text(&'a str),
    Attachments,
    Empty,
}

impl InboundMessage {
    pub fn content(&self) -> MessageContent<'_> {
        if self.is_echo {
            return MessageContent::Echo;
        }
        if let Some(quick) = &self.quick_reply {
            return MessageContent::QuickReply(&quick.payload);
        }
        if let Some(text) = &self.text {
            if !text.is_empty() {
                return MessageContent::Text(text);
            }
        }
        if self.attachments.as_ref().is_some_and(|a| !a.is_empty()) {
            return MessageContent::Attachments;
        }
        MessageContent::Empty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_event() -> MessagingEvent {
        MessagingEvent {
            sender: Party { id: "user-1".into() },
            recipient: Party { id: "page-1".into() },
            timestamp: 1_700_000_000_000,
            optin: None,
            message: None,
            delivery: None,
            postback: None,
            read: None,
            account_linking: None,
        }
    }

    #[test]
    fn classify_prefers_optin_over_message() {
        let mut event = base_event();
        event.optin = Some(Optin {
            data_ref: Some("welcome".into()),
        });
        event.message = Some(InboundMessage {
            text: Some("hello".into()),
            ..Default::default()
        });
        assert!(matches!(event.classify(), EventKind::Optin(_)));
    }

    #[test]
    fn classify_falls_back_to_unknown() {
        assert_eq!(base_event().classify(), EventKind::Unknown);
    }

    #[test]
    fn echo_wins_over_text() {
        let message = InboundMessage {
            is_echo: true,
            text: Some("our own send".into()),
            ..Default::default()
        };
        assert_eq!(message.content(), MessageContent::Echo);
    }

    #[test]
    fn quick_reply_wins_over_text() {
        let message = InboundMessage {
            text: Some("Basic".into()),
            quick_reply: Some(QuickReplyPayload {
                payload: "BASICPKG".into(),
            }),
            ..Default::default()
        };
        assert_eq!(message.content(), MessageContent::QuickReply("BASICPKG"));
    }

    #[test]
    fn attachment_only_is_attachments() {
        let message = InboundMessage {
            attachments: Some(vec![Attachment {
                kind: "image".into(),
                payload: None,
            }]),
            ..Default::default()
        };
        assert_eq!(message.content(), MessageContent::Attachments);
    }

    #[test]
    fn empty_message_is_empty() {
        let message = InboundMessage {
            attachments: Some(Vec::new()),
            ..Default::default()
        };
        assert_eq!(message.content(), MessageContent::Empty);
    }

    #[test]
    fn batch_deserializes_platform_payload() {
        let raw = serde_json::json!({
            "object": "page",
            "entry": [{
                "id": "page-1",
                "time": 1_700_000_000_000i64,
                "messaging": [{
                    "sender": { "id": "user-1" },
                    "recipient": { "id": "page-1" },
                    "timestamp": 1_700_000_000_000i64,
                    "message": { "mid": "m-1", "text": "Hi" }
                }]
            }]
        });
        let batch: WebhookBatch = serde_json::from_value(raw).expect("batch");
        assert_eq!(batch.object, "page");
        let event = &batch.entry[0].messaging[0];
        assert_eq!(event.sender.id, "user-1");
        let EventKind::Message(message) = event.classify() else {
            panic!("expected message event");
        };
        assert_eq!(message.content(), MessageContent::Text("Hi"));
    }
}
