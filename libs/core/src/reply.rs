//! Domain-level reply messages.
//!
//! The NLU interpretation step produces these; the delivery plan and the
//! wire renderers consume them. Catalog entries reuse the same types, so the
//! data file and the NLU path share one vocabulary.

use serde::{Deserialize, Serialize};

/// Fixed fallback when the NLU service cannot act on the input or a
/// postback payload is unknown.
pub const CLARIFICATION_TEXT: &str = "I'm not sure what you want. Can you be more specific?";

/// Fixed acknowledgment for attachment-only messages; those skip the NLU path.
pub const ATTACHMENT_ACK_TEXT: &str = "Attachment received. Thank you.";

/// Fixed confirmation sent after an opt-in/authentication event.
pub const AUTH_CONFIRMED_TEXT: &str = "Authentication successful";

/// One reply unit as the conversation logic sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReplyMessage {
    Text { text: String },
    QuickReplies { title: String, replies: Vec<String> },
    Image { url: String },
    Card(Card),
}

impl ReplyMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn is_card(&self) -> bool {
        matches!(self, Self::Card(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<CardButton>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardButton {
    pub title: String,
    #[serde(flatten)]
    pub action: ButtonAction,
}

/// What pressing a button does. The untagged representation keeps catalog
/// entries down to `url:`, `call:`, or `payload:` next to the title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ButtonAction {
    OpenUrl { url: String },
    Call { call: String },
    Postback { payload: String },
}

impl CardButton {
    /// Builds a button from an NLU card button. Payloads that look like a
    /// link become link buttons; everything else is a postback.
    pub fn from_nlu(title: impl Into<String>, postback: impl Into<String>) -> Self {
        let postback = postback.into();
        let action = if postback.starts_with("http") {
            ButtonAction::OpenUrl { url: postback }
        } else {
            ButtonAction::Postback { payload: postback }
        };
        Self {
            title: title.into(),
            action,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nlu_button_with_link_payload_becomes_url_button() {
        let button = CardButton::from_nlu("View", "https://example.com/page");
        assert_eq!(
            button.action,
            ButtonAction::OpenUrl {
                url: "https://example.com/page".into()
            }
        );
    }

    #[test]
    fn nlu_button_with_plain_payload_becomes_postback() {
        let button = CardButton::from_nlu("Details", "BASICPKG");
        assert_eq!(
            button.action,
            ButtonAction::Postback {
                payload: "BASICPKG".into()
            }
        );
    }

    #[test]
    fn button_action_round_trips_untagged() {
        let raw = serde_json::json!({ "title": "Talk To Manager", "call": "+15550100" });
        let button: CardButton = serde_json::from_value(raw).expect("button");
        assert_eq!(
            button.action,
            ButtonAction::Call {
                call: "+15550100".into()
            }
        );
    }

    #[test]
    fn card_reply_tags_as_card() {
        let reply = ReplyMessage::Card(Card {
            title: "Chatbot".into(),
            image_url: None,
            subtitle: None,
            buttons: Vec::new(),
        });
        assert!(reply.is_card());
        let value = serde_json::to_value(&reply).expect("serialize");
        assert_eq!(value["kind"], "card");
        assert_eq!(value["title"], "Chatbot");
    }
}
