//! NLU result model and reply routing.
//!
//! Shapes follow the intent service's v2 REST responses: camelCase JSON and
//! plain-object context parameters. [`route_reply`] decides the reply path;
//! order matters there, a classified action wins over structured messages,
//! which win over plain fulfillment text.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::reply::{Card, CardButton, ReplyMessage};

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryResult {
    pub query_text: String,
    pub action: String,
    pub parameters: Map<String, Value>,
    pub fulfillment_text: String,
    pub fulfillment_messages: Vec<FulfillmentMessage>,
    pub output_contexts: Vec<OutputContext>,
    pub language_code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OutputContext {
    pub name: String,
    pub lifespan_count: i64,
    pub parameters: Map<String, Value>,
}

impl OutputContext {
    /// Returns a non-empty string parameter, if present.
    pub fn string_param(&self, key: &str) -> Option<&str> {
        self.parameters
            .get(key)
            .and_then(Value::as_str)
            .filter(|value| !value.is_empty())
    }
}

/// One structured fulfillment message; exactly one block is populated.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FulfillmentMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<TextBlock>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quick_replies: Option<QuickRepliesBlock>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageBlock>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<CardBlock>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TextBlock {
    pub text: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuickRepliesBlock {
    pub title: String,
    pub quick_replies: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageBlock {
    pub image_uri: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CardBlock {
    pub title: String,
    pub image_uri: String,
    pub subtitle: String,
    pub buttons: Vec<CardButtonBlock>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CardButtonBlock {
    pub text: String,
    pub postback: String,
}

/// Converts structured fulfillment messages into domain replies, dropping
/// empty text lines and imageless image blocks.
pub fn to_replies(messages: &[FulfillmentMessage]) -> Vec<ReplyMessage> {
    let mut out = Vec::new();
    for message in messages {
        if let Some(card) = &message.card {
            out.push(ReplyMessage::Card(Card {
                title: card.title.clone(),
                image_url: (!card.image_uri.is_empty()).then(|| card.image_uri.clone()),
                subtitle: (!card.subtitle.is_empty()).then(|| card.subtitle.clone()),
                buttons: card
                    .buttons
                    .iter()
                    .map(|button| CardButton::from_nlu(&button.text, &button.postback))
                    .collect(),
            }));
        } else if let Some(quick) = &message.quick_replies {
            out.push(ReplyMessage::QuickReplies {
                title: quick.title.clone(),
                replies: quick.quick_replies.clone(),
            });
        } else if let Some(image) = &message.image {
            if !image.image_uri.is_empty() {
                out.push(ReplyMessage::Image {
                    url: image.image_uri.clone(),
                });
            }
        } else if let Some(text) = &message.text {
            for line in &text.text {
                if !line.is_empty() {
                    out.push(ReplyMessage::text(line));
                }
            }
        }
    }
    out
}

/// Reply path for an interpreted result.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyRoute {
    /// A classified action; the dispatcher decides what to do with it.
    Action(String),
    /// Structured messages, paced by the delivery plan.
    Messages(Vec<ReplyMessage>),
    /// The service could not evaluate the input.
    Clarify,
    /// Plain fulfillment text, sent verbatim.
    Text(String),
}

pub fn route_reply(result: &QueryResult) -> ReplyRoute {
    if !result.action.is_empty() {
        return ReplyRoute::Action(result.action.clone());
    }
    let replies = to_replies(&result.fulfillment_messages);
    if !replies.is_empty() {
        return ReplyRoute::Messages(replies);
    }
    if result.fulfillment_text.is_empty() {
        return ReplyRoute::Clarify;
    }
    ReplyRoute::Text(result.fulfillment_text.clone())
}
