//! Send API wire shapes.
//!
//! Pure builders from domain messages to the JSON envelopes the delivery
//! channel accepts. Everything here is data construction; no I/O.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::reply::{ButtonAction, Card, CardButton, ReplyMessage};

/// Media kinds the channel accepts as URL attachments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Audio,
    Video,
    File,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Audio => "audio",
            MediaKind::Video => "video",
            MediaKind::File => "file",
        }
    }
}

/// Conversation indicators sent outside of a message body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SenderAction {
    TypingOn,
    TypingOff,
    MarkSeen,
}

impl SenderAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            SenderAction::TypingOn => "typing_on",
            SenderAction::TypingOff => "typing_off",
            SenderAction::MarkSeen => "mark_seen",
        }
    }
}

pub fn text_message(recipient_id: &str, text: &str) -> Value {
    json!({
        "recipient": { "id": recipient_id },
        "message": { "text": text }
    })
}

pub fn media_message(recipient_id: &str, kind: MediaKind, url: &str) -> Value {
    json!({
        "recipient": { "id": recipient_id },
        "message": {
            "attachment": {
                "type": kind.as_str(),
                "payload": { "url": url }
            }
        }
    })
}

pub fn image_message(recipient_id: &str, url: &str) -> Value {
    media_message(recipient_id, MediaKind::Image, url)
}

pub fn quick_replies_message(recipient_id: &str, title: &str, replies: &[String]) -> Value {
    let replies: Vec<Value> = replies
        .iter()
        .map(|reply| {
            json!({
                "content_type": "text",
                "title": reply,
                "payload": reply
            })
        })
        .collect();
    json!({
        "recipient": { "id": recipient_id },
        "message": {
            "text": title,
            "quick_replies": replies
        }
    })
}

pub fn button_template(recipient_id: &str, text: &str, buttons: &[CardButton]) -> Value {
    json!({
        "recipient": { "id": recipient_id },
        "message": {
            "attachment": {
                "type": "template",
                "payload": {
                    "template_type": "button",
                    "text": text,
                    "buttons": buttons.iter().map(button_value).collect::<Vec<_>>()
                }
            }
        }
    })
}

/// Carousel of cards; the channel requires all elements in a single call.
pub fn generic_template(recipient_id: &str, cards: &[Card]) -> Value {
    json!({
        "recipient": { "id": recipient_id },
        "message": {
            "attachment": {
                "type": "template",
                "payload": {
                    "template_type": "generic",
                    "elements": cards.iter().map(card_element).collect::<Vec<_>>()
                }
            }
        }
    })
}

/// Order receipt passed through to the receipt template.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Receipt {
    pub recipient_name: String,
    pub order_number: String,
    pub currency: String,
    pub payment_method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub elements: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Value>,
    #[serde(default)]
    pub summary: Value,
    #[serde(default)]
    pub adjustments: Vec<Value>,
}

pub fn receipt_template(recipient_id: &str, receipt: &Receipt) -> Value {
    let mut payload = json!({
        "template_type": "receipt",
        "recipient_name": receipt.recipient_name,
        "order_number": receipt.order_number,
        "currency": receipt.currency,
        "payment_method": receipt.payment_method,
        "elements": receipt.elements,
        "summary": receipt.summary,
        "adjustments": receipt.adjustments,
    });
    if let Some(obj) = payload.as_object_mut() {
        if let Some(timestamp) = &receipt.timestamp {
            obj.insert("timestamp".into(), json!(timestamp));
        }
        if let Some(address) = &receipt.address {
            obj.insert("address".into(), address.clone());
        }
    }
    json!({
        "recipient": { "id": recipient_id },
        "message": {
            "attachment": { "type": "template", "payload": payload }
        }
    })
}

pub fn sender_action(recipient_id: &str, action: SenderAction) -> Value {
    json!({
        "recipient": { "id": recipient_id },
        "sender_action": action.as_str()
    })
}

/// Button template carrying the account-linking call to action.
pub fn account_link_prompt(recipient_id: &str, text: &str, auth_url: &str) -> Value {
    json!({
        "recipient": { "id": recipient_id },
        "message": {
            "attachment": {
                "type": "template",
                "payload": {
                    "template_type": "button",
                    "text": text,
                    "buttons": [{ "type": "account_link", "url": auth_url }]
                }
            }
        }
    })
}

/// Renders a single domain reply. A lone card goes out as a one-element
/// carousel, matching how the channel displays it.
pub fn reply_envelope(recipient_id: &str, message: &ReplyMessage) -> Value {
    match message {
        ReplyMessage::Text { text } => text_message(recipient_id, text),
        ReplyMessage::QuickReplies { title, replies } => {
            quick_replies_message(recipient_id, title, replies)
        }
        ReplyMessage::Image { url } => image_message(recipient_id, url),
        ReplyMessage::Card(card) => generic_template(recipient_id, std::slice::from_ref(card)),
    }
}

fn card_element(card: &Card) -> Value {
    let mut element = json!({
        "title": card.title,
        "buttons": card.buttons.iter().map(button_value).collect::<Vec<_>>()
    });
    if let Some(obj) = element.as_object_mut() {
        if let Some(image_url) = &card.image_url {
            obj.insert("image_url".into(), json!(image_url));
        }
        if let Some(subtitle) = &card.subtitle {
            obj.insert("subtitle".into(), json!(subtitle));
        }
    }
    element
}

fn button_value(button: &CardButton) -> Value {
    match &button.action {
        ButtonAction::OpenUrl { url } => json!({
            "type": "web_url",
            "title": button.title,
            "url": url
        }),
        ButtonAction::Call { call } => json!({
            "type": "phone_number",
            "title": button.title,
            "payload": call
        }),
        ButtonAction::Postback { payload } => json!({
            "type": "postback",
            "title": button.title,
            "payload": payload
        }),
    }
}
