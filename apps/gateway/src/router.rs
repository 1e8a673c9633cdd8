//! Inbound event routing.
//!
//! Walks a webhook batch and acts on each messaging event: messages and
//! postbacks feed the NLU pipeline, receipts and link events are logged,
//! opt-ins get a fixed confirmation. Outbound failures are logged and
//! dropped; the conversation simply receives no reply.

use std::sync::Arc;

use chatbridge_core::{
    ATTACHMENT_ACK_TEXT, AUTH_CONFIRMED_TEXT, CLARIFICATION_TEXT, EventKind, InboundMessage,
    MessageContent, MessagingEvent, Postback, QueryResult, ReplyRoute,
    render::{self, SenderAction},
    route_reply,
};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{dispatch::dispatch_action, http::AppState, sequencer::deliver_sequenced};

pub async fn process_batch(state: Arc<AppState>, batch: chatbridge_core::WebhookBatch) {
    for entry in batch.entry {
        for event in entry.messaging {
            route_event(&state, &event).await;
        }
    }
}

pub async fn route_event(state: &Arc<AppState>, event: &MessagingEvent) {
    let sender = event.sender.id.as_str();
    match event.classify() {
        EventKind::Optin(optin) => {
            info!(
                sender,
                data_ref = optin.data_ref.as_deref().unwrap_or_default(),
                "opt-in received"
            );
            send_text(state, sender, AUTH_CONFIRMED_TEXT).await;
        }
        EventKind::Message(message) => handle_message(state, sender, message).await,
        EventKind::Delivery(receipt) => {
            for mid in &receipt.mids {
                debug!(sender, mid = %mid, "delivery confirmed");
            }
            info!(sender, watermark = receipt.watermark, "messages delivered");
        }
        EventKind::Postback(postback) => handle_postback(state, sender, postback).await,
        EventKind::Read(read) => {
            info!(sender, watermark = read.watermark, "messages read");
        }
        EventKind::AccountLink(link) => {
            info!(sender, status = %link.status, "account link event");
        }
        EventKind::Unknown => warn!(sender, "unrecognized webhook event"),
    }
}

async fn handle_message(state: &Arc<AppState>, sender: &str, message: &InboundMessage) {
    match message.content() {
        MessageContent::Echo => {
            debug!(
                sender,
                mid = message.mid.as_deref().unwrap_or_default(),
                app_id = message.app_id.unwrap_or_default(),
                "echo of our own send"
            );
        }
        MessageContent::QuickReply(payload) => {
            debug!(sender, payload, "quick reply");
            forward_to_nlu(state, sender, payload).await;
        }
        MessageContent::Text(text) => forward_to_nlu(state, sender, text).await,
        MessageContent::Attachments => send_text(state, sender, ATTACHMENT_ACK_TEXT).await,
        MessageContent::Empty => {
            debug!(sender, "message without text, quick reply, or attachment");
        }
    }
}

async fn handle_postback(state: &Arc<AppState>, sender: &str, postback: &Postback) {
    info!(sender, payload = %postback.payload, "postback received");
    match state.catalog.postback(&postback.payload) {
        Some(entry) => {
            if entry.greet {
                greet(state, sender).await;
            }
            forward_to_nlu(state, sender, &entry.utterance).await;
        }
        None => {
            warn!(sender, payload = %postback.payload, "unmapped postback payload");
            send_text(state, sender, CLARIFICATION_TEXT).await;
        }
    }
}

/// Greeting flow: look up the sender's profile and welcome them by name
/// before the canned utterance goes out to the NLU service.
async fn greet(state: &Arc<AppState>, sender: &str) {
    match state.channel.profile(sender).await {
        Ok(profile) => match profile.first_name {
            Some(first_name) => {
                let welcome = format!(
                    "Welcome {first_name}! Ask me about our services any time, \
                     or type 'Hi' to start over."
                );
                send_text(state, sender, &welcome).await;
            }
            None => info!(sender, "profile lookup returned no name"),
        },
        Err(err) => warn!(sender, error = %err, "profile lookup failed"),
    }
}

async fn forward_to_nlu(state: &Arc<AppState>, sender: &str, text: &str) {
    let session = state.sessions.get_or_create(sender).await;
    send_envelope(state, render::sender_action(sender, SenderAction::TypingOn)).await;

    match state.nlu.detect_intent(session.as_str(), text).await {
        Ok(result) => handle_nlu_result(state, sender, result).await,
        // No retry and no reply; logged and dropped.
        Err(err) => warn!(sender, error = %err, "intent detection failed; no reply sent"),
    }
}

async fn handle_nlu_result(state: &Arc<AppState>, sender: &str, result: QueryResult) {
    send_envelope(state, render::sender_action(sender, SenderAction::TypingOff)).await;

    match route_reply(&result) {
        ReplyRoute::Action(action) => dispatch_action(state, sender, &action, &result).await,
        ReplyRoute::Messages(messages) => {
            deliver_sequenced(state.channel.clone(), sender, messages);
        }
        ReplyRoute::Clarify => send_text(state, sender, CLARIFICATION_TEXT).await,
        ReplyRoute::Text(text) => send_text(state, sender, &text).await,
    }
}

pub(crate) async fn send_text(state: &Arc<AppState>, sender: &str, text: &str) {
    send_envelope(state, render::text_message(sender, text)).await;
}

pub(crate) async fn send_envelope(state: &Arc<AppState>, envelope: Value) {
    if let Err(err) = state.channel.send(envelope).await {
        warn!(error = %err, "send failed");
    }
}
