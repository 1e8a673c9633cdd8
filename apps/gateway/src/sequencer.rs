//! Timed delivery of planned reply units.
//!
//! Each unit runs as an independent detached task: it sleeps until its slot,
//! renders, and sends. A failed unit is logged and dropped; it never cancels
//! or delays its siblings, and nothing awaits the tasks (the webhook ack has
//! long since gone out).

use chatbridge_core::{
    DeliveryUnit, ReplyMessage, ScheduledUnit, SharedChannel, plan_delivery, render,
};
use tracing::warn;

pub fn deliver_sequenced(channel: SharedChannel, recipient: &str, messages: Vec<ReplyMessage>) {
    deliver_plan(channel, recipient, plan_delivery(messages));
}

pub fn deliver_plan(channel: SharedChannel, recipient: &str, plan: Vec<ScheduledUnit>) {
    for scheduled in plan {
        let channel = channel.clone();
        let recipient = recipient.to_string();
        tokio::spawn(async move {
            tokio::time::sleep(scheduled.delay).await;
            let envelope = match &scheduled.unit {
                DeliveryUnit::Carousel(cards) => render::generic_template(&recipient, cards),
                DeliveryUnit::Single(message) => render::reply_envelope(&recipient, message),
            };
            if let Err(err) = channel.send(envelope).await {
                warn!(recipient = %recipient, error = %err, "scheduled send failed");
            }
        });
    }
}
