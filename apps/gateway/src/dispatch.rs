//! Intent action dispatch: a catalog lookup plus effect execution.
//!
//! Catalog carousels and button templates bypass the fulfillment messages
//! entirely; the proposal email entry fires its notification and then
//! delivers the fulfillment messages either way. Anything not in the
//! catalog falls through to sequenced delivery.

use std::sync::Arc;

use chatbridge_core::{
    ActionEntry, OutputContext, ProposalEmailSpec, QueryResult, render, to_replies,
};
use tracing::{debug, warn};

use crate::{http::AppState, router::send_envelope, sequencer::deliver_sequenced};

pub async fn dispatch_action(
    state: &Arc<AppState>,
    sender: &str,
    action: &str,
    result: &QueryResult,
) {
    match state.catalog.action(action) {
        Some(ActionEntry::Cards { cards }) => {
            send_envelope(state, render::generic_template(sender, cards)).await;
        }
        Some(ActionEntry::Buttons { text, buttons }) => {
            send_envelope(state, render::button_template(sender, text, buttons)).await;
        }
        Some(ActionEntry::ProposalEmail { proposal_email }) => {
            match proposal_email_content(proposal_email, &result.output_contexts) {
                Some((subject, body)) => {
                    if let Err(err) = state.notifier.notify(&subject, &body).await {
                        warn!(action, error = %err, "proposal notification failed");
                    }
                }
                None => debug!(action, "proposal context incomplete; skipping email"),
            }
            deliver_sequenced(
                state.channel.clone(),
                sender,
                to_replies(&result.fulfillment_messages),
            );
        }
        None => {
            debug!(action, "action not in catalog; delivering fulfillment messages");
            deliver_sequenced(
                state.channel.clone(),
                sender,
                to_replies(&result.fulfillment_messages),
            );
        }
    }
}

/// The most recent output context must match one of the configured name
/// patterns and carry a non-empty user and package name; otherwise the
/// email is skipped.
pub fn proposal_email_content(
    spec: &ProposalEmailSpec,
    contexts: &[OutputContext],
) -> Option<(String, String)> {
    let latest = contexts.first()?;
    if !spec
        .contexts
        .iter()
        .any(|pattern| latest.name.contains(pattern.as_str()))
    {
        return None;
    }
    let user_name = latest.string_param("user_name")?;
    let package_name = latest.string_param("package_name")?;
    let body = format!("A new proposal from {user_name} for the company: {package_name}.");
    Some((spec.subject.clone(), body))
}
