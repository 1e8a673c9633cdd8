//! Seams for the external collaborators: the delivery channel, the NLU
//! service, and the notification mailer. The gateway wires HTTP
//! implementations over these; tests substitute in-memory fakes.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::nlu::QueryResult;

#[derive(Debug, Error)]
pub enum SendError {
    /// Non-success response; carries the status and raw error body for logs.
    #[error("{context} returned status {status}: {body}")]
    Status {
        context: &'static str,
        status: u16,
        body: String,
    },
    #[error("{context} transport failure: {source}")]
    Transport {
        context: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl SendError {
    pub fn transport(
        context: &'static str,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Transport {
            context,
            source: Box::new(source),
        }
    }
}

/// Delivery confirmation returned by the Send API.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SendResponse {
    #[serde(default)]
    pub recipient_id: Option<String>,
    #[serde(default)]
    pub message_id: Option<String>,
}

/// Public profile fields used by the greeting flow.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UserProfile {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub profile_pic: Option<String>,
}

/// Outbound messaging surface of the platform.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Sends one envelope; the JSON already names its recipient.
    async fn send(&self, envelope: Value) -> Result<SendResponse, SendError>;

    async fn profile(&self, user_id: &str) -> Result<UserProfile, SendError>;
}

pub type SharedChannel = Arc<dyn Channel>;

/// The third-party NLU service.
#[async_trait]
pub trait IntentResolver: Send + Sync {
    async fn detect_intent(&self, session_id: &str, text: &str) -> anyhow::Result<QueryResult>;
}

pub type SharedIntentResolver = Arc<dyn IntentResolver>;

/// Transactional notification mail.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, subject: &str, html_body: &str) -> Result<(), SendError>;
}

pub type SharedNotifier = Arc<dyn Notifier>;
