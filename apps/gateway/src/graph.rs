//! Send API client.
//!
//! One POST per envelope against `{base}/me/messages` with the page access
//! token. Failures carry the status and raw error body; callers log and
//! drop them (no retry).

use async_trait::async_trait;
use chatbridge_core::{Channel, SendError, SendResponse, UserProfile};
use serde_json::Value;
use tracing::debug;

pub struct GraphChannel {
    http: reqwest::Client,
    api_base: String,
    page_access_token: String,
}

impl GraphChannel {
    pub fn new(
        http: reqwest::Client,
        api_base: impl Into<String>,
        page_access_token: impl Into<String>,
    ) -> Self {
        Self {
            http,
            api_base: api_base.into(),
            page_access_token: page_access_token.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl Channel for GraphChannel {
    async fn send(&self, envelope: Value) -> Result<SendResponse, SendError> {
        let response = self
            .http
            .post(self.url("me/messages"))
            .query(&[("access_token", self.page_access_token.as_str())])
            .json(&envelope)
            .send()
            .await
            .map_err(|err| SendError::transport("send_api", err))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| SendError::transport("send_api", err))?;
        if !status.is_success() {
            return Err(SendError::Status {
                context: "send_api",
                status: status.as_u16(),
                body,
            });
        }

        let confirmation: SendResponse = serde_json::from_str(&body).unwrap_or_default();
        match &confirmation.message_id {
            Some(message_id) => debug!(message_id = %message_id, "message accepted"),
            None => debug!("send API call accepted"),
        }
        Ok(confirmation)
    }

    async fn profile(&self, user_id: &str) -> Result<UserProfile, SendError> {
        let response = self
            .http
            .get(self.url(user_id))
            .query(&[
                ("access_token", self.page_access_token.as_str()),
                ("fields", "first_name,last_name,profile_pic"),
            ])
            .send()
            .await
            .map_err(|err| SendError::transport("profile", err))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| SendError::transport("profile", err))?;
        if !status.is_success() {
            return Err(SendError::Status {
                context: "profile",
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|err| SendError::transport("profile", err))
    }
}
