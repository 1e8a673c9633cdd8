//! Transactional mail client (v3 REST).
//!
//! One POST per notification against `{base}/v3/mail/send` with the API key
//! as bearer auth. The caller treats a failure the same way as a failed
//! chat send: log and drop.

use async_trait::async_trait;
use chatbridge_core::{Notifier, SendError};
use serde_json::json;
use tracing::debug;

pub struct MailNotifier {
    http: reqwest::Client,
    api_base: String,
    api_key: String,
    from: String,
    to: String,
}

impl MailNotifier {
    pub fn new(
        http: reqwest::Client,
        api_base: impl Into<String>,
        api_key: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        Self {
            http,
            api_base: api_base.into(),
            api_key: api_key.into(),
            from: from.into(),
            to: to.into(),
        }
    }
}

#[async_trait]
impl Notifier for MailNotifier {
    async fn notify(&self, subject: &str, html_body: &str) -> Result<(), SendError> {
        let url = format!("{}/v3/mail/send", self.api_base.trim_end_matches('/'));
        let payload = json!({
            "personalizations": [{ "to": [{ "email": self.to }] }],
            "from": { "email": self.from },
            "subject": subject,
            "content": [{ "type": "text/html", "value": html_body }],
        });

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|err| SendError::transport("mail_send", err))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SendError::Status {
                context: "mail_send",
                status: status.as_u16(),
                body,
            });
        }
        debug!(subject, "notification mail accepted");
        Ok(())
    }
}
