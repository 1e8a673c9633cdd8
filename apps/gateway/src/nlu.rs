//! NLU service client (v2 REST).
//!
//! Builds the `detectIntent` request for a session path and interprets the
//! response into the shared [`QueryResult`] shape. Call failures bubble up
//! to the router, which logs and drops them.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chatbridge_core::{IntentResolver, QueryResult};
use serde::Deserialize;
use serde_json::json;

use crate::auth::GoogleTokenProvider;

pub struct DialogflowClient {
    http: reqwest::Client,
    api_base: String,
    project_id: String,
    language_code: String,
    tokens: GoogleTokenProvider,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct DetectIntentResponse {
    query_result: QueryResult,
}

impl DialogflowClient {
    pub fn new(
        http: reqwest::Client,
        api_base: impl Into<String>,
        project_id: impl Into<String>,
        language_code: impl Into<String>,
        tokens: GoogleTokenProvider,
    ) -> Self {
        Self {
            http,
            api_base: api_base.into(),
            project_id: project_id.into(),
            language_code: language_code.into(),
            tokens,
        }
    }
}

fn session_url(api_base: &str, project_id: &str, session_id: &str) -> String {
    format!(
        "{}/v2/projects/{}/agent/sessions/{}:detectIntent",
        api_base.trim_end_matches('/'),
        project_id,
        session_id
    )
}

#[async_trait]
impl IntentResolver for DialogflowClient {
    async fn detect_intent(&self, session_id: &str, text: &str) -> Result<QueryResult> {
        let token = self.tokens.bearer_token(&self.http).await?;
        let body = json!({
            "queryInput": {
                "text": {
                    "text": text,
                    "languageCode": self.language_code,
                }
            }
        });

        let response = self
            .http
            .post(session_url(&self.api_base, &self.project_id, session_id))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .context("detect intent request failed")?;
        let status = response.status();
        let payload = response
            .text()
            .await
            .context("detect intent body read failed")?;
        if !status.is_success() {
            anyhow::bail!("detect intent returned status {status}: {payload}");
        }

        let parsed: DetectIntentResponse =
            serde_json::from_str(&payload).context("detect intent decode failed")?;
        Ok(parsed.query_result)
    }
}
