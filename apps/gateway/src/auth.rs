//! Service-account OAuth for the NLU service.
//!
//! Mints an RS256 JWT grant from the configured client email and private
//! key, exchanges it at the token endpoint, and caches the bearer token
//! until shortly before expiry.

use anyhow::{Context, Result};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use tokio::sync::RwLock;

const GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";
const GRANT_TTL: Duration = Duration::hours(1);
const EXPIRY_SLACK: Duration = Duration::seconds(60);

#[derive(Debug, Serialize)]
struct GrantClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: i64,
}

struct CachedToken {
    token: String,
    expires_at: OffsetDateTime,
}

pub struct GoogleTokenProvider {
    client_email: String,
    encoding_key: EncodingKey,
    token_url: String,
    cached: RwLock<Option<CachedToken>>,
}

impl GoogleTokenProvider {
    /// Fails when the private key is not a usable RSA PEM, so a bad
    /// credential is caught at startup rather than on the first query.
    pub fn new(
        client_email: impl Into<String>,
        private_key_pem: &str,
        token_url: impl Into<String>,
    ) -> Result<Self> {
        let encoding_key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
            .context("invalid NLU private key")?;
        Ok(Self {
            client_email: client_email.into(),
            encoding_key,
            token_url: token_url.into(),
            cached: RwLock::new(None),
        })
    }

    pub async fn bearer_token(&self, http: &reqwest::Client) -> Result<String> {
        let now = OffsetDateTime::now_utc();
        if let Some(cached) = self.cached.read().await.as_ref() {
            if cached.expires_at - EXPIRY_SLACK > now {
                return Ok(cached.token.clone());
            }
        }

        let assertion = self.assertion(now)?;
        let response = http
            .post(&self.token_url)
            .form(&[("grant_type", GRANT_TYPE), ("assertion", assertion.as_str())])
            .send()
            .await
            .context("token exchange request failed")?;
        let status = response.status();
        let body = response
            .text()
            .await
            .context("token exchange body read failed")?;
        if !status.is_success() {
            anyhow::bail!("token exchange returned status {status}: {body}");
        }
        let parsed: TokenResponse =
            serde_json::from_str(&body).context("token exchange decode failed")?;

        let expires_at = now + Duration::seconds(parsed.expires_in.max(60));
        let token = parsed.access_token;
        *self.cached.write().await = Some(CachedToken {
            token: token.clone(),
            expires_at,
        });
        Ok(token)
    }

    fn assertion(&self, now: OffsetDateTime) -> Result<String> {
        let claims = GrantClaims {
            iss: &self.client_email,
            scope: SCOPE,
            aud: &self.token_url,
            iat: now.unix_timestamp(),
            exp: (now + GRANT_TTL).unix_timestamp(),
        };
        Ok(encode(&Header::new(Algorithm::RS256), &claims, &self.encoding_key)?)
    }
}
