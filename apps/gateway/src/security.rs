//! Webhook signature verification.
//!
//! The platform signs each delivery with `x-hub-signature: sha1=<hex>`, an
//! HMAC-SHA1 over the raw request body with the shared app secret. The Mac
//! comparison is constant time.

use axum::http::HeaderMap;
use hmac::{Hmac, Mac};
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

pub const SIGNATURE_HEADER: &str = "x-hub-signature";

pub fn signature_valid(app_secret: &str, headers: &HeaderMap, body: &[u8]) -> bool {
    let header = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");
    let Some((_method, signature)) = header.split_once('=') else {
        return false;
    };
    let Ok(provided) = hex::decode(signature) else {
        return false;
    };
    let Ok(mut mac) = HmacSha1::new_from_slice(app_secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&provided).is_ok()
}
