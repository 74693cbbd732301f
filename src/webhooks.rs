// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Webhook delivery verification.
//!
//! Every delivery carries a hex HMAC-SHA256 of the raw body, keyed by the
//! account's webhook signing secret, in the [`SIGNATURE_HEADER`] header. The
//! body must be verified as received (before any JSON re-encoding) and is
//! only parsed once the signature matches.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::Sha256;
use tracing::warn;

use crate::error::{LightsparkError, Result};
use crate::objects::WebhookEventType;

type HmacSha256 = Hmac<Sha256>;

/// HTTP header carrying the delivery signature.
pub const SIGNATURE_HEADER: &str = "lightspark-signature";

/// A verified webhook notification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WebhookEvent {
    pub event_type: WebhookEventType,
    pub event_id: String,
    pub timestamp: DateTime<Utc>,
    /// Id of the entity the event is about (node, payment, wallet, ...).
    pub entity_id: String,
    #[serde(default)]
    pub wallet_id: Option<String>,
    /// Event specific payload, when the event type carries one.
    #[serde(default)]
    pub data: Option<Value>,
}

impl WebhookEvent {
    /// Verify `data` against `hexdigest` and parse it.
    pub fn verify_and_parse(data: &[u8], hexdigest: &str, webhook_secret: &str) -> Result<Self> {
        verify_signature(data, hexdigest, webhook_secret)?;
        Self::parse(data)
    }

    /// Parse a delivery body without checking its signature.
    pub fn parse(data: &[u8]) -> Result<Self> {
        serde_json::from_slice(data)
            .map_err(|e| LightsparkError::InvalidResponse(format!("webhook body: {e}")))
    }
}

/// Check that `hexdigest` is the HMAC-SHA256 of `data` under `webhook_secret`.
///
/// Hex case is ignored. The comparison runs in constant time.
///
/// # Arguments
/// * `data` - Raw request body, exactly as received
/// * `hexdigest` - Value of the [`SIGNATURE_HEADER`] header
/// * `webhook_secret` - Webhook signing secret from the account settings
///
/// # Returns
/// * `Ok(())` - The signature matches
/// * `Err(LightsparkError::InvalidWebhookSignature)` - Mismatch or non-hex header
pub fn verify_signature(data: &[u8], hexdigest: &str, webhook_secret: &str) -> Result<()> {
    let Ok(expected) = hex::decode(hexdigest.trim()) else {
        warn!("Webhook signature header is not hex");
        return Err(LightsparkError::InvalidWebhookSignature);
    };

    let mut mac = HmacSha256::new_from_slice(webhook_secret.as_bytes())
        .map_err(|_| LightsparkError::InvalidWebhookSignature)?;
    mac.update(data);

    mac.verify_slice(&expected).map_err(|_| {
        warn!("Webhook signature mismatch");
        LightsparkError::InvalidWebhookSignature
    })
}

/// Hex HMAC-SHA256 of `data`, as the server computes it.
pub fn sign(data: &[u8], webhook_secret: &str) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(webhook_secret.as_bytes())
        .map_err(|_| LightsparkError::InvalidWebhookSignature)?;
    mac.update(data);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{WEBHOOK_BODY, WEBHOOK_SECRET, WEBHOOK_SIGNATURE};

    #[test]
    fn valid_signature_parses_event() {
        let event =
            WebhookEvent::verify_and_parse(WEBHOOK_BODY, WEBHOOK_SIGNATURE, WEBHOOK_SECRET)
                .unwrap();
        assert_eq!(event.event_type, WebhookEventType::NodeStatus);
        assert_eq!(event.event_id, "1615c8be5aa44e429eba700db2ed8ca5");
        assert_eq!(
            event.entity_id,
            "lightning_node:01882c25-157a-f96b-0000-362d42b64397"
        );
        assert_eq!(event.wallet_id, None);
    }

    #[test]
    fn signature_comparison_ignores_case() {
        let upper = WEBHOOK_SIGNATURE.to_ascii_uppercase();
        assert!(verify_signature(WEBHOOK_BODY, &upper, WEBHOOK_SECRET).is_ok());
    }

    #[test]
    fn single_byte_change_is_rejected() {
        let mut tampered = hex::decode(WEBHOOK_SIGNATURE).unwrap();
        tampered[0] ^= 0x01;
        let err = verify_signature(WEBHOOK_BODY, &hex::encode(tampered), WEBHOOK_SECRET)
            .unwrap_err();
        assert_eq!(err.code(), "INVALID_WEBHOOK_SIGNATURE");

        let mut body = WEBHOOK_BODY.to_vec();
        body[2] = b'E';
        assert!(verify_signature(&body, WEBHOOK_SIGNATURE, WEBHOOK_SECRET).is_err());
    }

    #[test]
    fn rejected_event_is_never_parsed() {
        // Not JSON: a parse error here would mean parsing ran before the
        // signature check.
        let err = WebhookEvent::verify_and_parse(b"\xff\xfe", WEBHOOK_SIGNATURE, WEBHOOK_SECRET)
            .unwrap_err();
        assert!(matches!(err, LightsparkError::InvalidWebhookSignature));
    }

    #[test]
    fn non_hex_signature_is_rejected() {
        let err = verify_signature(WEBHOOK_BODY, "zz-not-hex", WEBHOOK_SECRET).unwrap_err();
        assert!(matches!(err, LightsparkError::InvalidWebhookSignature));
    }

    #[test]
    fn sign_matches_fixture() {
        assert_eq!(sign(WEBHOOK_BODY, WEBHOOK_SECRET).unwrap(), WEBHOOK_SIGNATURE);
    }

    #[test]
    fn unknown_event_types_still_parse() {
        let body = br#"{"event_type":"QUANTUM_TUNNEL","event_id":"e1","timestamp":"2024-01-01T00:00:00Z","entity_id":"x","data":{"k":1}}"#;
        let event = WebhookEvent::parse(body).unwrap();
        assert_eq!(event.event_type, WebhookEventType::FutureValue);
        assert_eq!(event.data.unwrap()["k"], 1);
    }
}
