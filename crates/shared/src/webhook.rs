//! Webhook signature verification.
//!
//! Payment-provider webhooks carry an HMAC-SHA256 signature over the raw
//! request body in the form `sha256=<hex digest>`. Payloads must be verified
//! before any status transition is attempted.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Placeholder secret shipped in default settings; must be replaced before
/// webhooks are accepted.
pub const UNCONFIGURED_SECRET: &str = "default-secret-change-me";

/// Webhook verification errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WebhookError {
    /// The webhook secret has not been configured.
    #[error("Webhook secret is not configured")]
    SecretNotConfigured,
    /// The signature header is missing.
    #[error("Missing webhook signature")]
    MissingSignature,
    /// The signature does not match the payload.
    #[error("Invalid webhook signature")]
    InvalidSignature,
}

/// Computes the expected signature for a payload.
#[must_use]
pub fn sign(secret: &str, payload: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(payload);
    format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
}

/// Verifies a webhook signature against the raw payload.
///
/// Comparison is constant-time.
///
/// # Errors
///
/// Returns an error if the secret is unconfigured, the signature is missing,
/// or the digests do not match.
pub fn verify_signature(
    secret: &str,
    payload: &[u8],
    signature: Option<&str>,
) -> Result<(), WebhookError> {
    if secret.is_empty() || secret == UNCONFIGURED_SECRET {
        return Err(WebhookError::SecretNotConfigured);
    }

    let signature = signature.ok_or(WebhookError::MissingSignature)?;
    let expected = sign(secret, payload);

    if expected.as_bytes().ct_eq(signature.as_bytes()).into() {
        Ok(())
    } else {
        Err(WebhookError::InvalidSignature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-webhook-secret";

    #[test]
    fn test_valid_signature_roundtrip() {
        let payload = br#"{"address":"dep_abc","amount":"100"}"#;
        let signature = sign(SECRET, payload);
        assert!(verify_signature(SECRET, payload, Some(&signature)).is_ok());
    }

    #[test]
    fn test_signature_format() {
        let signature = sign(SECRET, b"payload");
        assert!(signature.starts_with("sha256="));
        // sha256 digest is 32 bytes -> 64 hex chars
        assert_eq!(signature.len(), "sha256=".len() + 64);
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let signature = sign(SECRET, b"original");
        assert_eq!(
            verify_signature(SECRET, b"tampered", Some(&signature)),
            Err(WebhookError::InvalidSignature)
        );
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let signature = sign("other-secret", b"payload");
        assert_eq!(
            verify_signature(SECRET, b"payload", Some(&signature)),
            Err(WebhookError::InvalidSignature)
        );
    }

    #[test]
    fn test_missing_signature_rejected() {
        assert_eq!(
            verify_signature(SECRET, b"payload", None),
            Err(WebhookError::MissingSignature)
        );
    }

    #[test]
    fn test_unconfigured_secret_rejected() {
        let signature = sign(UNCONFIGURED_SECRET, b"payload");
        assert_eq!(
            verify_signature(UNCONFIGURED_SECRET, b"payload", Some(&signature)),
            Err(WebhookError::SecretNotConfigured)
        );
        assert_eq!(
            verify_signature("", b"payload", Some(&signature)),
            Err(WebhookError::SecretNotConfigured)
        );
    }
}
