//! Webhook signature verification.
//!
//! The `Stripe-Signature` header has the form `t=<unix>,v1=<hex>[,v1=<hex>...]`. The
//! signed payload is `"{t}.{body}"`, authenticated with HMAC-SHA256 and the endpoint
//! secret. Any `v1` entry may match, which lets the vendor roll secrets.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::server::error::{billing::BillingError, Error};

/// Maximum age, in seconds, of a signature timestamp.
pub const SIGNATURE_TOLERANCE_SECS: i64 = 300;

type HmacSha256 = Hmac<Sha256>;

struct SignatureHeader {
    timestamp: i64,
    signatures: Vec<Vec<u8>>,
}

fn parse_header(header: &str) -> Result<SignatureHeader, BillingError> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        let Some((key, value)) = part.trim().split_once('=') else {
            continue;
        };

        match key {
            "t" => {
                timestamp = Some(
                    value
                        .parse::<i64>()
                        .map_err(|_| BillingError::MalformedSignature)?,
                )
            }
            // Entries that aren't valid hex can never match, skip them
            "v1" => {
                if let Ok(signature) = hex::decode(value) {
                    signatures.push(signature);
                }
            }
            _ => {}
        }
    }

    match timestamp {
        Some(timestamp) if !signatures.is_empty() => Ok(SignatureHeader {
            timestamp,
            signatures,
        }),
        _ => Err(BillingError::MalformedSignature),
    }
}

/// Verifies `payload` against the `Stripe-Signature` header.
///
/// # Arguments
/// - `payload` - Raw request body, exactly as received
/// - `header` - `Stripe-Signature` header value, if present
/// - `secret` - Webhook endpoint secret
/// - `now` - Current unix timestamp
///
/// # Returns
/// - `Ok(())` - At least one signature matches and the timestamp is fresh
/// - `Err(Error::BillingError)` - Header missing or malformed, no signature matches, or stale
pub fn verify_signature(
    payload: &str,
    header: Option<&str>,
    secret: &str,
    now: i64,
) -> Result<(), Error> {
    let header = header.ok_or(BillingError::MissingSignature)?;
    let parsed = parse_header(header)?;

    let matches = parsed.signatures.iter().any(|signature| {
        let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
            return false;
        };
        mac.update(format!("{}.{}", parsed.timestamp, payload).as_bytes());
        mac.verify_slice(signature).is_ok()
    });

    if !matches {
        return Err(BillingError::SignatureMismatch.into());
    }

    if (now - parsed.timestamp).abs() > SIGNATURE_TOLERANCE_SECS {
        return Err(BillingError::StaleSignature {
            timestamp: parsed.timestamp,
            tolerance_secs: SIGNATURE_TOLERANCE_SECS,
        }
        .into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use linkdex_test_utils::{fixtures::billing::sign_webhook_payload, prelude::*};

    use super::*;

    const PAYLOAD: &str = r#"{"id":"evt_1","type":"invoice.paid"}"#;
    const NOW: i64 = 1_800_000_000;

    fn verify(header: Option<&str>) -> Result<(), Error> {
        verify_signature(PAYLOAD, header, TEST_STRIPE_WEBHOOK_SECRET, NOW)
    }

    #[test]
    fn accepts_valid_signature() {
        let header = sign_webhook_payload(PAYLOAD, NOW);

        assert!(verify(Some(&header)).is_ok());
    }

    #[test]
    fn accepts_any_matching_v1_entry() {
        let valid = sign_webhook_payload(PAYLOAD, NOW);
        let signature = valid.split("v1=").nth(1).unwrap();
        let header = format!("t={},v1={},v1={}", NOW, "00".repeat(32), signature);

        assert!(verify(Some(&header)).is_ok());
    }

    #[test]
    fn rejects_missing_header() {
        assert!(matches!(
            verify(None),
            Err(Error::BillingError(BillingError::MissingSignature))
        ));
    }

    #[test]
    fn rejects_malformed_header() {
        assert!(matches!(
            verify(Some("garbage")),
            Err(Error::BillingError(BillingError::MalformedSignature))
        ));
        assert!(matches!(
            verify(Some("t=abc,v1=00")),
            Err(Error::BillingError(BillingError::MalformedSignature))
        ));
    }

    #[test]
    fn rejects_tampered_payload() {
        let header = sign_webhook_payload(PAYLOAD, NOW);

        let result =
            verify_signature("{}", Some(&header), TEST_STRIPE_WEBHOOK_SECRET, NOW);

        assert!(matches!(
            result,
            Err(Error::BillingError(BillingError::SignatureMismatch))
        ));
    }

    #[test]
    fn rejects_stale_timestamp() {
        let header = sign_webhook_payload(PAYLOAD, NOW - SIGNATURE_TOLERANCE_SECS - 1);

        assert!(matches!(
            verify(Some(&header)),
            Err(Error::BillingError(BillingError::StaleSignature { .. }))
        ));
    }
}
