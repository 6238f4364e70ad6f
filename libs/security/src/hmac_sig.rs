//! HMAC-SHA256 signing and verification for webhook payloads. The canonical
//! string to sign is always `"{unix_timestamp}.{compact_json_body}"`,
//! matching [`adcp_core::webhook`]'s outbound payload shape.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    #[error("signature does not match the expected value")]
    Mismatch,
    #[error("signature is not valid hex: {0}")]
    InvalidEncoding(#[from] hex::FromHexError),
}

/// `hex(HMAC-SHA256(secret, canonical))`.
pub fn sign(secret: &str, canonical: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts a key of any length");
    mac.update(canonical.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Verifies a hex-encoded signature against `canonical` in constant time,
/// so a receiver checking an inbound signature (or a test harness checking
/// an outbound one) can't leak timing information about how much of the
/// signature matched.
pub fn verify(secret: &str, canonical: &str, provided_hex: &str) -> Result<(), SignatureError> {
    let provided = hex::decode(provided_hex)?;
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts a key of any length");
    mac.update(canonical.as_bytes());
    let expected = mac.finalize().into_bytes();

    if expected.ct_eq(&provided).unwrap_u8() == 1 {
        Ok(())
    } else {
        Err(SignatureError::Mismatch)
    }
}

/// Constant-time comparison for bearer tokens, where a plain `==` would let
/// an attacker learn how many leading bytes matched from response timing.
pub fn bearer_matches(expected: &str, provided: &str) -> bool {
    expected.as_bytes().ct_eq(provided.as_bytes()).unwrap_u8() == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_then_verify_round_trips() {
        let sig = sign("topsecret", "1700000000.{\"a\":1}");
        assert!(verify("topsecret", "1700000000.{\"a\":1}", &sig).is_ok());
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let sig = sign("topsecret", "1700000000.{\"a\":1}");
        assert!(verify("othersecret", "1700000000.{\"a\":1}", &sig).is_err());
    }

    #[test]
    fn verify_rejects_malformed_hex() {
        assert!(matches!(
            verify("topsecret", "1700000000.{}", "not-hex"),
            Err(SignatureError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn bearer_matches_requires_exact_equality() {
        assert!(bearer_matches("token-123", "token-123"));
        assert!(!bearer_matches("token-123", "token-124"));
        assert!(!bearer_matches("token-123", "token-12"));
    }
}
