//! Ed25519 request signature verification.
//!
//! The platform signs `timestamp ‖ body` with the application's key; the
//! hex-encoded public key comes from configuration. Missing headers fail
//! closed without invoking the cryptographic check.

use ring::signature::{UnparsedPublicKey, ED25519};

/// Header carrying the hex-encoded Ed25519 signature.
pub const SIGNATURE_HEADER: &str = "x-signature-ed25519";
/// Header carrying the timestamp covered by the signature.
pub const TIMESTAMP_HEADER: &str = "x-signature-timestamp";

/// Validity verdict for an inbound request.
///
/// Malformed hex in the configured key or the signature header counts as a
/// verification failure, same as a signature that does not check out.
pub fn verify_signature(
    public_key_hex: &str,
    signature_hex: Option<&str>,
    timestamp: Option<&str>,
    body: &[u8],
) -> bool {
    let (Some(signature_hex), Some(timestamp)) = (signature_hex, timestamp) else {
        return false;
    };
    let Ok(public_key) = hex::decode(public_key_hex) else {
        return false;
    };
    let Ok(signature) = hex::decode(signature_hex) else {
        return false;
    };

    let mut message = Vec::with_capacity(timestamp.len() + body.len());
    message.extend_from_slice(timestamp.as_bytes());
    message.extend_from_slice(body);

    UnparsedPublicKey::new(&ED25519, public_key)
        .verify(&message, &signature)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use ring::rand::SystemRandom;
    use ring::signature::{Ed25519KeyPair, KeyPair};

    use super::*;

    struct SignedRequest {
        public_key_hex: String,
        signature_hex: String,
        timestamp: String,
        body: Vec<u8>,
    }

    fn sign(timestamp: &str, body: &[u8]) -> SignedRequest {
        let pkcs8 = Ed25519KeyPair::generate_pkcs8(&SystemRandom::new()).unwrap();
        let key_pair = Ed25519KeyPair::from_pkcs8(pkcs8.as_ref()).unwrap();

        let mut message = timestamp.as_bytes().to_vec();
        message.extend_from_slice(body);
        let signature = key_pair.sign(&message);

        SignedRequest {
            public_key_hex: hex::encode(key_pair.public_key().as_ref()),
            signature_hex: hex::encode(signature.as_ref()),
            timestamp: timestamp.to_string(),
            body: body.to_vec(),
        }
    }

    #[test]
    fn valid_signature_verifies() {
        let req = sign("1700000000", br#"{"type":1}"#);
        assert!(verify_signature(
            &req.public_key_hex,
            Some(&req.signature_hex),
            Some(&req.timestamp),
            &req.body,
        ));
    }

    #[test]
    fn missing_signature_header_fails_closed() {
        let req = sign("1700000000", b"{}");
        assert!(!verify_signature(
            &req.public_key_hex,
            None,
            Some(&req.timestamp),
            &req.body,
        ));
    }

    #[test]
    fn missing_timestamp_header_fails_closed() {
        let req = sign("1700000000", b"{}");
        assert!(!verify_signature(
            &req.public_key_hex,
            Some(&req.signature_hex),
            None,
            &req.body,
        ));
    }

    #[test]
    fn tampered_body_is_rejected() {
        let req = sign("1700000000", br#"{"type":1}"#);
        assert!(!verify_signature(
            &req.public_key_hex,
            Some(&req.signature_hex),
            Some(&req.timestamp),
            br#"{"type":2}"#,
        ));
    }

    #[test]
    fn tampered_timestamp_is_rejected() {
        let req = sign("1700000000", b"{}");
        assert!(!verify_signature(
            &req.public_key_hex,
            Some(&req.signature_hex),
            Some("1700000001"),
            &req.body,
        ));
    }

    #[test]
    fn wrong_key_is_rejected() {
        let req = sign("1700000000", b"{}");
        let other = sign("1700000000", b"{}");
        assert!(!verify_signature(
            &other.public_key_hex,
            Some(&req.signature_hex),
            Some(&req.timestamp),
            &req.body,
        ));
    }

    #[test]
    fn malformed_hex_is_rejected() {
        let req = sign("1700000000", b"{}");
        assert!(!verify_signature(
            "not hex",
            Some(&req.signature_hex),
            Some(&req.timestamp),
            &req.body,
        ));
        assert!(!verify_signature(
            &req.public_key_hex,
            Some("zzzz"),
            Some(&req.timestamp),
            &req.body,
        ));
    }
}
